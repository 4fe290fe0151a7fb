//! On-disk shapes of the quiz catalog.
//!
//! `quizzes.json`:
//! ```json
//! { "available": [ { "id": "history", "name": "History", "description": "...", "file": "history.json" } ] }
//! ```
//! Each topic file maps a difficulty to its questions:
//! ```json
//! { "easy": [ { "question": "...", "answers": ["a","b","c","d"], "correct": 2, "explanation": "..." } ] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use quiz_core::model::{Difficulty, Question, QuestionBank, TopicId, TopicSummary};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ManifestRecord {
    #[serde(default)]
    pub available: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ManifestEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub file: String,
}

impl ManifestEntry {
    pub(crate) fn from_summary(summary: &TopicSummary) -> Self {
        Self {
            id: summary.id.as_str().to_owned(),
            name: summary.display_name.clone(),
            description: summary.description.clone(),
            file: format!("{}.json", summary.id.as_str()),
        }
    }

    pub(crate) fn to_summary(&self) -> Result<TopicSummary, quiz_core::Error> {
        Ok(TopicSummary {
            id: TopicId::new(&self.id)?,
            display_name: self.name.clone(),
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuestionRecord {
    pub question: String,
    pub answers: Vec<String>,
    pub correct: u8,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionRecord {
    pub(crate) fn from_question(question: &Question) -> Self {
        Self {
            question: question.prompt().to_owned(),
            answers: question.answers().to_vec(),
            correct: question.correct().value(),
            explanation: question.explanation().to_owned(),
        }
    }

    pub(crate) fn into_question(self) -> Result<Question, quiz_core::Error> {
        Ok(Question::new(
            self.question,
            self.answers,
            self.correct,
            self.explanation,
        )?)
    }
}

pub(crate) type QuizFileRecord = BTreeMap<String, Vec<QuestionRecord>>;

pub(crate) fn bank_from_record(record: QuizFileRecord) -> Result<QuestionBank, quiz_core::Error> {
    let mut bank = QuestionBank::new();
    for (difficulty, questions) in record {
        let questions = questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        bank.insert(Difficulty::new(difficulty)?, questions);
    }
    Ok(bank)
}

pub(crate) fn record_from_bank(bank: &QuestionBank) -> QuizFileRecord {
    bank.difficulties()
        .map(|difficulty| {
            let questions = bank
                .questions(difficulty)
                .unwrap_or_default()
                .iter()
                .map(QuestionRecord::from_question)
                .collect();
            (difficulty.as_str().to_owned(), questions)
        })
        .collect()
}
