use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every question offers exactly this many answers.
pub const ANSWER_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected {ANSWER_COUNT} answers, got {len}")]
    AnswerCount { len: usize },

    #[error("answer {index} is empty")]
    EmptyAnswer { index: usize },

    #[error("answer index out of range: {0}")]
    InvalidAnswerIndex(u8),

    #[error("answer must be one of A-D, got {0:?}")]
    InvalidAnswerLabel(String),
}

//
// ─── ANSWER INDEX ──────────────────────────────────────────────────────────────
//

/// Position of an answer option, 0..=3 (shown to players as A..D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnswerIndex(u8);

impl AnswerIndex {
    pub const ALL: [AnswerIndex; ANSWER_COUNT] =
        [AnswerIndex(0), AnswerIndex(1), AnswerIndex(2), AnswerIndex(3)];

    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAnswerIndex` if `value` is not in 0..=3.
    pub fn new(value: u8) -> Result<Self, QuestionError> {
        if usize::from(value) < ANSWER_COUNT {
            Ok(Self(value))
        } else {
            Err(QuestionError::InvalidAnswerIndex(value))
        }
    }

    /// Parses the answer letter printed on the button.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAnswerLabel` for anything but A-D.
    pub fn from_letter(letter: char) -> Result<Self, QuestionError> {
        match letter.to_ascii_uppercase() {
            'A' => Ok(Self(0)),
            'B' => Ok(Self(1)),
            'C' => Ok(Self(2)),
            'D' => Ok(Self(3)),
            other => Err(QuestionError::InvalidAnswerLabel(other.to_string())),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl TryFrom<u8> for AnswerIndex {
    type Error = QuestionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnswerIndex> for u8 {
    fn from(index: AnswerIndex) -> Self {
        index.0
    }
}

impl fmt::Display for AnswerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for AnswerIndex {
    type Err = QuestionError;

    /// Accepts a single letter (`A`..`D`) or a zero-based digit (`0`..`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => {
                let value = c.to_digit(10).and_then(|d| u8::try_from(d).ok()).unwrap_or(u8::MAX);
                Self::new(value)
            }
            (Some(c), None) => Self::from_letter(c),
            _ => Err(QuestionError::InvalidAnswerLabel(trimmed.to_owned())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once built.
///
/// The prompt and answers are markdown; rendering is left to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    answers: [String; ANSWER_COUNT],
    correct: AnswerIndex,
    explanation: String,
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, the answer count is not four,
    /// an answer is blank, or `correct` is out of range.
    pub fn new(
        prompt: impl Into<String>,
        answers: Vec<String>,
        correct: u8,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let len = answers.len();
        let answers: [String; ANSWER_COUNT] = answers
            .try_into()
            .map_err(|_| QuestionError::AnswerCount { len })?;
        if let Some(index) = answers.iter().position(|a| a.trim().is_empty()) {
            return Err(QuestionError::EmptyAnswer { index });
        }

        Ok(Self {
            prompt,
            answers,
            correct: AnswerIndex::new(correct)?,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answers(&self) -> &[String; ANSWER_COUNT] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: AnswerIndex) -> &str {
        &self.answers[index.as_usize()]
    }

    #[must_use]
    pub fn correct(&self) -> AnswerIndex {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, index: AnswerIndex) -> bool {
        index == self.correct
    }

    /// The three wrong options, in display order.
    #[must_use]
    pub fn incorrect_indices(&self) -> Vec<AnswerIndex> {
        AnswerIndex::ALL
            .into_iter()
            .filter(|idx| *idx != self.correct)
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
