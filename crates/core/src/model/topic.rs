use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{Difficulty, TopicId};
use crate::model::question::Question;

/// Catalog entry for a quiz topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: TopicId,
    pub display_name: String,
    pub description: String,
}

/// All questions of one topic, grouped by difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    sets: BTreeMap<Difficulty, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the question set for `difficulty`.
    pub fn insert(&mut self, difficulty: Difficulty, questions: Vec<Question>) {
        self.sets.insert(difficulty, questions);
    }

    #[must_use]
    pub fn with_set(mut self, difficulty: Difficulty, questions: Vec<Question>) -> Self {
        self.insert(difficulty, questions);
        self
    }

    #[must_use]
    pub fn questions(&self, difficulty: &Difficulty) -> Option<&[Question]> {
        self.sets.get(difficulty).map(Vec::as_slice)
    }

    pub fn difficulties(&self) -> impl Iterator<Item = &Difficulty> {
        self.sets.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.values().all(Vec::is_empty)
    }
}
