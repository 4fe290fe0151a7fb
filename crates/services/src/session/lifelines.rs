use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{AnswerIndex, Lifeline, Question};

/// What spending a lifeline did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifelineUse {
    pub kind: Lifeline,
    /// Options removed from play; only 50:50 removes any.
    pub eliminated: Vec<AnswerIndex>,
}

/// Picks two of the three wrong answers uniformly at random, in display order.
pub(crate) fn fifty_fifty<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<AnswerIndex> {
    let mut wrong = question.incorrect_indices();
    wrong.shuffle(rng);
    wrong.truncate(2);
    wrong.sort_unstable();
    wrong
}
