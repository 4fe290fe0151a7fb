use quiz_core::model::{AnswerIndex, NextStep};

/// Handle for a locked answer, redeemed once the reveal delay has passed.
///
/// A ticket only reveals the answer it was issued for: if the session moved on,
/// was reset, or a newer answer was locked, redeeming it does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    pub(crate) generation: u64,
    pub cursor: usize,
    pub team_index: usize,
    pub selected: AnswerIndex,
}

/// Outcome of revealing a locked answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub selected: AnswerIndex,
    pub correct_answer: AnswerIndex,
    pub is_correct: bool,
    pub next: NextStep,
}
