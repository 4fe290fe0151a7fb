//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerIndex, Difficulty, TeamName};
use storage::repository::StorageError;

/// Intents rejected before any state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("team name cannot be empty")]
    EmptyTeamName,
    #[error("team {0} is already on the roster")]
    DuplicateTeam(TeamName),
    #[error("team {0} is not on the roster")]
    UnknownTeam(String),
    #[error("at least {min} teams are needed, the roster has {have}")]
    NotEnoughTeams { min: usize, have: usize },
    #[error("{intent} is not available during {phase}")]
    WrongPhase {
        intent: &'static str,
        phase: &'static str,
    },
    #[error("the game is over")]
    GameOver,
    #[error("an answer is already locked in")]
    AnswerPending,
    #[error("answer {0} was removed by 50:50")]
    EliminatedAnswer(AnswerIndex),
    #[error("difficulty {0} is not offered for this topic")]
    UnknownDifficulty(Difficulty),
    #[error("there are no {0} questions for this topic")]
    EmptyQuestionSet(Difficulty),
    #[error("walking away is only possible in individual mode")]
    WalkAwayInTeamMode,
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("quiz content could not be loaded: {0}")]
    ContentLoad(#[source] StorageError),
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}
