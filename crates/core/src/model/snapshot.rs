use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::ids::{Difficulty, TeamName, TopicId};
use crate::model::lifeline::LifelineSet;
use crate::model::question::{AnswerIndex, Question};
use crate::model::session::{GameMode, NextStep, Phase};
use crate::model::team::TeamStats;

/// Fixed key under which the single in-progress game is stored.
pub const SNAPSHOT_KEY: &str = "wwtbdGame";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("question cursor {cursor} is past the question set ({len})")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("current team index {index} is outside the roster ({len})")]
    TeamIndexOutOfRange { index: usize, len: usize },

    #[error("team {0} appears more than once in the roster")]
    DuplicateTeam(TeamName),

    #[error("team stats do not match the roster")]
    StatsMismatch,

    #[error("snapshot was taken mid-reveal")]
    PendingReveal,

    #[error("team game at {phase} has no teams")]
    EmptyRoster { phase: &'static str },

    #[error("{mode} game cannot be at {phase}")]
    PhaseMismatch { mode: GameMode, phase: &'static str },
}

/// Full, self-contained picture of one game, written after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub topic: Option<TopicId>,
    pub difficulty: Option<Difficulty>,
    pub is_over: bool,
    pub lifelines_used: LifelineSet,
    pub roster: Vec<TeamName>,
    pub current_team_index: usize,
    pub team_stats: BTreeMap<TeamName, TeamStats>,
    pub active_question_set: Vec<Question>,
    pub question_cursor: usize,
    #[serde(default)]
    pub eliminated_answers: Vec<AnswerIndex>,
    #[serde(default)]
    pub phase: Phase,
    pub timestamp: DateTime<Utc>,
}

impl GameSnapshot {
    /// Checks the structural invariants a resumable snapshot must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first `SnapshotError` found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let len = self.active_question_set.len();
        if self.question_cursor > len {
            return Err(SnapshotError::CursorOutOfRange {
                cursor: self.question_cursor,
                len,
            });
        }

        let roster_len = self.roster.len();
        if roster_len > 0 && self.current_team_index >= roster_len {
            return Err(SnapshotError::TeamIndexOutOfRange {
                index: self.current_team_index,
                len: roster_len,
            });
        }
        if roster_len == 0 && self.current_team_index != 0 {
            return Err(SnapshotError::TeamIndexOutOfRange {
                index: self.current_team_index,
                len: 0,
            });
        }

        let mut seen = HashSet::with_capacity(roster_len);
        for team in &self.roster {
            if !seen.insert(team) {
                return Err(SnapshotError::DuplicateTeam(team.clone()));
            }
        }
        if self.team_stats.len() != roster_len
            || !self.roster.iter().all(|t| self.team_stats.contains_key(t))
        {
            return Err(SnapshotError::StatsMismatch);
        }

        self.validate_phase(&self.phase)
    }

    /// Checks that `phase` fits this snapshot's mode, roster and question set.
    ///
    /// Resuming may settle a legacy save on a different phase than the stored
    /// one, so callers can re-check the phase they actually resume at.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the game could not be played on from `phase`.
    pub fn validate_phase(&self, phase: &Phase) -> Result<(), SnapshotError> {
        let fits_mode = match phase {
            Phase::AnswerPending { .. } => return Err(SnapshotError::PendingReveal),
            Phase::TeamSetup | Phase::Decision | Phase::TeamWrong { .. } => {
                self.mode == GameMode::Team
            }
            Phase::AnswerRevealed { next, .. } => match next {
                NextStep::NextQuestion => self.mode == GameMode::Individual,
                NextStep::Decision | NextStep::TeamWrong { .. } => self.mode == GameMode::Team,
                NextStep::GameOver => true,
            },
            _ => true,
        };
        if !fits_mode {
            return Err(SnapshotError::PhaseMismatch {
                mode: self.mode,
                phase: phase.name(),
            });
        }

        let past_setup = !matches!(
            phase,
            Phase::ModeSelect | Phase::TeamSetup | Phase::GameOver(_)
        );
        if self.mode == GameMode::Team && past_setup && self.roster.is_empty() {
            return Err(SnapshotError::EmptyRoster {
                phase: phase.name(),
            });
        }

        // A correct individual reveal has already stepped past its question,
        // so the final one may leave the cursor at the end of the set.
        let needs_open_question = match phase {
            Phase::InQuestion | Phase::Decision | Phase::TeamWrong { .. } => true,
            Phase::AnswerRevealed {
                correct: true,
                next: NextStep::GameOver,
                ..
            } => self.mode == GameMode::Team,
            Phase::AnswerRevealed { .. } => true,
            _ => false,
        };
        let len = self.active_question_set.len();
        if needs_open_question && self.question_cursor >= len {
            return Err(SnapshotError::CursorOutOfRange {
                cursor: self.question_cursor,
                len,
            });
        }
        Ok(())
    }

    /// Whether the save is worth offering as "continue game".
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.question_cursor > 0 || (self.mode == GameMode::Team && !self.roster.is_empty())
    }

    /// One-line description for the continue prompt.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.mode {
            GameMode::Team => format!(
                "Team tournament in progress: {} teams, Question {}",
                self.roster.len(),
                self.question_cursor + 1
            ),
            GameMode::Individual => {
                let topic = self
                    .topic
                    .as_ref()
                    .map_or_else(|| "?".to_owned(), |t| t.as_str().to_uppercase());
                format!(
                    "Individual game in progress: Question {} of {}, Topic: {}",
                    self.question_cursor + 1,
                    self.active_question_set.len(),
                    topic
                )
            }
        }
    }
}
