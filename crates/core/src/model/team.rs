use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TeamName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TeamError {
    #[error("correct answers ({correct}) exceed questions answered ({answered})")]
    CorrectExceedsAnswered { correct: u32, answered: u32 },

    #[error("score ({score}) exceeds correct answers ({correct})")]
    ScoreExceedsCorrect { score: u32, correct: u32 },
}

/// Running tally for one team.
///
/// A score only ever grows by one per correct answer and drops straight to zero on a
/// wrong one, so `score <= correct_answers <= questions_answered` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StatsRecord")]
pub struct TeamStats {
    score: u32,
    questions_answered: u32,
    correct_answers: u32,
}

impl TeamStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate stats from persisted storage. Deserialization goes through here too.
    ///
    /// # Errors
    ///
    /// Returns `TeamError` if the counters contradict each other.
    pub fn from_persisted(
        score: u32,
        questions_answered: u32,
        correct_answers: u32,
    ) -> Result<Self, TeamError> {
        if correct_answers > questions_answered {
            return Err(TeamError::CorrectExceedsAnswered {
                correct: correct_answers,
                answered: questions_answered,
            });
        }
        if score > correct_answers {
            return Err(TeamError::ScoreExceedsCorrect {
                score,
                correct: correct_answers,
            });
        }
        Ok(Self {
            score,
            questions_answered,
            correct_answers,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Counts a correct answer and awards one point.
    pub fn record_correct(&mut self) {
        self.questions_answered = self.questions_answered.saturating_add(1);
        self.correct_answers = self.correct_answers.saturating_add(1);
        self.score = self.score.saturating_add(1);
    }

    /// Counts a wrong answer and wipes the score. Returns the points that were lost.
    pub fn record_wrong(&mut self) -> u32 {
        self.questions_answered = self.questions_answered.saturating_add(1);
        std::mem::take(&mut self.score)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unchecked wire form of `TeamStats`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsRecord {
    score: u32,
    questions_answered: u32,
    correct_answers: u32,
}

impl TryFrom<StatsRecord> for TeamStats {
    type Error = TeamError;

    fn try_from(record: StatsRecord) -> Result<Self, Self::Error> {
        Self::from_persisted(
            record.score,
            record.questions_answered,
            record.correct_answers,
        )
    }
}

/// A team's place in the final standings (1-based rank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: usize,
    pub team: TeamName,
    pub stats: TeamStats,
}

/// Orders teams by descending score. The sort is stable, so ties keep roster order.
#[must_use]
pub fn rank_standings(entries: impl IntoIterator<Item = (TeamName, TeamStats)>) -> Vec<Standing> {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| b.1.score().cmp(&a.1.score()));
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (team, stats))| Standing {
            rank: idx + 1,
            team,
            stats,
        })
        .collect()
}
