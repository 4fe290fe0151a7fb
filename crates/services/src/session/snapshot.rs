use chrono::{DateTime, Utc};

use quiz_core::model::{GameMode, GameSnapshot, Phase, SnapshotError};

use super::Session;
use crate::tournament::Tournament;

impl Session {
    /// Captures everything needed to resume this session.
    ///
    /// A pending answer is stored as the open question it was pending on.
    #[must_use]
    pub fn to_snapshot(&self, timestamp: DateTime<Utc>) -> GameSnapshot {
        GameSnapshot {
            mode: self.mode,
            topic: self.topic.clone(),
            difficulty: self.difficulty.clone(),
            is_over: self.is_over(),
            lifelines_used: self.lifelines,
            roster: self.tournament.roster().to_vec(),
            current_team_index: self.tournament.current_index(),
            team_stats: self.tournament.stats_map().clone(),
            active_question_set: self.questions.clone(),
            question_cursor: self.cursor,
            eliminated_answers: self.eliminated.clone(),
            phase: self.phase.resumable(),
            timestamp,
        }
    }

    /// Rebuilds a session from a saved snapshot.
    ///
    /// Saves written before phases were stored resume at the open question, or
    /// at topic selection for a tournament that had not picked questions yet.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot is inconsistent.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;

        let len = snapshot.active_question_set.len();
        let phase = match snapshot.phase.clone() {
            Phase::ModeSelect if snapshot.question_cursor < len => Phase::InQuestion,
            Phase::ModeSelect if snapshot.mode == GameMode::Team && !snapshot.roster.is_empty() => {
                Phase::TopicSelect
            }
            other => other,
        };

        snapshot.validate_phase(&phase)?;

        Ok(Self {
            mode: snapshot.mode,
            phase,
            topic: snapshot.topic,
            bank: None,
            difficulty: snapshot.difficulty,
            questions: snapshot.active_question_set,
            cursor: snapshot.question_cursor,
            lifelines: snapshot.lifelines_used,
            eliminated: snapshot.eliminated_answers,
            tournament: Tournament::from_parts(
                snapshot.roster,
                snapshot.team_stats,
                snapshot.current_team_index,
            ),
            generation: 0,
        })
    }
}
