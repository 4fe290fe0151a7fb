use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ladder::Tier;
use crate::model::question::AnswerIndex;
use crate::model::team::Standing;
use crate::model::ids::TeamName;

//
// ─── MODE ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Single player climbing the money ladder.
    #[default]
    Individual,
    /// Several teams taking turns with risk/safe decisions.
    Team,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Individual => f.write_str("individual"),
            GameMode::Team => f.write_str("team"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" | "solo" | "single" => Ok(GameMode::Individual),
            "team" | "teams" | "tournament" => Ok(GameMode::Team),
            other => Err(format!("unknown game mode: {other}")),
        }
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every question in the set was answered correctly.
    Completed,
    WrongAnswer,
    WalkedAway,
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Individual {
        reason: EndReason,
        prize: Option<Tier>,
    },
    Tournament {
        winner: TeamName,
        standings: Vec<Standing>,
    },
}

impl GameOutcome {
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(
            self,
            GameOutcome::Individual {
                reason: EndReason::Completed,
                ..
            }
        )
    }
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// What leaving the reveal leads to. Decided when the answer is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    NextQuestion,
    Decision,
    TeamWrong { points_lost: u32 },
    GameOver,
}

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    ModeSelect,
    TeamSetup,
    TopicSelect,
    DifficultySelect,
    InQuestion,
    /// Answer locked in, waiting for the reveal delay to elapse.
    AnswerPending {
        selected: AnswerIndex,
    },
    AnswerRevealed {
        selected: AnswerIndex,
        correct: bool,
        next: NextStep,
    },
    /// Team mode: risk the next question or bank the score.
    Decision,
    TeamWrong {
        points_lost: u32,
    },
    GameOver(GameOutcome),
}

impl Phase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::ModeSelect => "mode_select",
            Phase::TeamSetup => "team_setup",
            Phase::TopicSelect => "topic_select",
            Phase::DifficultySelect => "difficulty_select",
            Phase::InQuestion => "in_question",
            Phase::AnswerPending { .. } => "answer_pending",
            Phase::AnswerRevealed { .. } => "answer_revealed",
            Phase::Decision => "decision",
            Phase::TeamWrong { .. } => "team_wrong",
            Phase::GameOver(_) => "game_over",
        }
    }

    /// True while no question set is in play, so the mode may be (re)chosen.
    #[must_use]
    pub fn allows_mode_change(&self) -> bool {
        matches!(
            self,
            Phase::ModeSelect
                | Phase::TeamSetup
                | Phase::TopicSelect
                | Phase::DifficultySelect
                | Phase::GameOver(_)
        )
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }

    /// The phase to persist in place of this one. A pending answer has not been
    /// revealed yet, so it is stored as the open question.
    #[must_use]
    pub fn resumable(&self) -> Phase {
        match self {
            Phase::AnswerPending { .. } => Phase::InQuestion,
            other => other.clone(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_answer_persists_as_open_question() {
        let pending = Phase::AnswerPending {
            selected: AnswerIndex::new(1).unwrap(),
        };
        assert_eq!(pending.resumable(), Phase::InQuestion);
        assert_eq!(Phase::Decision.resumable(), Phase::Decision);
    }

    #[test]
    fn phase_round_trips_through_json() {
        let phase = Phase::AnswerRevealed {
            selected: AnswerIndex::new(3).unwrap(),
            correct: false,
            next: NextStep::TeamWrong { points_lost: 2 },
        };
        let json = serde_json::to_string(&phase).unwrap();
        let back: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, phase);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("Team".parse::<GameMode>().unwrap(), GameMode::Team);
        assert_eq!("solo".parse::<GameMode>().unwrap(), GameMode::Individual);
        assert!("duo".parse::<GameMode>().is_err());
    }

    #[test]
    fn only_completed_runs_count_as_wins() {
        let won = GameOutcome::Individual {
            reason: EndReason::Completed,
            prize: Some(Tier::TOP),
        };
        let walked = GameOutcome::Individual {
            reason: EndReason::WalkedAway,
            prize: None,
        };
        assert!(won.is_win());
        assert!(!walked.is_win());
    }
}
