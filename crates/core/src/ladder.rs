//! The money ladder: prize labels indexed by questions completed.

use serde::{Deserialize, Serialize};

use crate::model::EndReason;

/// Prize labels, lowest first. The last entry is the jackpot.
pub const MONEY_LADDER: [&str; 10] = [
    "1 Ramen Cup",
    "1 Energy Drink",
    "1 Pizza Slice",
    "1 Coffee & Donut",
    "1 Movie Ticket",
    "1 Textbook (Used!)",
    "1 Gaming Headset",
    "1 Laptop Upgrade",
    "1 Semester Parking Pass",
    "1 MILLION DOLLARS!",
];

/// Index into [`MONEY_LADDER`], always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Tier(usize);

impl Tier {
    pub const TOP: Tier = Tier(MONEY_LADDER.len() - 1);

    /// Clamps any index onto the ladder.
    #[must_use]
    pub fn clamped(index: usize) -> Self {
        Self(index.min(Self::TOP.0))
    }

    /// Tier being played for while `cursor` questions have been answered correctly.
    #[must_use]
    pub fn at_stake(cursor: usize) -> Self {
        Self::clamped(cursor)
    }

    /// Tier secured by the last fully completed question, if any.
    #[must_use]
    pub fn completed(cursor: usize) -> Option<Self> {
        cursor.checked_sub(1).map(Self::clamped)
    }

    /// Prize awarded when an individual game ends for `reason` at `cursor`.
    ///
    /// A wrong answer on the very first question still hands out the first tier;
    /// walking away before answering anything wins nothing.
    #[must_use]
    pub fn for_outcome(reason: EndReason, cursor: usize) -> Option<Self> {
        match reason {
            EndReason::Completed => Some(Self::TOP),
            EndReason::WalkedAway => Self::completed(cursor),
            EndReason::WrongAnswer => Some(Self::completed(cursor).unwrap_or(Self(0))),
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        MONEY_LADDER[self.0]
    }
}

impl TryFrom<usize> for Tier {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < MONEY_LADDER.len() {
            Ok(Self(value))
        } else {
            Err(format!("tier {value} is off the ladder"))
        }
    }
}

impl From<Tier> for usize {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

/// One rung of the ladder as shown beside the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LadderStep {
    /// 1-based level, matching the question number.
    pub level: usize,
    pub label: &'static str,
    pub state: StepState,
}

/// Builds the ladder display for a given cursor.
#[must_use]
pub fn ladder_steps(cursor: usize) -> Vec<LadderStep> {
    MONEY_LADDER
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let level = idx + 1;
            let state = match level.cmp(&(cursor + 1)) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Current,
                std::cmp::Ordering::Greater => StepState::Upcoming,
            };
            LadderStep {
                level,
                label,
                state,
            }
        })
        .collect()
}
