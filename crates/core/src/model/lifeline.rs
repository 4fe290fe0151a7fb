use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One-time aids available during a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifeline {
    /// Removes two wrong answers.
    FiftyFifty,
    /// Poll the room ("Ask the Class").
    AskAudience,
    /// Ask an expert ("Phone the Professor").
    PhoneAFriend,
}

impl Lifeline {
    pub const ALL: [Lifeline; 3] = [
        Lifeline::FiftyFifty,
        Lifeline::AskAudience,
        Lifeline::PhoneAFriend,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "50:50",
            Lifeline::AskAudience => "Ask the Class",
            Lifeline::PhoneAFriend => "Phone the Professor",
        }
    }
}

impl fmt::Display for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Lifeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5050" | "50:50" | "fifty" | "fifty-fifty" => Ok(Lifeline::FiftyFifty),
            "audience" | "ask" | "class" => Ok(Lifeline::AskAudience),
            "phone" | "friend" | "professor" => Ok(Lifeline::PhoneAFriend),
            other => Err(format!("unknown lifeline: {other}")),
        }
    }
}

/// Which lifelines have been consumed in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelineSet {
    fifty_fifty: bool,
    ask_audience: bool,
    phone_a_friend: bool,
}

impl LifelineSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_used(&self, kind: Lifeline) -> bool {
        *self.slot(kind)
    }

    /// Marks `kind` as used. Returns `false` if it already was.
    pub fn mark_used(&mut self, kind: Lifeline) -> bool {
        let slot = self.slot_mut(kind);
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn available(&self) -> Vec<Lifeline> {
        Lifeline::ALL
            .into_iter()
            .filter(|kind| !self.is_used(*kind))
            .collect()
    }

    fn slot(&self, kind: Lifeline) -> &bool {
        match kind {
            Lifeline::FiftyFifty => &self.fifty_fifty,
            Lifeline::AskAudience => &self.ask_audience,
            Lifeline::PhoneAFriend => &self.phone_a_friend,
        }
    }

    fn slot_mut(&mut self, kind: Lifeline) -> &mut bool {
        match kind {
            Lifeline::FiftyFifty => &mut self.fifty_fifty,
            Lifeline::AskAudience => &mut self.ask_audience,
            Lifeline::PhoneAFriend => &mut self.phone_a_friend,
        }
    }
}
