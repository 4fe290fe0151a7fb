use std::time::Duration;

/// Pause between locking an answer and revealing it.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(2500);

/// Tunables for a `GameService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    reveal_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with no reveal pause, for tests and scripted play.
    #[must_use]
    pub fn instant() -> Self {
        Self::default().with_reveal_delay(Duration::ZERO)
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_browser_timing() {
        assert_eq!(GameConfig::default().reveal_delay(), Duration::from_millis(2500));
        assert_eq!(GameConfig::instant().reveal_delay(), Duration::ZERO);
    }
}
