use quiz_core::Tier;
use quiz_core::model::{AnswerIndex, GameMode, GameOutcome, Standing, TeamName};

use crate::error::InputError;
use crate::session::LifelineUse;
use crate::view::GameView;

/// Transient effects a presenter may animate, play a sound for, or print.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameEvent {
    /// A resumable game was found at startup.
    SavedGameFound { description: String },
    Resumed { description: String },
    GameStarted { mode: GameMode, questions: usize },
    AnswerLocked(AnswerIndex),
    Correct(AnswerIndex),
    /// `correct` is withheld after a wrong team answer.
    Wrong {
        selected: AnswerIndex,
        correct: Option<AnswerIndex>,
    },
    MoneyWin(Tier),
    Jackpot,
    TeamScored { team: TeamName, score: u32 },
    PointsLost { team: TeamName, points: u32 },
    TurnPassed { team: TeamName },
    LifelineUsed(LifelineUse),
    Leaderboard(Vec<Standing>),
    GameEnded(GameOutcome),
    Rejected(InputError),
    LoadFailed(String),
    GameSaved,
    SaveCleared,
}

/// The outward face of the game.
///
/// `render` is called after every handled intent with the full picture;
/// `notify` carries one-off effects in the order they happen.
pub trait Presenter {
    fn render(&mut self, view: &GameView);
    fn notify(&mut self, event: GameEvent);
}

/// Keeps every view and event, for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub views: Vec<GameView>,
    pub events: Vec<GameEvent>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_view(&self) -> Option<&GameView> {
        self.views.last()
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, view: &GameView) {
        self.views.push(view.clone());
    }

    fn notify(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
