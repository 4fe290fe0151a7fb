#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod game_service;
pub mod intent;
pub mod presenter;
pub mod session;
pub mod tournament;
pub mod view;

pub use quiz_core::Clock;

pub use config::{DEFAULT_REVEAL_DELAY, GameConfig};
pub use error::{GameError, InputError};
pub use game_service::GameService;
pub use intent::Intent;
pub use presenter::{GameEvent, Presenter, RecordingPresenter};
pub use session::{LifelineUse, Reveal, RevealTicket, Session};
pub use tournament::{AnswerVerdict, MIN_TEAMS, Tournament};
pub use view::{AnswerView, GameView, LifelineView, QuestionView, TeamPanel};
