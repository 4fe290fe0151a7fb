#![forbid(unsafe_code)]

pub mod error;
pub mod ladder;
pub mod model;
pub mod time;

pub use error::Error;
pub use ladder::{LadderStep, StepState, Tier};
pub use time::Clock;
