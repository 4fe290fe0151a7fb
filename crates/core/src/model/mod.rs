mod ids;
mod lifeline;
mod question;
mod session;
mod snapshot;
mod team;
mod topic;

pub use ids::{Difficulty, IdError, TeamName, TopicId};
pub use lifeline::{Lifeline, LifelineSet};
pub use question::{ANSWER_COUNT, AnswerIndex, Question, QuestionError};
pub use session::{EndReason, GameMode, GameOutcome, NextStep, Phase};
pub use snapshot::{GameSnapshot, SNAPSHOT_KEY, SnapshotError};
pub use team::{Standing, TeamError, TeamStats, rank_standings};
pub use topic::{QuestionBank, TopicSummary};
