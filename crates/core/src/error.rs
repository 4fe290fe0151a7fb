use thiserror::Error;

use crate::model::{IdError, QuestionError, SnapshotError, TeamError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Team(#[from] TeamError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
