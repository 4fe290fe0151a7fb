use async_trait::async_trait;
use quiz_core::model::{GameSnapshot, QuestionBank, TopicId, TopicSummary};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Read-only access to the quiz catalog.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// List every topic in the catalog, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read or parsed.
    async fn list_topics(&self) -> Result<Vec<TopicSummary>, StorageError>;

    /// Load all difficulty bands of one topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown topic, or other storage errors.
    async fn load_questions(&self, topic: &TopicId) -> Result<QuestionBank, StorageError>;
}

/// Single-slot store for the in-progress game.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Overwrite the saved game with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or written.
    async fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<(), StorageError>;

    /// Fetch the saved game, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or the payload is corrupt.
    async fn load_snapshot(&self) -> Result<Option<GameSnapshot>, StorageError>;

    /// Remove the saved game. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable.
    async fn clear_snapshot(&self) -> Result<(), StorageError>;
}

/// Encode a snapshot as the JSON payload every backend stores.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_snapshot(snapshot: &GameSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode and validate a stored payload.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the payload is malformed or violates
/// snapshot invariants.
pub fn decode_snapshot(payload: &str) -> Result<GameSnapshot, StorageError> {
    let snapshot: GameSnapshot =
        serde_json::from_str(payload).map_err(|e| StorageError::Serialization(e.to_string()))?;
    snapshot
        .validate()
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(snapshot)
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// The snapshot is kept as its encoded JSON payload, the way a browser keeps it
/// in local storage, so save/load exercise the same codec as the `SQLite` backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    topics: Arc<Mutex<Vec<(TopicSummary, QuestionBank)>>>,
    saved: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a topic in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_topic(
        &self,
        summary: TopicSummary,
        bank: QuestionBank,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if let Some(slot) = guard.iter_mut().find(|(s, _)| s.id == summary.id) {
            *slot = (summary, bank);
        } else {
            guard.push((summary, bank));
        }
        Ok(())
    }

    /// Raw stored payload, for inspecting what was written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_payload(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .saved
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    /// Overwrite the stored payload verbatim, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw_payload(&self, payload: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .saved
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(payload.into());
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn list_topics(&self) -> Result<Vec<TopicSummary>, StorageError> {
        let guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().map(|(summary, _)| summary.clone()).collect())
    }

    async fn load_questions(&self, topic: &TopicId) -> Result<QuestionBank, StorageError> {
        let guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|(summary, _)| &summary.id == topic)
            .map(|(_, bank)| bank.clone())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<(), StorageError> {
        let payload = encode_snapshot(snapshot)?;
        self.put_raw_payload(payload)
    }

    async fn load_snapshot(&self) -> Result<Option<GameSnapshot>, StorageError> {
        self.raw_payload()?
            .map(|payload| decode_snapshot(&payload))
            .transpose()
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        let mut guard = self
            .saved
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the catalog and the save slot behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(repo);
        Self { quizzes, snapshots }
    }
}
