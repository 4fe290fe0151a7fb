use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{QuestionBank, TopicId, TopicSummary};

use crate::repository::{QuizRepository, StorageError};

mod records;

use records::{ManifestEntry, ManifestRecord, QuizFileRecord, bank_from_record, record_from_bank};

/// Name of the catalog manifest inside the quiz directory.
pub const MANIFEST_FILE: &str = "quizzes.json";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn io(path: &Path, e: &std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        return StorageError::NotFound;
    }
    StorageError::Io(format!("{}: {e}", path.display()))
}

/// Quiz catalog read from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonQuizRepository {
    root: PathBuf,
}

impl JsonQuizRepository {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_manifest(&self) -> Result<ManifestRecord, StorageError> {
        let path = self.root.join(MANIFEST_FILE);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io(&path, &e))?;
        serde_json::from_str(&raw).map_err(ser)
    }

    async fn find_entry(&self, topic: &TopicId) -> Result<ManifestEntry, StorageError> {
        self.read_manifest()
            .await?
            .available
            .into_iter()
            .find(|entry| entry.id.trim() == topic.as_str())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl QuizRepository for JsonQuizRepository {
    async fn list_topics(&self) -> Result<Vec<TopicSummary>, StorageError> {
        let manifest = self.read_manifest().await?;
        manifest
            .available
            .iter()
            .map(|entry| entry.to_summary().map_err(ser))
            .collect()
    }

    async fn load_questions(&self, topic: &TopicId) -> Result<QuestionBank, StorageError> {
        let entry = self.find_entry(topic).await?;
        let path = self.root.join(&entry.file);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            // A manifest pointing at a missing file is a broken catalog, not a missing topic.
            StorageError::Io(format!("{}: {e}", path.display()))
        })?;
        let record: QuizFileRecord = serde_json::from_str(&raw).map_err(ser)?;
        let bank = bank_from_record(record).map_err(ser)?;
        tracing::debug!(topic = %topic, file = %path.display(), "loaded question bank");
        Ok(bank)
    }
}

/// Write a catalog (manifest plus one file per topic) into `root`, replacing any
/// existing manifest.
///
/// # Errors
///
/// Returns `StorageError` if the directory or any file cannot be written.
pub async fn write_catalog(
    root: &Path,
    topics: &[(TopicSummary, QuestionBank)],
) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| io(root, &e))?;

    let mut manifest = ManifestRecord::default();
    for (summary, bank) in topics {
        let entry = ManifestEntry::from_summary(summary);
        let path = root.join(&entry.file);
        let body = serde_json::to_string_pretty(&record_from_bank(bank)).map_err(ser)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| io(&path, &e))?;
        manifest.available.push(entry);
    }

    let path = root.join(MANIFEST_FILE);
    let body = serde_json::to_string_pretty(&manifest).map_err(ser)?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|e| io(&path, &e))?;
    Ok(())
}
