//! Persistence Gateway — per-person directories under the data dir, one file
//! per artifact. Saving is last-write-wins; re-uploading the same person
//! overwrites the previous bundle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::extractors::SourceRecord;
use crate::links::sanitize_storage_key;
use crate::synthesis::AnalysisResult;

const RESUME_FILE: &str = "resume_text.txt";
const ANALYSIS_FILE: &str = "analysis.json";
const RECORDS_FILE: &str = "source_records.json";
const JD_FILE: &str = "job_description.txt";
const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub person_name: String,
    pub storage_key: String,
    pub saved_at: DateTime<Utc>,
    pub has_resume: bool,
    pub has_analysis: bool,
    pub has_source_records: bool,
    pub has_job_description: bool,
}

/// Everything persisted for one person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonBundle {
    pub person_name: String,
    pub resume_text: String,
    pub analysis: AnalysisResult,
    pub source_records: BTreeMap<String, SourceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    pub metadata: BundleMetadata,
}

impl PersonBundle {
    pub fn new(
        person_name: String,
        resume_text: String,
        analysis: AnalysisResult,
        source_records: BTreeMap<String, SourceRecord>,
        job_description: Option<String>,
    ) -> Self {
        let metadata = BundleMetadata {
            storage_key: sanitize_storage_key(&person_name),
            saved_at: Utc::now(),
            has_resume: !resume_text.is_empty(),
            has_analysis: !analysis.summary.is_empty(),
            has_source_records: !source_records.is_empty(),
            has_job_description: job_description.is_some(),
            person_name: person_name.clone(),
        };
        Self {
            person_name,
            resume_text,
            analysis,
            source_records,
            job_description,
            metadata,
        }
    }
}

/// Listing entry for `GET /api/v1/persons`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSummary {
    pub person_name: String,
    pub storage_key: String,
    pub saved_at: DateTime<Utc>,
    pub has_analysis: bool,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save(&self, bundle: &PersonBundle) -> Result<(), StorageError>;
    async fn load(&self, person_name: &str) -> Result<Option<PersonBundle>, StorageError>;
    async fn list(&self) -> Result<Vec<PersonSummary>, StorageError>;
}

/// Filesystem-backed store: `<data_dir>/<storage_key>/` holding one file per
/// bundle artifact.
pub struct FsProfileStore {
    root: PathBuf,
}

impl FsProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn person_dir(&self, person_name: &str) -> PathBuf {
        self.root.join(sanitize_storage_key(person_name))
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    async fn save(&self, bundle: &PersonBundle) -> Result<(), StorageError> {
        let dir = self.person_dir(&bundle.person_name);
        fs::create_dir_all(&dir).await?;

        fs::write(dir.join(RESUME_FILE), &bundle.resume_text).await?;
        fs::write(
            dir.join(ANALYSIS_FILE),
            serde_json::to_vec_pretty(&bundle.analysis)?,
        )
        .await?;
        fs::write(
            dir.join(RECORDS_FILE),
            serde_json::to_vec_pretty(&bundle.source_records)?,
        )
        .await?;
        match &bundle.job_description {
            Some(jd) => fs::write(dir.join(JD_FILE), jd).await?,
            // A re-upload without a JD must not leave the old one behind.
            None => {
                if fs::try_exists(dir.join(JD_FILE)).await.unwrap_or(false) {
                    fs::remove_file(dir.join(JD_FILE)).await?;
                }
            }
        }
        fs::write(
            dir.join(METADATA_FILE),
            serde_json::to_vec_pretty(&bundle.metadata)?,
        )
        .await?;

        debug!("saved bundle for {} at {}", bundle.person_name, dir.display());
        Ok(())
    }

    async fn load(&self, person_name: &str) -> Result<Option<PersonBundle>, StorageError> {
        let dir = self.person_dir(person_name);
        let metadata_path = dir.join(METADATA_FILE);
        if !fs::try_exists(&metadata_path).await.unwrap_or(false) {
            return Ok(None);
        }

        let metadata: BundleMetadata =
            serde_json::from_slice(&fs::read(&metadata_path).await?)?;
        let resume_text = read_text_or_default(&dir.join(RESUME_FILE)).await;
        let analysis = match fs::read(dir.join(ANALYSIS_FILE)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(_) => AnalysisResult::default(),
        };
        let source_records = match fs::read(dir.join(RECORDS_FILE)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(_) => BTreeMap::new(),
        };
        let job_description = match fs::read_to_string(dir.join(JD_FILE)).await {
            Ok(text) => Some(text),
            Err(_) => None,
        };

        Ok(Some(PersonBundle {
            person_name: metadata.person_name.clone(),
            resume_text,
            analysis,
            source_records,
            job_description,
            metadata,
        }))
    }

    async fn list(&self) -> Result<Vec<PersonSummary>, StorageError> {
        let mut summaries = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            // No data dir yet means nothing saved yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(summaries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata_path = entry.path().join(METADATA_FILE);
            let bytes = match fs::read(&metadata_path).await {
                Ok(bytes) => bytes,
                Err(_) => continue,
            };
            match serde_json::from_slice::<BundleMetadata>(&bytes) {
                Ok(metadata) => summaries.push(PersonSummary {
                    person_name: metadata.person_name,
                    storage_key: metadata.storage_key,
                    saved_at: metadata.saved_at,
                    has_analysis: metadata.has_analysis,
                }),
                Err(e) => warn!("skipping unreadable metadata at {}: {e}", metadata_path.display()),
            }
        }

        summaries.sort_by(|a, b| a.storage_key.cmp(&b.storage_key));
        Ok(summaries)
    }
}

async fn read_text_or_default(path: &Path) -> String {
    fs::read_to_string(path).await.unwrap_or_default()
}
