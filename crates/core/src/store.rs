use crate::models::CorpusExport;
use crate::traits::CorpusStore;
use crate::IngestError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub const DEFAULT_CORPUS_FILE: &str = "data/nird_chunks.json";

/// Corpus persisted as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonCorpusStore {
    path: PathBuf,
}

impl JsonCorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonCorpusStore {
    fn default() -> Self {
        Self::new(DEFAULT_CORPUS_FILE)
    }
}

#[async_trait]
impl CorpusStore for JsonCorpusStore {
    async fn save(&self, export: &CorpusExport) -> Result<(), IngestError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_vec_pretty(export)?;
        fs::write(&self.path, payload).await?;
        info!(
            path = %self.path.display(),
            chunk_count = export.metadata.total_chunks,
            "corpus exported"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<CorpusExport>, IngestError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let export = serde_json::from_slice(&bytes)?;
        Ok(Some(export))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
