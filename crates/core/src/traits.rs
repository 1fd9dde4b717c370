use crate::models::{CorpusExport, Document};
use crate::IngestError;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentSource {
    async fn fetch_documents(&self, urls: &[String]) -> Result<Vec<Document>, IngestError>;
}

#[async_trait]
pub trait CorpusStore {
    async fn save(&self, export: &CorpusExport) -> Result<(), IngestError>;

    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<CorpusExport>, IngestError>;

    fn location(&self) -> String;
}
