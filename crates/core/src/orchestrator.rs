use crate::chunking::TextChunker;
use crate::handle::SearchHandle;
use crate::models::{CorpusExport, CorpusMetadata, IndexStats, RetrievalConfig, SearchResult};
use crate::search::SemanticSearch;
use crate::traits::{CorpusStore, DocumentSource};
use crate::{IngestError, SearchError};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub documents: usize,
    pub metadata: CorpusMetadata,
    pub location: String,
}

/// Wires scraping, chunking, persistence and the live search engine together.
pub struct RetrievalService<S, C>
where
    S: DocumentSource,
    C: CorpusStore,
{
    source: S,
    store: C,
    chunker: TextChunker,
    handle: SearchHandle,
    config: RetrievalConfig,
}

impl<S, C> RetrievalService<S, C>
where
    S: DocumentSource + Send + Sync,
    C: CorpusStore + Send + Sync,
{
    pub fn new(source: S, store: C, chunker: TextChunker, config: RetrievalConfig) -> Self {
        Self {
            source,
            store,
            chunker,
            handle: SearchHandle::new(),
            config,
        }
    }

    pub fn handle(&self) -> SearchHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Indexes the stored corpus when there is one, otherwise scrapes if configured to.
    /// Returns the metadata of the corpus now live, or `None` when nothing was indexed.
    pub async fn load_or_scrape(&self) -> Result<Option<CorpusMetadata>, IngestError> {
        match self.store.load().await {
            Ok(Some(export)) if !export.chunks.is_empty() => {
                let metadata = export.metadata.clone();
                self.publish(export)?;
                info!(
                    location = %self.store.location(),
                    chunk_count = metadata.total_chunks,
                    "corpus loaded and indexed"
                );
                return Ok(Some(metadata));
            }
            Ok(_) => info!(location = %self.store.location(), "no stored corpus"),
            Err(error) => warn!(
                location = %self.store.location(),
                error = %error,
                "stored corpus unreadable"
            ),
        }

        if !self.config.auto_scrape_on_startup {
            return Ok(None);
        }

        info!("initial scrape starting");
        let report = self.refresh().await?;
        Ok(Some(report.metadata))
    }

    /// Scrapes the seed URLs, then chunks, exports and indexes the result before
    /// swapping it in as the live engine.
    pub async fn refresh(&self) -> Result<RefreshReport, IngestError> {
        let documents = self.source.fetch_documents(&self.config.seed_urls).await?;
        if documents.is_empty() {
            return Err(IngestError::InvalidArgument(format!(
                "no document scraped from {} url(s)",
                self.config.seed_urls.len()
            )));
        }

        let chunks = self.chunker.chunk_documents(&documents);
        info!(
            documents = documents.len(),
            chunk_count = chunks.len(),
            "documents chunked"
        );

        let export = CorpusExport::from_chunks(chunks);
        self.store.save(&export).await?;

        let report = RefreshReport {
            documents: documents.len(),
            metadata: export.metadata.clone(),
            location: self.store.location(),
        };
        self.publish(export)?;
        Ok(report)
    }

    pub fn search(&self, query: &str) -> Result<Option<SearchResult>, SearchError> {
        let engine = self.handle.current().ok_or_else(not_ready)?;
        let options = self.config.search;
        Ok(engine.search(query, options.threshold, options.max_context_length))
    }

    pub fn stats(&self) -> Result<IndexStats, SearchError> {
        let engine = self.handle.current().ok_or_else(not_ready)?;
        Ok(engine.get_stats())
    }

    fn publish(&self, export: CorpusExport) -> Result<(), SearchError> {
        let engine = SemanticSearch::new(export.chunks, self.config.boost_keywords.clone())?;
        self.handle.publish(engine);
        Ok(())
    }
}

fn not_ready() -> SearchError {
    SearchError::NotReady("no corpus has been indexed".to_string())
}
