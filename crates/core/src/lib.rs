pub mod chunking;
pub mod error;
pub mod extractor;
pub mod handle;
pub mod index;
pub mod models;
pub mod orchestrator;
pub mod search;
pub mod similarity;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod vectorizer;

pub use chunking::{ChunkingConfig, TextChunker};
pub use error::{IngestError, SearchError};
pub use extractor::{extract_document, BlockSeparator, WebScraper, DEFAULT_TIMEOUT};
pub use handle::SearchHandle;
pub use index::{ChunkIndex, IndexedChunk};
pub use models::{
    Chunk, CorpusExport, CorpusMetadata, Document, IndexStats, RetrievalConfig, SearchOptions,
    SearchResult, DEFAULT_BOOST_KEYWORDS, FALLBACK_CHUNK_ID,
};
pub use orchestrator::{RefreshReport, RetrievalService};
pub use search::{truncate_context, SemanticSearch, KEYWORD_BOOST};
pub use similarity::cosine_similarity;
pub use store::{JsonCorpusStore, DEFAULT_CORPUS_FILE};
pub use tokens::TokenCounter;
pub use traits::{CorpusStore, DocumentSource};
pub use vectorizer::{TermVector, Vectorizer, STOPWORDS};
