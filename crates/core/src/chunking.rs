use crate::error::IngestError;
use crate::models::{Chunk, Document};
use crate::tokens::TokenCounter;
use tracing::debug;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Soft upper bound on chunk length, in characters.
    pub chunk_size: usize,
    /// Accepted for configuration compatibility; chunk boundaries ignore it.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TextChunker {
    config: ChunkingConfig,
    counter: TokenCounter,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig, counter: TokenCounter) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self { config, counter })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Groups blank-line separated paragraphs into chunks of at most `chunk_size`
    /// characters. A paragraph is never split, so an oversized one becomes its own chunk.
    pub fn chunk_text(&self, text: &str, source_url: &str, source_title: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0usize;

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            if paragraph.trim().is_empty() {
                continue;
            }

            let paragraph_chars = paragraph.chars().count();
            if current_chars + paragraph_chars > self.config.chunk_size && !current.is_empty() {
                chunks.push(self.make_chunk(chunks.len(), &current, source_url, source_title));
                current.clear();
                current_chars = 0;
            }

            current.push_str(paragraph);
            current.push_str(PARAGRAPH_SEPARATOR);
            current_chars += paragraph_chars + PARAGRAPH_SEPARATOR.len();
        }

        if !current.is_empty() {
            chunks.push(self.make_chunk(chunks.len(), &current, source_url, source_title));
        }

        chunks
    }

    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();
        for document in documents {
            let chunks = self.chunk_text(&document.text, &document.url, &document.title);
            debug!(url = %document.url, chunk_count = chunks.len(), "document chunked");
            all_chunks.extend(chunks);
        }
        all_chunks
    }

    fn make_chunk(&self, chunk_id: usize, buffer: &str, source_url: &str, source_title: &str) -> Chunk {
        Chunk {
            chunk_id,
            text: buffer.trim().to_string(),
            token_count: self.count_tokens(buffer),
            source_url: source_url.to_string(),
            source_title: source_title.to_string(),
        }
    }
}
