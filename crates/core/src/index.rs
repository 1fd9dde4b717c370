use crate::models::{Chunk, IndexStats};
use crate::vectorizer::{TermVector, Vectorizer};
use tracing::info;

#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub vector: TermVector,
}

/// Chunks paired with their term vectors, in corpus order. Immutable once built.
#[derive(Debug, Clone)]
pub struct ChunkIndex {
    entries: Vec<IndexedChunk>,
    boost_keywords: Vec<String>,
    vectorizer: Vectorizer,
}

impl ChunkIndex {
    pub fn build(chunks: Vec<Chunk>, boost_keywords: Vec<String>, vectorizer: Vectorizer) -> Self {
        info!(chunk_count = chunks.len(), "indexing chunks");
        let entries = chunks
            .into_iter()
            .map(|chunk| {
                let vector = vectorizer.vectorize(&chunk.text);
                IndexedChunk { chunk, vector }
            })
            .collect::<Vec<_>>();
        info!(vector_count = entries.len(), "indexing complete");

        Self {
            entries,
            boost_keywords,
            vectorizer,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Chunk, &TermVector)> {
        self.entries.iter().map(|entry| (&entry.chunk, &entry.vector))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn boost_keywords(&self) -> &[String] {
        &self.boost_keywords
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_chunks: self.entries.len(),
            total_vectors: self.entries.len(),
            boost_keywords: self.boost_keywords.clone(),
            stopwords_count: self.vectorizer.stopwords_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(chunk_id: usize, text: &str) -> Chunk {
        Chunk {
            chunk_id,
            text: text.to_string(),
            token_count: 0,
            source_url: "https://example.org".to_string(),
            source_title: "Example".to_string(),
        }
    }

    #[test]
    fn vectors_follow_chunk_order() {
        let vectorizer = Vectorizer::new().expect("word pattern compiles");
        let index = ChunkIndex::build(
            vec![chunk(0, "linux libre"), chunk(1, "forge forge")],
            Vec::new(),
            vectorizer,
        );

        let entries: Vec<_> = index.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.chunk_id, 0);
        assert_eq!(entries[0].1.get("linux"), Some(&1));
        assert_eq!(entries[1].0.chunk_id, 1);
        assert_eq!(entries[1].1.get("forge"), Some(&2));
    }

    #[test]
    fn stats_report_index_shape() {
        let vectorizer = Vectorizer::new().expect("word pattern compiles");
        let index = ChunkIndex::build(
            vec![chunk(0, "linux"), chunk(1, "tchap"), chunk(2, "")],
            vec!["linux".to_string()],
            vectorizer,
        );

        let stats = index.stats();
        assert_eq!(stats.total_chunks, 3);
        assert_eq!(stats.total_vectors, 3);
        assert_eq!(stats.boost_keywords, vec!["linux".to_string()]);
        assert_eq!(stats.stopwords_count, 55);
    }
}
