use crate::error::SearchError;
use crate::index::ChunkIndex;
use crate::models::{Chunk, IndexStats, SearchResult};
use crate::similarity::cosine_similarity;
use crate::vectorizer::Vectorizer;

pub const KEYWORD_BOOST: f64 = 0.18;

const ELLIPSIS: &str = "...";

/// Best-match retrieval over a fixed chunk corpus.
#[derive(Debug, Clone)]
pub struct SemanticSearch {
    index: ChunkIndex,
}

impl SemanticSearch {
    pub fn new(chunks: Vec<Chunk>, boost_keywords: Vec<String>) -> Result<Self, SearchError> {
        let vectorizer = Vectorizer::new()?;
        Ok(Self {
            index: ChunkIndex::build(chunks, boost_keywords, vectorizer),
        })
    }

    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    /// Returns `None` for a blank query. Otherwise returns the highest scoring chunk
    /// when its score is above `threshold`, or the fallback result.
    ///
    /// Every matching boost keyword adds [`KEYWORD_BOOST`] to each candidate, so boosts
    /// inflate the reported confidence without changing the ranking. Ties keep the
    /// earliest chunk in index order.
    pub fn search(
        &self,
        query: &str,
        threshold: f64,
        max_context_length: usize,
    ) -> Option<SearchResult> {
        if query.trim().is_empty() {
            return None;
        }

        let query_vector = self.index.vectorizer().vectorize(query);
        let query_lower = query.to_lowercase();

        let mut best_score = 0.0;
        let mut best_chunk: Option<&Chunk> = None;

        for (chunk, vector) in self.index.iter() {
            let mut score = cosine_similarity(&query_vector, vector);

            for keyword in self.index.boost_keywords() {
                if query_lower.contains(keyword.as_str()) {
                    score += KEYWORD_BOOST;
                }
            }

            if score > best_score {
                best_score = score;
                best_chunk = Some(chunk);
            }
        }

        let result = match best_chunk {
            Some(chunk) if best_score > threshold => SearchResult {
                context: truncate_context(chunk.text.trim(), max_context_length),
                confidence: round_confidence(best_score),
                chunk_id: chunk.chunk_id as i64,
                source_url: chunk.source_url.clone(),
                source_title: chunk.source_title.clone(),
                found: true,
            },
            _ => SearchResult::fallback(),
        };

        Some(result)
    }

    pub fn get_stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// Cuts `text` to at most `max_chars` characters at the last space and appends an
/// ellipsis. Line breaks are not cut points. Text within the limit is returned unchanged.
pub fn truncate_context(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let prefix = &text[..cut];
    let kept = match prefix.rfind(' ') {
        Some(boundary) => &prefix[..boundary],
        None => prefix,
    };

    format!("{kept}{ELLIPSIS}")
}

fn round_confidence(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FALLBACK_CHUNK_ID, FALLBACK_SOURCE_URL};

    fn chunk(chunk_id: usize, text: &str) -> Chunk {
        Chunk {
            chunk_id,
            text: text.to_string(),
            token_count: text.chars().count() / 4,
            source_url: format!("https://example.org/{chunk_id}"),
            source_title: format!("Page {chunk_id}"),
        }
    }

    fn engine(chunks: Vec<Chunk>, keywords: &[&str]) -> SemanticSearch {
        SemanticSearch::new(
            chunks,
            keywords.iter().map(|keyword| keyword.to_string()).collect(),
        )
        .expect("engine builds")
    }

    #[test]
    fn blank_query_performs_no_search() {
        let engine = engine(vec![chunk(0, "linux libre")], &["linux"]);
        assert!(engine.search("", 0.12, 600).is_none());
        assert!(engine.search("   \n\t", 0.0, 10).is_none());
        assert!(engine.search("", -1.0, 1).is_none());
    }

    #[test]
    fn boosted_exact_match_exceeds_one() {
        let engine = engine(vec![chunk(0, "linux reconditionnement durable")], &["linux"]);

        let exact = engine
            .search("linux reconditionnement durable", 0.12, 600)
            .expect("query is not blank");
        assert!(exact.found);
        assert!(exact.confidence >= 1.0);
        assert!((exact.confidence - 1.18).abs() < 1e-9);
        assert_eq!(exact.chunk_id, 0);

        let single = engine.search("linux", 0.12, 600).expect("query is not blank");
        assert!(single.found);
        assert!((single.confidence - 0.757).abs() < 1e-9);
        assert_eq!(single.context, "linux reconditionnement durable");
    }

    #[test]
    fn unrelated_query_returns_fallback() {
        let engine = engine(
            vec![chunk(0, "linux reconditionnement"), chunk(1, "forge logicielle")],
            &["linux"],
        );
        let result = engine
            .search("recette gâteau chocolat", 0.12, 600)
            .expect("query is not blank");
        assert!(!result.found);
        assert_eq!(result.chunk_id, FALLBACK_CHUNK_ID);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.source_url, FALLBACK_SOURCE_URL);
    }

    #[test]
    fn score_equal_to_threshold_falls_back() {
        let engine = engine(vec![chunk(0, "primtux")], &[]);
        let result = engine.search("primtux", 1.0, 600).expect("query is not blank");
        assert!(!result.found);
    }

    #[test]
    fn boost_lets_weak_match_clear_threshold() {
        let engine = engine(vec![chunk(0, "tchap messagerie")], &["nird"]);
        // No shared token, but the boost lifts every candidate to 0.18.
        let result = engine
            .search("qu'est-ce que nird ?", 0.12, 600)
            .expect("query is not blank");
        assert!(result.found);
        assert_eq!(result.chunk_id, 0);
        assert!((result.confidence - 0.18).abs() < 1e-9);
    }

    #[test]
    fn each_matching_keyword_adds_its_boost() {
        let engine = engine(vec![chunk(0, "forge")], &["linux", "libre", "tchap"]);
        let result = engine
            .search("linux libre", 0.12, 600)
            .expect("query is not blank");
        assert!((result.confidence - 0.36).abs() < 1e-9);
    }

    #[test]
    fn best_scoring_chunk_wins() {
        let engine = engine(
            vec![
                chunk(0, "forge des communs"),
                chunk(1, "linux sur les ordinateurs reconditionnés"),
                chunk(2, "tchap messagerie"),
            ],
            &[],
        );
        let result = engine
            .search("ordinateurs reconditionnés linux", 0.12, 600)
            .expect("query is not blank");
        assert!(result.found);
        assert_eq!(result.chunk_id, 1);
        assert_eq!(result.source_title, "Page 1");
        assert_eq!(result.source_url, "https://example.org/1");
    }

    #[test]
    fn ties_keep_the_earliest_chunk() {
        let engine = engine(
            vec![
                chunk(3, "logiciels libres"),
                chunk(7, "logiciels libres"),
            ],
            &[],
        );
        let result = engine
            .search("logiciels libres", 0.12, 600)
            .expect("query is not blank");
        assert_eq!(result.chunk_id, 3);
    }

    #[test]
    fn long_context_is_truncated_at_whitespace() {
        let text = "linux ".repeat(30);
        let engine = engine(vec![chunk(0, &text)], &[]);
        let result = engine.search("linux", 0.12, 20).expect("query is not blank");
        assert!(result.found);
        assert_eq!(result.context, "linux linux linux...");
        assert!(result.context.chars().count() <= 20 + ELLIPSIS.len());
    }

    #[test]
    fn truncation_handles_edges() {
        assert_eq!(truncate_context("alpha beta gamma delta", 12), "alpha beta...");
        assert_eq!(truncate_context("short", 5), "short");
        assert_eq!(truncate_context("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_context("éé éé éé", 4), "éé...");
    }

    #[test]
    fn truncation_cuts_at_spaces_not_paragraph_breaks() {
        assert_eq!(
            truncate_context("Linux libre pour tous\n\nPrimTux", 25),
            "Linux libre pour..."
        );
        assert_eq!(truncate_context("alpha\n\nbeta gamma", 9), "alpha\n\nbe...");
    }

    #[test]
    fn stats_expose_index_shape() {
        let engine = engine(vec![chunk(0, "linux"), chunk(1, "forge")], &["linux", "forge"]);
        let stats = engine.get_stats();
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.total_vectors, 2);
        assert_eq!(stats.boost_keywords.len(), 2);
        assert_eq!(stats.stopwords_count, 55);
    }
}
