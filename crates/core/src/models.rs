use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const FALLBACK_CHUNK_ID: i64 = -1;

pub const FALLBACK_CONTEXT: &str = "La démarche NIRD promeut un numérique Inclusif, Responsable et Durable \
dans les établissements scolaires via Linux, le reconditionnement et les logiciels libres.";

pub const FALLBACK_SOURCE_URL: &str = "https://nird.forge.apps.education.fr/";

pub const FALLBACK_SOURCE_TITLE: &str = "Accueil NIRD";

pub const DEFAULT_BOOST_KEYWORDS: [&str; 11] = [
    "linux",
    "reconditionnement",
    "nird",
    "primtux",
    "tchap",
    "écologique",
    "libre",
    "inclusif",
    "durable",
    "obsolescence",
    "forge",
];

/// A scraped page, ready to be chunked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub text: String,
    pub scraped_at: DateTime<Utc>,
}

impl Document {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
            scraped_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_id: usize,
    pub text: String,
    pub token_count: usize,
    pub source_url: String,
    pub source_title: String,
}

/// Best match for a query, or the fixed fallback when nothing clears the threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub context: String,
    pub confidence: f64,
    pub chunk_id: i64,
    pub source_url: String,
    pub source_title: String,
    pub found: bool,
}

impl SearchResult {
    pub fn fallback() -> Self {
        Self {
            context: FALLBACK_CONTEXT.to_string(),
            confidence: 0.0,
            chunk_id: FALLBACK_CHUNK_ID,
            source_url: FALLBACK_SOURCE_URL.to_string(),
            source_title: FALLBACK_SOURCE_TITLE.to_string(),
            found: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStats {
    pub total_chunks: usize,
    pub total_vectors: usize,
    pub boost_keywords: Vec<String>,
    pub stopwords_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusMetadata {
    pub total_chunks: usize,
    pub total_tokens: usize,
    #[serde(deserialize_with = "deserialize_export_date")]
    pub export_date: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps and offset-less ISO 8601 ones, read as UTC.
fn deserialize_export_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// On-disk corpus layout: summary metadata followed by the chunk list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusExport {
    pub metadata: CorpusMetadata,
    pub chunks: Vec<Chunk>,
}

impl CorpusExport {
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let total_tokens = chunks.iter().map(|chunk| chunk.token_count).sum();
        Self {
            metadata: CorpusMetadata {
                total_chunks: chunks.len(),
                total_tokens,
                export_date: Utc::now(),
            },
            chunks,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchOptions {
    pub threshold: f64,
    pub max_context_length: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            max_context_length: 600,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub seed_urls: Vec<String>,
    pub boost_keywords: Vec<String>,
    pub search: SearchOptions,
    pub auto_scrape_on_startup: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            seed_urls: vec![FALLBACK_SOURCE_URL.to_string()],
            boost_keywords: DEFAULT_BOOST_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            search: SearchOptions::default(),
            auto_scrape_on_startup: true,
        }
    }
}
