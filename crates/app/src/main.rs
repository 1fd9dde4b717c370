use chrono::Utc;
use chunk_search_core::{
    BlockSeparator, ChunkingConfig, CorpusStore, JsonCorpusStore, RetrievalConfig,
    RetrievalService, SearchOptions, TextChunker, TokenCounter, WebScraper,
    DEFAULT_BOOST_KEYWORDS, DEFAULT_CORPUS_FILE,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "chunk-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON file holding the chunked corpus
    #[arg(long, env = "CHUNK_SEARCH_DATA_FILE", default_value = DEFAULT_CORPUS_FILE)]
    data_file: PathBuf,

    /// Optional tokenizer.json used to count chunk tokens. Without it, token
    /// counts are approximate (4 characters per token).
    #[arg(long, env = "CHUNK_SEARCH_TOKENIZER")]
    tokenizer: Option<PathBuf>,

    /// Pages to scrape
    #[arg(
        long = "url",
        env = "CHUNK_SEARCH_URLS",
        value_delimiter = ',',
        default_value = "https://nird.forge.apps.education.fr/"
    )]
    urls: Vec<String>,

    /// Soft maximum chunk length, in characters
    #[arg(long, env = "CHUNK_SEARCH_CHUNK_SIZE", default_value = "1000")]
    chunk_size: usize,

    /// Chunk overlap, in characters (recorded, not applied)
    #[arg(long, env = "CHUNK_SEARCH_CHUNK_OVERLAP", default_value = "200")]
    chunk_overlap: usize,

    /// Minimum similarity a match must exceed
    #[arg(long, env = "CHUNK_SEARCH_THRESHOLD", default_value = "0.12")]
    threshold: f64,

    /// Maximum context length returned, in characters
    #[arg(long, env = "CHUNK_SEARCH_MAX_CONTEXT_LENGTH", default_value = "600")]
    max_context_length: usize,

    /// Keywords that boost every candidate when present in the query
    #[arg(long = "boost-keyword", env = "CHUNK_SEARCH_BOOST_KEYWORDS", value_delimiter = ',')]
    boost_keywords: Vec<String>,

    /// HTTP timeout for scraping, in seconds
    #[arg(long, env = "CHUNK_SEARCH_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// How scraped HTML blocks are joined: one per line, or one paragraph each
    #[arg(long, value_enum, env = "CHUNK_SEARCH_BLOCK_SEPARATOR", default_value_t = Separator::Line)]
    block_separator: Separator,

    /// Never scrape implicitly when no corpus is stored
    #[arg(long, default_value_t = false)]
    no_auto_scrape: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Separator {
    Line,
    Paragraph,
}

impl From<Separator> for BlockSeparator {
    fn from(value: Separator) -> Self {
        match value {
            Separator::Line => BlockSeparator::Line,
            Separator::Paragraph => BlockSeparator::Paragraph,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the configured pages, then chunk, export and index them.
    Scrape,
    /// Return the best matching chunk for a query.
    Search {
        /// Search query
        #[arg(long)]
        query: String,
        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print stored corpus metadata, index statistics and configuration.
    Stats,
}

impl Cli {
    fn retrieval_config(&self) -> RetrievalConfig {
        let boost_keywords = if self.boost_keywords.is_empty() {
            DEFAULT_BOOST_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect()
        } else {
            self.boost_keywords.clone()
        };

        RetrievalConfig {
            seed_urls: self.urls.clone(),
            boost_keywords,
            search: SearchOptions {
                threshold: self.threshold,
                max_context_length: self.max_context_length,
            },
            auto_scrape_on_startup: !self.no_auto_scrape,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let chunking = ChunkingConfig {
        chunk_size: cli.chunk_size,
        chunk_overlap: cli.chunk_overlap,
    };
    let chunker = TextChunker::new(
        chunking,
        TokenCounter::from_tokenizer_file(cli.tokenizer.as_deref()),
    )?;
    let scraper = WebScraper::new(Duration::from_secs(cli.timeout_secs))?
        .with_separator(cli.block_separator.into());
    let store = JsonCorpusStore::new(&cli.data_file);
    let service = RetrievalService::new(scraper, store, chunker, cli.retrieval_config());

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "chunk-search boot"
    );

    match cli.command {
        Command::Scrape => {
            let report = service.refresh().await?;
            println!(
                "{} document(s), {} chunks, {} tokens exported to {} at {}",
                report.documents,
                report.metadata.total_chunks,
                report.metadata.total_tokens,
                report.location,
                Utc::now().to_rfc3339()
            );
        }
        Command::Search { query, json } => {
            if service.load_or_scrape().await?.is_none() {
                warn!(location = %service.store().location(), "no corpus available");
            }

            let Some(result) = service.search(&query)? else {
                println!("empty query: no search performed");
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "found={} confidence={:.3} chunk={}",
                    result.found, result.confidence, result.chunk_id
                );
                println!("  source={} ({})", result.source_url, result.source_title);
                println!("  context:\n{}", result.context);
            }
        }
        Command::Stats => {
            let Some(metadata) = service.load_or_scrape().await? else {
                anyhow::bail!("no indexed data at {}", service.store().location());
            };

            let stats = service.stats()?;
            let config = service.config();
            let chunking = service.chunker().config();

            println!("data_file: {}", service.store().location());
            println!(
                "metadata: total_chunks={} total_tokens={} export_date={}",
                metadata.total_chunks,
                metadata.total_tokens,
                metadata.export_date.to_rfc3339()
            );
            println!(
                "search_stats: total_chunks={} total_vectors={} stopwords_count={}",
                stats.total_chunks, stats.total_vectors, stats.stopwords_count
            );
            println!("boost_keywords: {}", stats.boost_keywords.join(", "));
            println!(
                "config: urls={} chunk_size={} chunk_overlap={} similarity_threshold={:.2} max_context_length={}",
                config.seed_urls.join(","),
                chunking.chunk_size,
                chunking.chunk_overlap,
                config.search.threshold,
                config.search.max_context_length
            );
        }
    }

    Ok(())
}
