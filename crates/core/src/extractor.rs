use crate::models::Document;
use crate::traits::DocumentSource;
use crate::IngestError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SKIPPED_TAGS: [&str; 7] = ["script", "style", "nav", "footer", "header", "head", "noscript"];

const BLOCK_TAGS: [&str; 26] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "dt", "dd", "blockquote", "pre", "td", "th",
    "caption", "figcaption", "div", "section", "article", "main", "aside", "form", "table", "ul",
    "ol", "body",
];

/// How extracted block elements are joined in the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockSeparator {
    /// One line per block. The chunker then sees a page as a single paragraph.
    #[default]
    Line,
    /// A blank line between blocks, so each block is its own paragraph.
    Paragraph,
}

impl BlockSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "\n",
            Self::Paragraph => "\n\n",
        }
    }
}

/// Fetches pages over HTTP and turns them into [`Document`]s.
#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    separator: BlockSeparator,
}

impl WebScraper {
    pub fn new(timeout: Duration) -> Result<Self, IngestError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            separator: BlockSeparator::default(),
        })
    }

    pub fn with_separator(mut self, separator: BlockSeparator) -> Self {
        self.separator = separator;
        self
    }

    pub async fn scrape_url(&self, url: &str) -> Result<Document, IngestError> {
        let parsed = Url::parse(url)?;
        let body = self
            .client
            .get(parsed)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let document = extract_document(url, &body, self.separator);
        info!(url = %url, chars = document.text.chars().count(), "page scraped");
        Ok(document)
    }
}

#[async_trait]
impl DocumentSource for WebScraper {
    /// Best effort: pages that fail to download are logged and skipped.
    async fn fetch_documents(&self, urls: &[String]) -> Result<Vec<Document>, IngestError> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            match self.scrape_url(url).await {
                Ok(document) => documents.push(document),
                Err(error) => warn!(url = %url, error = %error, "scrape failed"),
            }
        }
        Ok(documents)
    }
}

/// Extracts the title and readable body text of an HTML page.
///
/// Text under navigation, header, footer, script and style elements is dropped.
/// Text sharing the nearest block element is kept as written, whitespace-collapsed,
/// and blocks are joined with `separator`.
pub fn extract_document(url: &str, html: &str, separator: BlockSeparator) -> Document {
    let parsed = Html::parse_document(html);
    let title = page_title(&parsed).unwrap_or_else(|| url.to_string());
    let text = body_blocks(&parsed).join(separator.as_str());

    Document {
        url: url.to_string(),
        title,
        text,
        scraped_at: Utc::now(),
    }
}

fn page_title(document: &Html) -> Option<String> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "title")
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

fn body_blocks(document: &Html) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut current_block = None;

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|element| SKIPPED_TAGS.contains(&element.value().name()));
        if skipped {
            continue;
        }

        let block = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| BLOCK_TAGS.contains(&element.value().name()))
            .map(|element| element.id());

        if block != current_block {
            push_block(&mut blocks, &current);
            current.clear();
            current_block = block;
        }
        current.push_str(text);
    }

    push_block(&mut blocks, &current);
    blocks
}

fn push_block(blocks: &mut Vec<String>, raw: &str) {
    let collapsed = collapse_whitespace(raw);
    if !collapsed.is_empty() {
        blocks.push(collapsed);
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>  Accueil   NIRD </title>
    <style>body { color: red; }</style>
  </head>
  <body>
    <header>Menu principal</header>
    <nav><a href="/">Accueil</a></nav>
    <main>
      <h1>La démarche NIRD</h1>
      <p>Un numérique <strong>inclusif</strong>, responsable
         et durable.</p>
      <ul>
        <li>Linux</li>
        <li>Reconditionnement</li>
      </ul>
    </main>
    <script>console.log("ignored");</script>
    <footer>Mentions légales</footer>
  </body>
</html>"#;

    #[test]
    fn extracts_title_and_one_line_per_block() {
        let document = extract_document(
            "https://nird.forge.apps.education.fr/",
            PAGE,
            BlockSeparator::Line,
        );
        assert_eq!(document.title, "Accueil NIRD");
        assert_eq!(
            document.text,
            "La démarche NIRD\nUn numérique inclusif, responsable et durable.\nLinux\nReconditionnement"
        );
    }

    #[test]
    fn paragraph_separator_puts_blank_lines_between_blocks() {
        let document = extract_document("https://example.org", PAGE, BlockSeparator::Paragraph);
        assert_eq!(
            document.text,
            "La démarche NIRD\n\nUn numérique inclusif, responsable et durable.\n\nLinux\n\nReconditionnement"
        );
    }

    #[test]
    fn inline_markup_keeps_original_spacing() {
        let document = extract_document(
            "https://example.org",
            "<p>Le <em>libre</em>, c'est <a href=\"/\">durable</a> !</p><p><b>Linux</b> <i>PrimTux</i></p>",
            BlockSeparator::Line,
        );
        assert_eq!(document.text, "Le libre, c'est durable !\nLinux PrimTux");
    }

    #[test]
    fn drops_boilerplate_sections() {
        let document = extract_document("https://example.org", PAGE, BlockSeparator::Line);
        assert!(!document.text.contains("Menu principal"));
        assert!(!document.text.contains("Mentions légales"));
        assert!(!document.text.contains("console.log"));
        assert!(!document.text.contains("color: red"));
    }

    #[test]
    fn missing_title_falls_back_to_url() {
        let document = extract_document(
            "https://example.org/page",
            "<p>Bonjour</p>",
            BlockSeparator::Line,
        );
        assert_eq!(document.title, "https://example.org/page");
        assert_eq!(document.text, "Bonjour");
    }

    #[test]
    fn empty_page_has_no_text() {
        let document = extract_document(
            "https://example.org",
            "<html><body>  </body></html>",
            BlockSeparator::Paragraph,
        );
        assert!(document.text.is_empty());
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_fetching() -> Result<(), Box<dyn std::error::Error>> {
        let scraper = WebScraper::new(DEFAULT_TIMEOUT)?;
        let result = scraper.scrape_url("not a url").await;
        assert!(matches!(result, Err(IngestError::Url(_))));
        Ok(())
    }
}
