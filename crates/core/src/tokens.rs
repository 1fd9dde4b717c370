use std::fmt;
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::warn;

pub const CHARS_PER_TOKEN: usize = 4;

/// Counts tokens through a loaded tokenizer codec, or approximates when none is available.
#[derive(Default)]
pub enum TokenCounter {
    Codec(Box<Tokenizer>),
    #[default]
    Approximate,
}

impl TokenCounter {
    /// Loads a `tokenizer.json`; falls back to the character approximation when
    /// no path is given or the file cannot be loaded.
    pub fn from_tokenizer_file(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Approximate;
        };

        match Tokenizer::from_file(path) {
            Ok(tokenizer) => Self::Codec(Box::new(tokenizer)),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "tokenizer unavailable, approximating token counts"
                );
                Self::Approximate
            }
        }
    }

    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Codec(tokenizer) => match tokenizer.encode(text, false) {
                Ok(encoding) => encoding.get_ids().len(),
                Err(error) => {
                    warn!(error = %error, "tokenizer failed to encode chunk");
                    approximate_tokens(text)
                }
            },
            Self::Approximate => approximate_tokens(text),
        }
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(_) => f.write_str("TokenCounter::Codec"),
            Self::Approximate => f.write_str("TokenCounter::Approximate"),
        }
    }
}

pub fn approximate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}
