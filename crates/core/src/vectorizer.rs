use regex::Regex;
use std::collections::{HashMap, HashSet};

pub const MIN_TOKEN_CHARS: usize = 3;

pub const STOPWORDS: [&str; 55] = [
    "le", "la", "les", "de", "du", "des", "un", "une", "et", "ou", "à", "au", "aux", "en", "dans",
    "sur", "pour", "par", "avec", "sans", "sous", "chez", "ce", "cette", "ces", "son", "sa", "ses",
    "mon", "ma", "mes", "ton", "ta", "tes", "je", "tu", "il", "elle", "nous", "vous", "ils",
    "elles", "qui", "que", "quoi", "dont", "où", "quand", "comment", "mais", "est", "sont", "pas",
    "plus", "très",
];

/// Sparse term-frequency vector keyed by normalized token.
pub type TermVector = HashMap<String, usize>;

#[derive(Debug, Clone)]
pub struct Vectorizer {
    word_re: Regex,
    stopwords: HashSet<&'static str>,
}

impl Vectorizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            word_re: Regex::new(r"\w+")?,
            stopwords: STOPWORDS.iter().copied().collect(),
        })
    }

    pub fn stopwords_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_re
            .find_iter(&lowered)
            .map(|word| word.as_str())
            .filter(|word| !self.stopwords.contains(*word))
            .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
            .map(str::to_string)
            .collect()
    }

    pub fn vectorize(&self, text: &str) -> TermVector {
        let mut vector = TermVector::new();
        for token in self.tokens(text) {
            *vector.entry(token).or_insert(0) += 1;
        }
        vector
    }
}
