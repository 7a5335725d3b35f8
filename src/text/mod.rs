//! Lexical canonicalization and polarity detection.
//!
//! [`Normalizer`] turns raw page text into a [`NormalizedText`]: lowercased,
//! tokenized, stopword-filtered and lemmatized. [`has_negation`] reads the
//! *raw* text, because the stopword list removes `not`/`no`/`nor`.

/// Noun lemmatizer.
pub mod lemma;
/// Negation marker detection.
pub mod negation;
/// English stopword list.
pub mod stopwords;
/// Treebank-style word tokenizer.
pub mod tokenize;

#[cfg(test)]
mod tests;

pub use lemma::lemmatize;
pub use negation::{NEGATION_MARKERS, has_negation};
pub use stopwords::{ENGLISH_STOPWORDS, is_stopword};
pub use tokenize::tokenize;

use serde::Serialize;

/// Space-joined lemmatized tokens. Derived per call, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no token survived normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the surviving tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deterministic English text normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Creates a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Lowercases, tokenizes, drops stopwords and punctuation, lemmatizes.
    ///
    /// Empty or whitespace-only input yields an empty [`NormalizedText`].
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let lemmas: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|token| !is_stopword(token) && !tokenize::is_punctuation(token))
            .map(|token| lemmatize(&token))
            .collect();

        NormalizedText(lemmas.join(" "))
    }
}

/// Normalizes `text` with the default [`Normalizer`].
pub fn normalize(text: &str) -> NormalizedText {
    Normalizer.normalize(text)
}
