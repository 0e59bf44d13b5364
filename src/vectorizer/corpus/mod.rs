use indexmap::IndexMap;

use crate::vectorizer::token::TokenFrequency;

/// keep document count and per-token document frequency
/// Token order is first-seen order, which fixes the vocabulary index order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// number of documents added
    doc_num: u64,
    /// token -> number of documents containing it
    token_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            token_counts: IndexMap::new(),
        }
    }

    /// Add a document's distinct tokens to the corpus
    pub fn add_set<T>(&mut self, tokens: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for token in tokens {
            *self.token_counts.entry(token.as_ref().into()).or_insert(0) += 1;
        }
    }

    /// Add a counted document
    #[inline]
    pub fn add_doc(&mut self, freq: &TokenFrequency) {
        self.add_set(&freq.token_set_ref_str());
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `token`
    #[inline]
    pub fn get_token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Tokens in first-seen order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.token_counts.keys().map(|k| k.as_ref())
    }
}
