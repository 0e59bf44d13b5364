use crate::vectorizer::{corpus::Corpus, token::TokenFrequency, Vocabulary};

/// TF-IDF calculation engine
/// Plug a different strategy into `TfIdfVectorizer<E>` by implementing this.
pub trait TFIDFEngine {
    /// IDFベクトルを生成する
    ///
    /// # Arguments
    /// * `corpus` - training corpus
    /// * `vocabulary` - token dimension order
    ///
    /// # Returns
    /// * `Vec<f64>` - one weight per vocabulary index
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f64>;

    /// TFIDFベクトルを生成する
    /// Tokens outside `vocabulary` are ignored.
    fn tfidf_vec(freq: &TokenFrequency, vocabulary: &Vocabulary, idf: &[f64]) -> Vec<f64>;
}

/// Default engine
/// - IDF: `ln((N + 1) / (df + 1)) + 1`, finite even for tokens in every document
/// - TF: `count / total tokens in the document`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((doc_num as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<f64> {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .iter()
            .map(|token| Self::idf(doc_num, corpus.get_token_count(token)))
            .collect()
    }

    fn tfidf_vec(freq: &TokenFrequency, vocabulary: &Vocabulary, idf: &[f64]) -> Vec<f64> {
        let mut vec = vec![0.0; vocabulary.len()];
        if freq.is_empty() {
            return vec;
        }
        let total = freq.token_sum() as f64;
        for (token, count) in freq.iter() {
            if let Some(idx) = vocabulary.index_of(token) {
                vec[idx] = (count as f64 / total) * idf[idx];
            }
        }
        vec
    }
}
