pub mod corpus;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};
use crate::vectorizer::{
    corpus::Corpus,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    token::{TokenFrequency, Tokenizer},
};

/// Vocabulary
/// token -> dense index, built from the training split only.
/// Size is fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self {
            tokens: corpus.tokens().map(Box::<str>::from).collect(),
        }
    }

    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_ref())
    }
}

/// IDF table
/// Indexed identically to the vocabulary.
/// It is not sparse because every vocabulary token has a weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    pub idf_vec: Vec<f64>,
    /// training document count
    pub doc_num: u64,
}

impl IdfTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.idf_vec.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idf_vec.is_empty()
    }
}

/// TF-IDF Vectorizer
/// Two-phase: `fit` once on training documents, then `transform` any document.
/// `transform` never touches the vocabulary or IDF table, so train and test
/// cannot leak into each other.
///
/// `E` is the TF-IDF calculation engine (default `DefaultTFIDFEngine`).
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    tokenizer: Tokenizer,
    fitted: Option<(Vocabulary, IdfTable)>,
    _marker: PhantomData<E>,
}

impl<E> Default for TfIdfVectorizer<E>
where
    E: TFIDFEngine,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TfIdfVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Create an unfitted vectorizer
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            fitted: None,
            _marker: PhantomData,
        }
    }

    /// Build the vocabulary and IDF table from training documents
    ///
    /// # Arguments
    /// * `docs` - training texts
    ///
    /// # Errors
    /// * `AlreadyFitted` on a second call
    /// * `DegenerateInput` when `docs` is empty
    pub fn fit<T>(&mut self, docs: &[T]) -> Result<()>
    where
        T: AsRef<str> + Sync,
    {
        if self.fitted.is_some() {
            return Err(ClassifierError::AlreadyFitted);
        }
        if docs.is_empty() {
            return Err(ClassifierError::degenerate(
                Stage::Vectorize,
                "no training documents",
            ));
        }

        let tokenizer = self.tokenizer;
        let freqs: Vec<TokenFrequency> = docs
            .par_iter()
            .map(|doc| tokenizer.token_frequency(doc.as_ref()))
            .collect();

        // first-seen order, so the corpus is built sequentially
        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }

        let vocabulary = Vocabulary::from_corpus(&corpus);
        let idf = IdfTable {
            idf_vec: E::idf_vec(&corpus, &vocabulary),
            doc_num: corpus.get_doc_num(),
        };
        tracing::debug!(
            docs = docs.len(),
            vocab = vocabulary.len(),
            "vocabulary fitted"
        );
        self.fitted = Some((vocabulary, idf));
        Ok(())
    }

    /// Transform one document into a dense TF-IDF vector
    pub fn transform(&self, text: &str) -> Result<Vec<f64>> {
        let (vocabulary, idf) = self.parts()?;
        Ok(Self::vectorize(&self.tokenizer, vocabulary, idf, text))
    }

    /// Transform many documents on the rayon pool
    /// Output order equals input order.
    pub fn transform_batch<T>(&self, docs: &[T]) -> Result<Vec<Vec<f64>>>
    where
        T: AsRef<str> + Sync,
    {
        let (vocabulary, idf) = self.parts()?;
        let tokenizer = &self.tokenizer;
        Ok(docs
            .par_iter()
            .map(|doc| Self::vectorize(tokenizer, vocabulary, idf, doc.as_ref()))
            .collect())
    }

    /// Stateless vectorization against explicit parts
    #[inline]
    pub fn vectorize(
        tokenizer: &Tokenizer,
        vocabulary: &Vocabulary,
        idf: &IdfTable,
        text: &str,
    ) -> Vec<f64> {
        let freq = tokenizer.token_frequency(text);
        E::tfidf_vec(&freq, vocabulary, &idf.idf_vec)
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.fitted.as_ref().map(|(v, _)| v)
    }

    pub fn idf(&self) -> Option<&IdfTable> {
        self.fitted.as_ref().map(|(_, i)| i)
    }

    /// Hand out the fitted parts
    pub fn into_parts(self) -> Result<(Vocabulary, IdfTable)> {
        self.fitted.ok_or(ClassifierError::VocabularyNotFitted)
    }

    #[inline]
    fn parts(&self) -> Result<(&Vocabulary, &IdfTable)> {
        self.fitted
            .as_ref()
            .map(|(v, i)| (v, i))
            .ok_or(ClassifierError::VocabularyNotFitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(docs: &[&str]) -> TfIdfVectorizer {
        let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new();
        vectorizer.fit(docs).unwrap();
        vectorizer
    }

    #[test]
    fn transform_before_fit_fails() {
        let vectorizer: TfIdfVectorizer = TfIdfVectorizer::new();
        assert!(matches!(
            vectorizer.transform("anything"),
            Err(ClassifierError::VocabularyNotFitted)
        ));
    }

    #[test]
    fn second_fit_is_rejected() {
        let mut vectorizer = fitted(&["a b"]);
        assert!(matches!(
            vectorizer.fit(&["c d"]),
            Err(ClassifierError::AlreadyFitted)
        ));
        assert_eq!(vectorizer.vocabulary().unwrap().len(), 2);
    }

    #[test]
    fn fit_on_empty_is_degenerate() {
        let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new();
        let docs: [&str; 0] = [];
        assert!(matches!(
            vectorizer.fit(&docs),
            Err(ClassifierError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn vocabulary_in_first_seen_order() {
        let vectorizer = fitted(&["hoax viral", "viral resmi"]);
        let vocab = vectorizer.vocabulary().unwrap();
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["hoax", "viral", "resmi"]);
        assert_eq!(vocab.index_of("resmi"), Some(2));
    }

    #[test]
    fn tfidf_values() {
        let vectorizer = fitted(&["hoax viral", "viral resmi"]);
        let vec = vectorizer.transform("hoax hoax viral unknown").unwrap();
        let idf = vectorizer.idf().unwrap();

        assert_eq!(vec.len(), 3);
        // tf uses the full token count, unknown included
        assert!((vec[0] - 0.5 * idf.idf_vec[0]).abs() < 1e-12);
        assert!((vec[1] - 0.25 * idf.idf_vec[1]).abs() < 1e-12);
        assert_eq!(vec[2], 0.0);
        // viral is in every doc
        assert!((idf.idf_vec[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_vocabulary_and_empty_give_zero_vectors() {
        let vectorizer = fitted(&["hoax viral"]);
        assert!(vectorizer.transform("").unwrap().iter().all(|&x| x == 0.0));
        assert!(vectorizer
            .transform("totally unseen words")
            .unwrap()
            .iter()
            .all(|&x| x == 0.0));
    }

    #[test]
    fn transform_is_idempotent_and_batch_matches() {
        let vectorizer = fitted(&["hoax viral", "viral resmi", "resmi jalan"]);
        let a = vectorizer.transform("viral jalan jalan").unwrap();
        let b = vectorizer.transform("viral jalan jalan").unwrap();
        assert_eq!(a, b);

        let batch = vectorizer
            .transform_batch(&["viral jalan jalan", "hoax"])
            .unwrap();
        assert_eq!(batch[0], a);
        assert_eq!(batch[1], vectorizer.transform("hoax").unwrap());
    }
}
