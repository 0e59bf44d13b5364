use indexmap::IndexMap;

/// Text tokenizer
/// Lowercases, strips punctuation and splits on whitespace.
/// Stateless, so one instance can be shared across threads.
///
/// # Examples
/// ```
/// use news_classifier::Tokenizer;
/// let tokens = Tokenizer::new().tokenize("Viral!  Sebarkan, SEKARANG.");
/// assert_eq!(tokens, vec!["viral", "sebarkan", "sekarang"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer
    }

    /// textをトークン列に変換する
    ///
    /// # Arguments
    /// * `text` - raw document text
    ///
    /// # Returns
    /// * `Vec<String>` - normalized tokens, empty for blank input
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        cleaned
            .split_whitespace()
            .map(str::to_owned)
            .collect()
    }

    /// tokenize and count in one step
    #[inline]
    pub fn token_frequency(&self, text: &str) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&self.tokenize(text));
        freq
    }
}

/// TokenFrequency
/// Per-document token occurrence counts.
/// Base data for TF (term frequency) calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - token to add
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// Total number of tokens, out-of-vocabulary ones included
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Distinct tokens in first-seen order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(String::as_str).collect()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_token_count == 0
    }
}
