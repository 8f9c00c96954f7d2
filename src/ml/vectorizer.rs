//! TF-IDF vectorizer for text feature extraction.
//!
//! Fitting analyzes every training document, expands the tokens into word
//! n-grams, and keeps at most `max_features` terms ranked by
//! `corpus_tf(t) * ln(N / df(t))`. Ties keep the term seen first. The
//! resulting [`Vocabulary`] numbers the kept terms in first-occurrence order.
//!
//! Transforming maps a text to a [`FeatureVector`] whose component for term
//! `t` is `tf(t, d) * ln(N / df(t))`, with `N` and `df` frozen at fit time.
//!
//! # Example
//!
//! ```
//! use flare::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};
//!
//! # fn main() -> flare::error::Result<()> {
//! let corpus = ["forest fire spreading", "sunny day at the beach"];
//! let mut vectorizer = TfIdfVectorizer::with_config(VectorizerConfig::default())?;
//! vectorizer.fit(&corpus)?;
//!
//! let features = vectorizer.transform(&["fire near the forest"])?;
//! assert_eq!(features[0].dimension(), vectorizer.dimension()?);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::analyzer::{Analyzer, TweetAnalyzer};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::shingle::{MAX_SHINGLE_SIZE, ShingleFilter};
use crate::error::{FlareError, Result};
use crate::ml::feature_vector::FeatureVector;

/// Vectorizer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Upper bound on the vocabulary size.
    pub max_features: usize,
    /// Inclusive `(min, max)` word n-gram sizes.
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 10_000,
            ngram_range: (1, 2),
        }
    }
}

impl VectorizerConfig {
    /// Check that the options describe a usable vectorizer.
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(FlareError::invalid_config("max_features must be at least 1"));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || max_n < min_n || max_n > MAX_SHINGLE_SIZE {
            return Err(FlareError::invalid_config(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max <= {MAX_SHINGLE_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Ordered mapping from term to feature index, fixed at fit time.
///
/// Serializes as an ordered list of `{token, index, document_frequency}`
/// entries plus the training corpus size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyData", into = "VocabularyData")]
pub struct Vocabulary {
    tokens: Vec<String>,
    document_frequencies: Vec<usize>,
    n_documents: usize,
    index: AHashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct VocabularyEntry {
    token: String,
    index: usize,
    document_frequency: usize,
}

#[derive(Serialize, Deserialize)]
struct VocabularyData {
    n_documents: usize,
    entries: Vec<VocabularyEntry>,
}

impl From<Vocabulary> for VocabularyData {
    fn from(vocabulary: Vocabulary) -> Self {
        let entries = vocabulary
            .tokens
            .into_iter()
            .zip(vocabulary.document_frequencies)
            .enumerate()
            .map(|(index, (token, document_frequency))| VocabularyEntry {
                token,
                index,
                document_frequency,
            })
            .collect();
        VocabularyData {
            n_documents: vocabulary.n_documents,
            entries,
        }
    }
}

impl TryFrom<VocabularyData> for Vocabulary {
    type Error = FlareError;

    fn try_from(mut data: VocabularyData) -> Result<Self> {
        data.entries.sort_by_key(|entry| entry.index);
        let mut tokens = Vec::with_capacity(data.entries.len());
        let mut document_frequencies = Vec::with_capacity(data.entries.len());
        for (expected, entry) in data.entries.into_iter().enumerate() {
            if entry.index != expected {
                return Err(FlareError::invalid_argument(format!(
                    "vocabulary indices must be contiguous from 0, found {} at position {expected}",
                    entry.index
                )));
            }
            if entry.document_frequency == 0 || entry.document_frequency > data.n_documents {
                return Err(FlareError::invalid_argument(format!(
                    "document frequency {} of '{}' outside 1..={}",
                    entry.document_frequency, entry.token, data.n_documents
                )));
            }
            tokens.push(entry.token);
            document_frequencies.push(entry.document_frequency);
        }
        Vocabulary::new(tokens, document_frequencies, data.n_documents)
    }
}

impl Vocabulary {
    fn new(
        tokens: Vec<String>,
        document_frequencies: Vec<usize>,
        n_documents: usize,
    ) -> Result<Self> {
        let mut index = AHashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if index.insert(token.clone(), i).is_some() {
                return Err(FlareError::invalid_argument(format!(
                    "duplicate vocabulary token '{token}'"
                )));
            }
        }
        Ok(Self {
            tokens,
            document_frequencies,
            n_documents,
            index,
        })
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary has no terms.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of `token`, if it is in the vocabulary.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Term at `index`.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// All terms in index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of training documents containing the term at `index`.
    pub fn document_frequency(&self, index: usize) -> Option<usize> {
        self.document_frequencies.get(index).copied()
    }

    /// Size of the training corpus the vocabulary was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// `ln(N / df)` for the term at `index`.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.document_frequency(index)
            .map(|df| (self.n_documents as f64 / df as f64).ln())
    }

    /// Iterate over `(token, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens.iter().enumerate().map(|(i, t)| (t.as_str(), i))
    }
}

#[derive(Debug, Clone)]
struct FittedState {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
}

impl FittedState {
    fn new(vocabulary: Vocabulary) -> Self {
        let idf = (0..vocabulary.len())
            .map(|i| vocabulary.idf(i).unwrap_or(0.0))
            .collect();
        Self { vocabulary, idf }
    }
}

/// Per-term counts gathered while fitting.
struct TermCounts {
    /// Terms in first-occurrence order.
    terms: Vec<String>,
    slots: AHashMap<String, usize>,
    term_frequency: Vec<usize>,
    document_frequency: Vec<usize>,
}

impl TermCounts {
    fn new() -> Self {
        Self {
            terms: Vec::new(),
            slots: AHashMap::new(),
            term_frequency: Vec::new(),
            document_frequency: Vec::new(),
        }
    }

    fn add_document(&mut self, terms: Vec<String>) {
        let mut seen = AHashSet::with_capacity(terms.len());
        for term in terms {
            let slot = match self.slots.get(&term) {
                Some(&slot) => slot,
                None => {
                    let slot = self.terms.len();
                    self.slots.insert(term.clone(), slot);
                    self.terms.push(term);
                    self.term_frequency.push(0);
                    self.document_frequency.push(0);
                    slot
                }
            };
            self.term_frequency[slot] += 1;
            if seen.insert(slot) {
                self.document_frequency[slot] += 1;
            }
        }
    }
}

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
    shingles: ShingleFilter,
    fitted: Option<FittedState>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field(
                "vocabulary_size",
                &self.fitted.as_ref().map(|s| s.vocabulary.len()),
            )
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>, config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        let (min_n, max_n) = config.ngram_range;
        Ok(Self {
            shingles: ShingleFilter::new(min_n, max_n)?,
            config,
            analyzer,
            fitted: None,
        })
    }

    /// Create a vectorizer using the default [`TweetAnalyzer`].
    pub fn with_config(config: VectorizerConfig) -> Result<Self> {
        Self::new(Arc::new(TweetAnalyzer::new()?), config)
    }

    /// Restore a fitted vectorizer from a previously fitted vocabulary.
    pub fn from_vocabulary(
        analyzer: Arc<dyn Analyzer>,
        config: VectorizerConfig,
        vocabulary: Vocabulary,
    ) -> Result<Self> {
        if vocabulary.len() > config.max_features {
            return Err(FlareError::invalid_config(format!(
                "vocabulary of {} terms exceeds max_features {}",
                vocabulary.len(),
                config.max_features
            )));
        }
        let mut vectorizer = Self::new(analyzer, config)?;
        vectorizer.fitted = Some(FittedState::new(vocabulary));
        Ok(vectorizer)
    }

    /// Get the vectorizer options.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Whether `fit` has completed successfully.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The fitted vocabulary, if any.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.fitted.as_ref().map(|s| &s.vocabulary)
    }

    /// Size of the fitted vocabulary, i.e. the feature dimension.
    pub fn dimension(&self) -> Result<usize> {
        Ok(self.state()?.vocabulary.len())
    }

    /// Fit the vectorizer on training documents.
    ///
    /// On error the previously fitted state, if any, is left unchanged.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&Vocabulary> {
        if documents.is_empty() {
            return Err(FlareError::empty_corpus("training corpus has no documents"));
        }

        let mut counts = TermCounts::new();
        for doc in documents {
            counts.add_document(self.terms(doc.as_ref())?);
        }
        if counts.terms.is_empty() {
            return Err(FlareError::empty_corpus(format!(
                "no terms left in {} documents after filtering",
                documents.len()
            )));
        }

        let n_documents = documents.len();
        let scores: Vec<f64> = counts
            .term_frequency
            .iter()
            .zip(&counts.document_frequency)
            .map(|(&tf, &df)| tf as f64 * (n_documents as f64 / df as f64).ln())
            .collect();

        // Highest score first, earlier first occurrence on ties.
        let mut ranked: Vec<usize> = (0..counts.terms.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        ranked.truncate(self.config.max_features);
        ranked.sort_unstable();

        let mut tokens = Vec::with_capacity(ranked.len());
        let mut document_frequencies = Vec::with_capacity(ranked.len());
        for slot in ranked {
            tokens.push(std::mem::take(&mut counts.terms[slot]));
            document_frequencies.push(counts.document_frequency[slot]);
        }

        debug!(
            documents = n_documents,
            candidate_terms = counts.slots.len(),
            vocabulary_size = tokens.len(),
            "fitted tf-idf vocabulary"
        );

        let vocabulary = Vocabulary::new(tokens, document_frequencies, n_documents)?;
        let state = self.fitted.insert(FittedState::new(vocabulary));
        Ok(&state.vocabulary)
    }

    /// Transform documents into TF-IDF feature vectors.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<FeatureVector>> {
        let state = self.state()?;
        documents
            .iter()
            .map(|doc| self.vectorize(state, doc.as_ref()))
            .collect()
    }

    /// Transform a single document.
    pub fn transform_one(&self, document: &str) -> Result<FeatureVector> {
        self.vectorize(self.state()?, document)
    }

    /// Fit on `documents` and return their feature vectors.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<FeatureVector>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// The terms (words and word n-grams) the vectorizer counts for `text`.
    pub fn terms(&self, text: &str) -> Result<Vec<String>> {
        let tokens = self.shingles.filter(self.analyzer.analyze(text)?)?;
        Ok(tokens
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect())
    }

    fn state(&self) -> Result<&FittedState> {
        self.fitted
            .as_ref()
            .ok_or_else(|| FlareError::not_fitted("TfIdfVectorizer::fit must be called first"))
    }

    fn vectorize(&self, state: &FittedState, text: &str) -> Result<FeatureVector> {
        let mut indices: Vec<usize> = self
            .terms(text)?
            .iter()
            .filter_map(|term| state.vocabulary.get(term))
            .collect();
        indices.sort_unstable();

        let mut entries: Vec<(usize, f64)> = Vec::new();
        for index in indices {
            match entries.last_mut() {
                Some((last, count)) if *last == index => *count += 1.0,
                _ => entries.push((index, 1.0)),
            }
        }
        for (index, value) in &mut entries {
            *value *= state.idf[*index];
        }
        entries.retain(|&(_, value)| value != 0.0);

        Ok(FeatureVector::from_sorted(state.vocabulary.len(), entries))
    }
}
