//! Tweet analyzer: the preprocessing preset used by the classifier.
//!
//! # Pipeline
//!
//! 1. PatternReplaceCharFilter for URLs, @mentions and optionally hashtags / numbers
//! 2. RegexTokenizer keeping words of `min_token_length` characters or more
//! 3. LowercaseFilter
//! 4. StopFilter (English)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// Text preprocessing options for tweets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Strip `http(s)://` and `www.` links.
    pub remove_urls: bool,
    /// Strip `@user` mentions.
    pub remove_mentions: bool,
    /// Strip `#tag` hashtags entirely. When false only the `#` is dropped.
    pub remove_hashtags: bool,
    /// Strip standalone numbers.
    pub remove_numbers: bool,
    /// Lowercase tokens.
    pub lowercase: bool,
    /// Drop English stop words.
    pub remove_stop_words: bool,
    /// Minimum token length in characters.
    pub min_token_length: usize,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            remove_urls: true,
            remove_mentions: true,
            remove_hashtags: false,
            remove_numbers: false,
            lowercase: true,
            remove_stop_words: true,
            min_token_length: 2,
        }
    }
}

/// Analyzer for tweet text built from a [`PreprocessingConfig`].
pub struct TweetAnalyzer {
    inner: PipelineAnalyzer,
    config: PreprocessingConfig,
}

impl TweetAnalyzer {
    /// Create a new tweet analyzer with default preprocessing.
    pub fn new() -> Result<Self> {
        Self::from_config(PreprocessingConfig::default())
    }

    /// Create a tweet analyzer for the given preprocessing options.
    pub fn from_config(config: PreprocessingConfig) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_min_length(config.min_token_length)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer).with_name("tweet");

        if config.remove_urls {
            analyzer = analyzer.add_char_filter(Arc::new(PatternReplaceCharFilter::urls()?));
        }
        if config.remove_mentions {
            analyzer = analyzer.add_char_filter(Arc::new(PatternReplaceCharFilter::mentions()?));
        }
        if config.remove_hashtags {
            analyzer = analyzer.add_char_filter(Arc::new(PatternReplaceCharFilter::hashtags()?));
        }
        if config.remove_numbers {
            analyzer = analyzer.add_char_filter(Arc::new(PatternReplaceCharFilter::numbers()?));
        }
        if config.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if config.remove_stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }

        Ok(TweetAnalyzer {
            inner: analyzer,
            config,
        })
    }

    /// Get the preprocessing options this analyzer was built from.
    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for TweetAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "tweet"
    }
}

impl std::fmt::Debug for TweetAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweetAnalyzer")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}
