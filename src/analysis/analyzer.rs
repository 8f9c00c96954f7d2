//! Analyzers combine char filters, a tokenizer and token filters.
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```
//!
//! - [`PipelineAnalyzer`] - Custom char filter + tokenizer + filter chains
//! - [`TweetAnalyzer`] - The tweet preprocessing preset driven by [`PreprocessingConfig`]
//!
//! # Examples
//!
//! ```
//! use flare::analysis::analyzer::{Analyzer, TweetAnalyzer};
//!
//! let analyzer = TweetAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer
//!     .analyze("Fire in the forest! http://t.co/xyz @ranger")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(tokens, vec!["fire", "forest"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

mod pipeline;
mod tweet;

pub use pipeline::PipelineAnalyzer;
pub use tweet::{PreprocessingConfig, TweetAnalyzer};

/// Trait for analyzers that convert text into processed tokens.
///
/// `Send + Sync` lets a fitted vectorizer, which owns its analyzer, be shared
/// read-only across threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;
}
