//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step after char filtering: they split the cleaned
//! text into word tokens and thereby strip punctuation.
//!
//! # Examples
//!
//! ```
//! use flare::analysis::tokenizer::Tokenizer;
//! use flare::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Fire, in the forest!").unwrap().collect();
//! assert_eq!(tokens.len(), 4);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a fitted vectorizer holding a
/// tokenizer can be shared read-only across threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use self::regex::RegexTokenizer;
