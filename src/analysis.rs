//! Text analysis module for Flare.
//!
//! Turns raw tweet text into the token sequence the vectorizer counts:
//! char filters clean the string (URLs, mentions), a tokenizer splits it into
//! word tokens, and token filters lowercase, drop stop words and build word
//! n-grams.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
