//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{FlareError, Result};

/// Pattern matching runs of word characters.
pub const WORD_PATTERN: &str = r"\w+";

/// Build a pattern matching words of at least `min_length` word characters.
pub fn min_length_word_pattern(min_length: usize) -> String {
    match min_length {
        0 | 1 => WORD_PATTERN.to_string(),
        n => format!(r"\b\w{{{n},}}\b"),
    }
}

/// A regex-based tokenizer that extracts each match as a token.
///
/// Everything between matches (punctuation, whitespace, emoji) is discarded.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default pattern.
    ///
    /// The default pattern `r"\w+"` matches sequences of word characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(WORD_PATTERN)
    }

    /// Create a tokenizer that only keeps words of `min_length` characters or more.
    pub fn with_min_length(min_length: usize) -> Result<Self> {
        Self::with_pattern(&min_length_word_pattern(min_length))
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| FlareError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
