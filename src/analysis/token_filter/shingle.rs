//! Shingle (word n-gram) filter implementation.
//!
//! Joins adjacent surviving tokens into word n-grams so the vectorizer can
//! weigh phrases such as "forest fire" separately from their words. Tokens
//! removed by an earlier stop filter leave no gap: the words around them
//! become adjacent.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{FlareError, Result};

/// Longest shingle, in words, a filter may build.
pub const MAX_SHINGLE_SIZE: usize = 8;

/// A filter that emits word n-grams of `min_size..=max_size` words.
///
/// For every start position the filter emits, in order, the n-grams of
/// increasing size that start there. With `min_size == 1` the original
/// token comes first, so "fire forest" becomes `fire`, `fire forest`,
/// `forest`. Stopped tokens pass through untouched and never join a shingle.
///
/// # Examples
///
/// ```
/// use flare::analysis::token_filter::Filter;
/// use flare::analysis::token_filter::shingle::ShingleFilter;
/// use flare::analysis::token::Token;
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("wildfire", 0), Token::new("spreading", 1)];
/// let texts: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(texts, vec!["wildfire", "wildfire spreading", "spreading"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    /// Minimum number of words per shingle
    min_size: usize,
    /// Maximum number of words per shingle
    max_size: usize,
    /// Separator placed between joined words
    separator: String,
}

impl ShingleFilter {
    /// Create a new shingle filter.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_size` is 0, `max_size` is less than `min_size`
    /// or `max_size` exceeds [`MAX_SHINGLE_SIZE`].
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(FlareError::analysis("min_size must be at least 1"));
        }
        if max_size < min_size {
            return Err(FlareError::analysis(format!(
                "max_size ({max_size}) must be >= min_size ({min_size})"
            )));
        }
        if max_size > MAX_SHINGLE_SIZE {
            return Err(FlareError::analysis(format!(
                "max_size ({max_size}) must be at most {MAX_SHINGLE_SIZE}"
            )));
        }
        Ok(Self {
            min_size,
            max_size,
            separator: " ".to_string(),
        })
    }

    /// Unigrams and bigrams.
    pub fn unigrams_and_bigrams() -> Self {
        Self {
            min_size: 1,
            max_size: 2,
            separator: " ".to_string(),
        }
    }

    /// Use a custom separator between words.
    pub fn with_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }

    /// Get the minimum shingle size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Get the maximum shingle size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn join(&self, words: &[Token], position: usize) -> Token {
        let text = words
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator);
        let first = &words[0];
        let last = &words[words.len() - 1];
        Token::with_offsets(text, position, first.start_offset, last.end_offset)
            .with_position_length(words.len())
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let (words, stopped): (Vec<Token>, Vec<Token>) =
            tokens.partition(|token| !token.is_stopped());

        let mut output = Vec::with_capacity(words.len() + stopped.len());
        for start in 0..words.len() {
            for size in self.min_size..=self.max_size {
                let end = start + size;
                if end > words.len() {
                    break;
                }
                if size == 1 {
                    output.push(words[start].clone());
                } else {
                    output.push(self.join(&words[start..end], words[start].position));
                }
            }
        }
        output.extend(stopped);

        Ok(Box::new(output.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}
