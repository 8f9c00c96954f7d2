//! Char filters that clean the raw text before tokenization.
//!
//! Tweets carry URLs, @mentions and hashtags that either add noise or split
//! into meaningless fragments once tokenized, so they are removed (or kept)
//! here on the whole string.
//!
//! # Examples
//!
//! ```
//! use flare::analysis::char_filter::CharFilter;
//! use flare::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::urls().unwrap();
//! assert_eq!(filter.filter("smoke http://t.co/abc here"), "smoke   here");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod pattern_replace;

pub use pattern_replace::PatternReplaceCharFilter;
