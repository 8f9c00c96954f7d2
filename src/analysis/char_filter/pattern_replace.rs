use regex::Regex;

use super::CharFilter;
use crate::error::{FlareError, Result};

/// Matches `http://`, `https://` and bare `www.` links.
pub const URL_PATTERN: &str = r"https?://\S+|www\.\S+";
/// Matches `@user` mentions.
pub const MENTION_PATTERN: &str = r"@\w+";
/// Matches `#tag` hashtags, including the tag word.
pub const HASHTAG_PATTERN: &str = r"#\w+";
/// Matches standalone numbers.
pub const NUMBER_PATTERN: &str = r"\b\d+\b";

/// A char filter that replaces every match of a regex pattern.
///
/// Removal filters replace with a single space so the words on either side of
/// a removed span never fuse into one token.
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
    name: &'static str,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| FlareError::analysis(format!("Invalid regex pattern: {e}")))?,
            replacement: replacement.to_string(),
            name: "pattern_replace",
        })
    }

    /// Filter removing URLs.
    pub fn urls() -> Result<Self> {
        Ok(Self::new(URL_PATTERN, " ")?.named("remove_urls"))
    }

    /// Filter removing @mentions.
    pub fn mentions() -> Result<Self> {
        Ok(Self::new(MENTION_PATTERN, " ")?.named("remove_mentions"))
    }

    /// Filter removing hashtags together with their tag word.
    pub fn hashtags() -> Result<Self> {
        Ok(Self::new(HASHTAG_PATTERN, " ")?.named("remove_hashtags"))
    }

    /// Filter removing standalone numbers.
    pub fn numbers() -> Result<Self> {
        Ok(Self::new(NUMBER_PATTERN, " ")?.named("remove_numbers"))
    }

    fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for PatternReplaceCharFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternReplaceCharFilter")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}
