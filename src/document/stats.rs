//! Corpus statistics for reports: class balance, text lengths and the most
//! frequent tokens per class.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::document::document::Corpus;
use crate::error::Result;

/// Character-length statistics of the texts in a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextLengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// Summary of a loaded corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub documents: usize,
    pub labeled: usize,
    /// Labeled documents per class, indexed by target.
    pub class_counts: [usize; 2],
    pub empty_texts: usize,
    /// `None` for an empty corpus.
    pub text_length: Option<TextLengthStats>,
}

impl CorpusSummary {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut class_counts = [0usize; 2];
        for doc in corpus.labeled() {
            if let Some(target @ 0..=1) = doc.target {
                class_counts[usize::from(target)] += 1;
            }
        }

        let lengths: Vec<usize> = corpus.iter().map(|d| d.text.chars().count()).collect();
        let text_length = match (lengths.iter().min(), lengths.iter().max()) {
            (Some(&min), Some(&max)) => Some(TextLengthStats {
                min,
                max,
                mean: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
            }),
            _ => None,
        };

        CorpusSummary {
            documents: corpus.len(),
            labeled: corpus.labeled().count(),
            class_counts,
            empty_texts: corpus.iter().filter(|d| d.text.trim().is_empty()).count(),
            text_length,
        }
    }

    pub fn unlabeled(&self) -> usize {
        self.documents - self.labeled
    }

    /// Share of labeled documents in `class`, 0 when nothing is labeled.
    pub fn class_share(&self, class: u8) -> f64 {
        match self.class_counts.get(usize::from(class)) {
            Some(&count) if self.labeled > 0 => count as f64 / self.labeled as f64,
            _ => 0.0,
        }
    }
}

/// Token counts in first-occurrence order.
#[derive(Debug, Clone, Default)]
struct TokenCounts {
    tokens: Vec<String>,
    counts: Vec<usize>,
    index: AHashMap<String, usize>,
    total: usize,
}

impl TokenCounts {
    fn add(&mut self, token: &str) {
        self.total += 1;
        match self.index.get(token) {
            Some(&slot) => self.counts[slot] += 1,
            None => {
                self.index.insert(token.to_string(), self.tokens.len());
                self.tokens.push(token.to_string());
                self.counts.push(1);
            }
        }
    }

    fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut slots: Vec<usize> = (0..self.tokens.len()).collect();
        // Stable sort keeps first occurrence first among equal counts.
        slots.sort_by(|&a, &b| self.counts[b].cmp(&self.counts[a]));
        slots
            .into_iter()
            .take(n)
            .map(|slot| (self.tokens[slot].as_str(), self.counts[slot]))
            .collect()
    }
}

/// Per-class token frequencies of the labeled documents in a corpus.
#[derive(Debug, Clone, Default)]
pub struct ClassTokenStats {
    classes: [TokenCounts; 2],
    all: TokenCounts,
}

impl ClassTokenStats {
    /// Count the tokens `analyzer` produces for every labeled document.
    pub fn from_corpus(corpus: &Corpus, analyzer: &dyn Analyzer) -> Result<Self> {
        let mut stats = ClassTokenStats::default();
        for doc in corpus.labeled() {
            let Some(class @ 0..=1) = doc.target else {
                continue;
            };
            for token in analyzer.analyze(&doc.text)? {
                if token.is_stopped() {
                    continue;
                }
                stats.classes[usize::from(class)].add(&token.text);
                stats.all.add(&token.text);
            }
        }
        Ok(stats)
    }

    /// The `n` most frequent tokens of `class`, ties in first-occurrence order.
    pub fn top(&self, class: u8, n: usize) -> Vec<(&str, usize)> {
        self.classes
            .get(usize::from(class))
            .map(|counts| counts.top(n))
            .unwrap_or_default()
    }

    /// The `n` most frequent tokens across both classes.
    pub fn top_overall(&self, n: usize) -> Vec<(&str, usize)> {
        self.all.top(n)
    }

    /// Number of tokens counted for `class`.
    pub fn total_tokens(&self, class: u8) -> usize {
        self.classes
            .get(usize::from(class))
            .map_or(0, |counts| counts.total)
    }

    /// Number of distinct tokens seen for `class`.
    pub fn distinct_tokens(&self, class: u8) -> usize {
        self.classes
            .get(usize::from(class))
            .map_or(0, |counts| counts.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::TweetAnalyzer;
    use crate::document::document::Document;

    fn corpus() -> Corpus {
        Corpus::from(vec![
            Document::new("1", "Forest fire spreading, fire crews on scene").with_target(1),
            Document::new("2", "Flood warning: fire station flooded").with_target(1),
            Document::new("3", "Lovely sunny day").with_target(0),
            Document::new("4", "").with_target(0),
            Document::new("5", "unlabeled fire tweet"),
        ])
    }

    #[test]
    fn test_corpus_summary() {
        let summary = CorpusSummary::from_corpus(&corpus());

        assert_eq!(summary.documents, 5);
        assert_eq!(summary.labeled, 4);
        assert_eq!(summary.unlabeled(), 1);
        assert_eq!(summary.class_counts, [2, 2]);
        assert_eq!(summary.class_share(1), 0.5);
        assert_eq!(summary.empty_texts, 1);

        let lengths = summary.text_length.unwrap();
        assert_eq!(lengths.min, 0);
        assert_eq!(lengths.max, "Forest fire spreading, fire crews on scene".len());
    }

    #[test]
    fn test_empty_corpus_summary() {
        let summary = CorpusSummary::from_corpus(&Corpus::new());
        assert_eq!(summary.documents, 0);
        assert_eq!(summary.text_length, None);
        assert_eq!(summary.class_share(1), 0.0);
    }

    #[test]
    fn test_class_token_stats() {
        let analyzer = TweetAnalyzer::new().unwrap();
        let stats = ClassTokenStats::from_corpus(&corpus(), &analyzer).unwrap();

        let top = stats.top(1, 3);
        assert_eq!(top[0], ("fire", 3));
        // Single occurrences keep first-occurrence order.
        assert_eq!(top[1], ("forest", 1));
        assert_eq!(top[2], ("spreading", 1));

        assert_eq!(
            stats.top(0, 10),
            vec![("lovely", 1), ("sunny", 1), ("day", 1)]
        );
        assert_eq!(stats.total_tokens(0), 3);
        assert_eq!(stats.distinct_tokens(0), 3);
        // The unlabeled tweet is not counted.
        assert_eq!(stats.top_overall(1), vec![("fire", 3)]);
        assert!(stats.top(5, 3).is_empty());
    }
}
