//! # Flare
//!
//! Classifies short messages (tweets) as disaster-related or not.
//!
//! ## Features
//!
//! - Tweet-aware text analysis: URL and mention stripping, stop words, word n-grams
//! - TF-IDF vectorization with a bounded, deterministic vocabulary
//! - Seeded, optionally stratified train/validation splits
//! - L2-regularized logistic regression
//! - F1 / precision / recall evaluation
//! - CSV and JSONL loading, `id,target` submission output, JSON model artifacts
//!
//! ## Example
//!
//! ```
//! use flare::config::FlareConfig;
//! use flare::document::{Corpus, Document};
//! use flare::ml::Pipeline;
//!
//! # fn main() -> flare::error::Result<()> {
//! let corpus: Corpus = [
//!     ("Forest fire near La Ronge", 1),
//!     ("Wildfire spreading towards the town", 1),
//!     ("Lovely sunny day at the beach", 0),
//!     ("Baking bread this weekend", 0),
//! ]
//! .into_iter()
//! .enumerate()
//! .map(|(i, (text, target))| Document::new(i.to_string(), text).with_target(target))
//! .collect();
//!
//! let mut config = FlareConfig::default();
//! config.split.validation_fraction = 0.5;
//!
//! let trained = Pipeline::new(config)?.train(&corpus)?;
//! let labels = trained.predict_texts(&["fire in the forest"])?;
//! assert!(labels[0] <= 1);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod ml;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
