//! Tweet records and the loaders that produce them.
//!
//! # Core Components
//!
//! - [`Document`] - One tweet: id, text, optional keyword / location / target
//! - [`Corpus`] - An ordered collection of documents with labeled / unlabeled views
//! - [`source`] - Loading CSV and JSONL files
//! - [`submission`] - Writing `id,target` prediction files
//! - [`stats`] - Corpus summaries and per-class token frequencies
//!
//! # Examples
//!
//! ```
//! use flare::document::{Corpus, Document};
//!
//! let corpus = Corpus::from(vec![
//!     Document::new("1", "Forest fire near La Ronge").with_target(1),
//!     Document::new("2", "What a lovely day"),
//! ]);
//!
//! let (texts, labels) = corpus.labeled_examples();
//! assert_eq!(texts, vec!["Forest fire near La Ronge"]);
//! assert_eq!(labels, vec![1]);
//! assert_eq!(corpus.unlabeled().count(), 1);
//! ```

#[allow(clippy::module_inception)]
pub mod document;
pub mod source;
pub mod stats;
pub mod submission;

// Re-export commonly used types
pub use document::{Corpus, Document};
pub use source::csv::CsvDataSource;
pub use source::jsonl::JsonlDataSource;
pub use source::{DataSource, data_source_for_path};
pub use stats::{ClassTokenStats, CorpusSummary};
pub use submission::write_submission;
