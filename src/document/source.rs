//! Loaders that turn tweet files into a [`Corpus`].
//!
//! Both formats carry the same record shape: a required `id` and `text`,
//! optional `keyword` and `location`, and a `target` that is required for
//! training data. A missing or empty text becomes an empty string, and the
//! loader logs how many it found.

use std::path::Path;

use tracing::{info, warn};

use crate::document::document::Corpus;
use crate::error::{FlareError, Result};

pub mod csv;
pub mod jsonl;

use self::csv::CsvDataSource;
use self::jsonl::JsonlDataSource;

/// A source of tweet records.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use flare::document::{CsvDataSource, DataSource};
///
/// let corpus = CsvDataSource::training().load(Path::new("data/raw/train.csv")).unwrap();
/// println!("{} labeled tweets", corpus.labeled().count());
/// ```
pub trait DataSource {
    /// Load every record of the file at `path`.
    fn load(&self, path: &Path) -> Result<Corpus>;

    /// Short format name used in logs.
    fn name(&self) -> &'static str;
}

/// Pick a loader from the file extension: `.jsonl` / `.ndjson` read as JSON
/// lines, anything else as CSV.
pub fn data_source_for_path(path: &Path, require_target: bool) -> Box<dyn DataSource> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jsonl") | Some("ndjson") => {
            Box::new(JsonlDataSource::new().with_required_target(require_target))
        }
        _ => Box::new(CsvDataSource::new().with_required_target(require_target)),
    }
}

/// Parse a textual target. Blank values are `None` unless `required`.
pub(crate) fn parse_target(raw: &str, record: usize, required: bool) -> Result<Option<u8>> {
    match raw.trim() {
        "" if required => Err(FlareError::invalid_label(format!(
            "record {record}: missing target"
        ))),
        "" => Ok(None),
        "0" => Ok(Some(0)),
        "1" => Ok(Some(1)),
        other => Err(FlareError::invalid_label(format!(
            "record {record}: target '{other}' is not 0 or 1"
        ))),
    }
}

/// Log what a loader produced.
pub(crate) fn log_loaded(source: &str, path: &Path, corpus: &Corpus, empty_texts: usize) {
    let positives = corpus.labeled().filter(|d| d.target == Some(1)).count();
    let negatives = corpus.labeled().count() - positives;
    info!(
        source,
        path = %path.display(),
        documents = corpus.len(),
        positives,
        negatives,
        "loaded tweets"
    );
    if empty_texts > 0 {
        warn!(
            path = %path.display(),
            empty_texts,
            "found empty texts; treating them as empty strings"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("1", 1, true).unwrap(), Some(1));
        assert_eq!(parse_target(" 0 ", 1, true).unwrap(), Some(0));
        assert_eq!(parse_target("", 1, false).unwrap(), None);
        assert!(matches!(
            parse_target("", 3, true),
            Err(FlareError::InvalidLabel(_))
        ));
        assert!(matches!(
            parse_target("yes", 3, false),
            Err(FlareError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_data_source_for_path() {
        assert_eq!(data_source_for_path(Path::new("train.csv"), true).name(), "csv");
        assert_eq!(data_source_for_path(Path::new("train.JSONL"), true).name(), "jsonl");
        assert_eq!(data_source_for_path(Path::new("tweets"), false).name(), "csv");
    }
}
