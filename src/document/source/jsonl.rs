//! JSONL tweet loader.
//!
//! Each non-blank line is one JSON object:
//! ```jsonl
//! {"id": 1, "text": "Forest fire near La Ronge", "target": 1}
//! {"id": "2", "text": null, "keyword": "ablaze"}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::document::document::{Corpus, Document};
use crate::document::source::{DataSource, log_loaded, parse_target};
use crate::error::{FlareError, Result};

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    target: Option<Value>,
}

/// A [`DataSource`] for JSON Lines files.
#[derive(Debug, Clone, Default)]
pub struct JsonlDataSource {
    require_target: bool,
}

impl JsonlDataSource {
    /// Create a loader for files whose `target` field is optional.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader for training files, where `target` is required.
    pub fn training() -> Self {
        Self::new().with_required_target(true)
    }

    /// Set whether every record must carry a target.
    pub fn with_required_target(mut self, required: bool) -> Self {
        self.require_target = required;
        self
    }

    /// Read records from any buffered reader. Returns the corpus and the
    /// number of empty texts found.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<(Corpus, usize)> {
        let mut corpus = Corpus::new();
        let mut empty_texts = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let number = line_num + 1;
            let raw: RawRecord = serde_json::from_str(&line)?;

            let id = match raw.id {
                Some(Value::String(id)) if !id.trim().is_empty() => id,
                Some(Value::Number(id)) => id.to_string(),
                _ => {
                    return Err(FlareError::schema(format!(
                        "line {number}: missing or invalid id"
                    )));
                }
            };
            let text = raw.text.unwrap_or_default();
            if text.trim().is_empty() {
                empty_texts += 1;
            }
            let target = match raw.target {
                None | Some(Value::Null) => parse_target("", number, self.require_target)?,
                Some(Value::String(target)) => parse_target(&target, number, self.require_target)?,
                Some(Value::Number(target)) => {
                    parse_target(&target.to_string(), number, self.require_target)?
                }
                Some(other) => {
                    return Err(FlareError::invalid_label(format!(
                        "line {number}: target {other} is not 0 or 1"
                    )));
                }
            };

            corpus.push(Document {
                id,
                text,
                keyword: raw.keyword.filter(|k| !k.trim().is_empty()),
                location: raw.location.filter(|l| !l.trim().is_empty()),
                target,
            });
        }

        Ok((corpus, empty_texts))
    }
}

impl DataSource for JsonlDataSource {
    fn load(&self, path: &Path) -> Result<Corpus> {
        let (corpus, empty_texts) = self.read(BufReader::new(File::open(path)?))?;
        log_loaded(self.name(), path, &corpus, empty_texts);
        Ok(corpus)
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
