//! CSV tweet loader.
//!
//! The first row names the columns, in any order:
//! ```csv
//! id,keyword,location,text,target
//! 1,,,Our Deeds are the Reason of this #earthquake,1
//! 4,,,Forest fire near La Ronge Sask. Canada,1
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::document::document::{Corpus, Document};
use crate::document::source::{DataSource, log_loaded, parse_target};
use crate::error::{FlareError, Result};

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    text: usize,
    keyword: Option<usize>,
    location: Option<usize>,
    target: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, require_target: bool) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let mut missing: Vec<&str> = ["id", "text"]
            .into_iter()
            .filter(|name| find(name).is_none())
            .collect();
        let target = find("target");
        if require_target && target.is_none() {
            missing.push("target");
        }
        match (find("id"), find("text")) {
            (Some(id), Some(text)) if missing.is_empty() => Ok(Columns {
                id,
                text,
                keyword: find("keyword"),
                location: find("location"),
                target,
            }),
            _ => Err(FlareError::schema(format!(
                "missing required columns: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// A [`DataSource`] for comma-separated files with a header row.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether every record must carry a 0/1 target
    require_target: bool,
}

impl Default for CsvDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDataSource {
    /// Create a loader for files whose `target` column is optional.
    pub fn new() -> Self {
        CsvDataSource {
            delimiter: b',',
            require_target: false,
        }
    }

    /// Create a loader for training files, where `target` is required.
    pub fn training() -> Self {
        Self::new().with_required_target(true)
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether every record must carry a target.
    pub fn with_required_target(mut self, required: bool) -> Self {
        self.require_target = required;
        self
    }

    /// Read records from any reader. Returns the corpus and the number of
    /// empty texts found.
    pub fn read<R: Read>(&self, reader: R) -> Result<(Corpus, usize)> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::Headers)
            .from_reader(reader);

        let columns = Columns::resolve(reader.headers()?, self.require_target)?;
        let mut corpus = Corpus::new();
        let mut empty_texts = 0;

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let number = index + 1;
            let field = |column: usize| record.get(column).unwrap_or("");
            let optional = |column: Option<usize>| {
                column
                    .map(field)
                    .filter(|value| !value.trim().is_empty())
                    .map(str::to_string)
            };

            let id = field(columns.id).trim();
            if id.is_empty() {
                return Err(FlareError::schema(format!("record {number}: empty id")));
            }
            let text = field(columns.text);
            if text.trim().is_empty() {
                empty_texts += 1;
            }
            let target = match columns.target {
                Some(column) => parse_target(field(column), number, self.require_target)?,
                None => None,
            };

            corpus.push(Document {
                id: id.to_string(),
                text: text.to_string(),
                keyword: optional(columns.keyword),
                location: optional(columns.location),
                target,
            });
        }

        Ok((corpus, empty_texts))
    }
}

impl DataSource for CsvDataSource {
    fn load(&self, path: &Path) -> Result<Corpus> {
        let (corpus, empty_texts) = self.read(File::open(path)?)?;
        log_loaded(self.name(), path, &corpus, empty_texts);
        Ok(corpus)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
