//! Pipeline configuration.
//!
//! Every section and field has a default, so a JSON file only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "vectorizer": { "max_features": 5000 },
//!   "split": { "seed": 7 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::PreprocessingConfig;
use crate::error::{FlareError, Result};
use crate::ml::logistic::TrainingConfig;
use crate::ml::split::SplitConfig;
use crate::ml::vectorizer::VectorizerConfig;

/// Configuration for the whole training pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    /// Text cleaning and tokenization.
    pub preprocessing: PreprocessingConfig,
    /// Vocabulary size and n-gram range.
    pub vectorizer: VectorizerConfig,
    /// Validation hold-out.
    pub split: SplitConfig,
    /// Classifier optimization.
    pub training: TrainingConfig,
}

impl FlareConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FlareConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for impossible values.
    pub fn validate(&self) -> Result<()> {
        if self.preprocessing.min_token_length == 0 {
            return Err(FlareError::invalid_config(
                "min_token_length must be at least 1",
            ));
        }
        self.vectorizer.validate()?;
        self.split.validate().map_err(as_config_error)?;
        self.training.validate().map_err(as_config_error)?;
        Ok(())
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Report a rejected parameter as a configuration error.
fn as_config_error(err: FlareError) -> FlareError {
    match err {
        FlareError::InvalidArgument(msg) => FlareError::InvalidConfig(msg),
        other => other,
    }
}
