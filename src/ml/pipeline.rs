//! End-to-end training and prediction.
//!
//! [`Pipeline::train`] fits the vectorizer on every labeled text, splits the
//! resulting feature vectors, trains the classifier on the training subset
//! and scores it on the validation subset. The returned [`TrainedPipeline`]
//! predicts raw texts and can be saved as a JSON artifact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::analyzer::{Analyzer, TweetAnalyzer};
use crate::config::FlareConfig;
use crate::document::Corpus;
use crate::error::{FlareError, Result};
use crate::ml::check_binary_labels;
use crate::ml::logistic::{LogisticModel, LogisticRegression, TrainingReport};
use crate::ml::metrics::{MetricResult, score};
use crate::ml::split::split;
use crate::ml::vectorizer::{TfIdfVectorizer, Vocabulary};

const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Trainer for the tweet classifier.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: FlareConfig,
}

impl Pipeline {
    pub fn new(config: FlareConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FlareConfig {
        &self.config
    }

    /// Train on the labeled documents of `corpus`. Unlabeled ones are ignored.
    pub fn train(&self, corpus: &Corpus) -> Result<TrainedPipeline> {
        let (texts, labels) = corpus.labeled_examples();
        self.train_examples(&texts, &labels)
    }

    /// Train on parallel `texts` and 0/1 `labels`.
    ///
    /// # Errors
    ///
    /// - [`FlareError::InvalidLabel`] if the lengths differ or a label is not 0/1.
    /// - [`FlareError::EmptyCorpus`] if no text survives preprocessing.
    /// - [`FlareError::InsufficientData`] if the split leaves a subset empty.
    pub fn train_examples<S: AsRef<str>>(&self, texts: &[S], labels: &[u8]) -> Result<TrainedPipeline> {
        if texts.len() != labels.len() {
            return Err(FlareError::invalid_label(format!(
                "{} labels for {} texts",
                labels.len(),
                texts.len()
            )));
        }
        check_binary_labels(labels)?;

        let analyzer: Arc<dyn Analyzer> =
            Arc::new(TweetAnalyzer::from_config(self.config.preprocessing.clone())?);
        let mut vectorizer = TfIdfVectorizer::new(analyzer, self.config.vectorizer.clone())?;
        let features = vectorizer.fit_transform(texts)?;
        info!(
            documents = texts.len(),
            vocabulary_size = vectorizer.dimension()?,
            "vectorized training corpus"
        );

        let dataset = split(&features, labels, &self.config.split)?;
        let trainer = LogisticRegression::new(self.config.training.clone())?;
        let outcome = trainer.fit(&dataset.train_features, &dataset.train_labels)?;

        let predicted = outcome.model.predict(&dataset.validation_features)?;
        let evaluation = score(&predicted, &dataset.validation_labels)?;
        info!(
            train = dataset.train_len(),
            validation = dataset.validation_len(),
            iterations = outcome.report.iterations,
            converged = outcome.report.converged,
            f1 = evaluation.f1,
            "trained classifier"
        );

        Ok(TrainedPipeline {
            config: self.config.clone(),
            vectorizer,
            model: outcome.model,
            report: outcome.report,
            evaluation,
        })
    }
}

/// A fitted vectorizer and model, with the report and validation score of
/// the run that produced them.
#[derive(Debug)]
pub struct TrainedPipeline {
    config: FlareConfig,
    vectorizer: TfIdfVectorizer,
    model: LogisticModel,
    report: TrainingReport,
    evaluation: MetricResult,
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    format_version: u32,
    config: FlareConfig,
    vocabulary: Vocabulary,
    model: LogisticModel,
    report: TrainingReport,
    evaluation: MetricResult,
}

impl TrainedPipeline {
    pub fn config(&self) -> &FlareConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    /// Validation score.
    pub fn evaluation(&self) -> &MetricResult {
        &self.evaluation
    }

    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        self.vectorizer
            .vocabulary()
            .ok_or_else(|| FlareError::not_fitted("pipeline has no vocabulary"))
    }

    /// Probability that each text is disaster-related.
    pub fn predict_proba_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<f64>> {
        let features = self.vectorizer.transform(texts)?;
        self.model.predict_proba(&features)
    }

    /// 0/1 label for each text.
    pub fn predict_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<u8>> {
        let features = self.vectorizer.transform(texts)?;
        self.model.predict(&features)
    }

    /// The `n` terms with the largest weights towards `class` (1: most
    /// positive weights, 0: most negative).
    pub fn top_terms(&self, class: u8, n: usize) -> Result<Vec<(&str, f64)>> {
        let vocabulary = self.vocabulary()?;
        let sign = if class == 1 { 1.0 } else { -1.0 };
        let mut terms: Vec<(&str, f64)> = vocabulary
            .iter()
            .map(|(token, index)| (token, self.model.weights()[index]))
            .filter(|&(_, weight)| sign * weight > 0.0)
            .collect();
        terms.sort_by(|a, b| (sign * b.1).total_cmp(&(sign * a.1)));
        terms.truncate(n);
        Ok(terms)
    }

    /// Write the pipeline as JSON.
    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        let artifact = Artifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            config: self.config.clone(),
            vocabulary: self.vocabulary()?.clone(),
            model: self.model.clone(),
            report: self.report.clone(),
            evaluation: self.evaluation,
        };
        serde_json::to_writer_pretty(writer, &artifact)?;
        Ok(())
    }

    /// Save the pipeline to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_to(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "saved model artifact");
        Ok(())
    }

    /// Read a pipeline written by [`save_to`](Self::save_to).
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::DimensionMismatch`] if the model's weight count
    /// differs from the vocabulary size.
    pub fn load_from<R: Read>(reader: R) -> Result<Self> {
        let artifact: Artifact = serde_json::from_reader(reader)?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(FlareError::invalid_argument(format!(
                "unsupported artifact format version {}",
                artifact.format_version
            )));
        }
        artifact.config.validate()?;
        if artifact.model.dimension() != artifact.vocabulary.len() {
            return Err(FlareError::dimension_mismatch(
                artifact.vocabulary.len(),
                artifact.model.dimension(),
            ));
        }

        let analyzer: Arc<dyn Analyzer> =
            Arc::new(TweetAnalyzer::from_config(artifact.config.preprocessing.clone())?);
        let vectorizer = TfIdfVectorizer::from_vocabulary(
            analyzer,
            artifact.config.vectorizer.clone(),
            artifact.vocabulary,
        )?;

        Ok(TrainedPipeline {
            config: artifact.config,
            vectorizer,
            model: artifact.model,
            report: artifact.report,
            evaluation: artifact.evaluation,
        })
    }

    /// Load a pipeline from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pipeline = Self::load_from(BufReader::new(File::open(path)?))?;
        info!(
            path = %path.display(),
            vocabulary_size = pipeline.model.dimension(),
            "loaded model artifact"
        );
        Ok(pipeline)
    }
}
