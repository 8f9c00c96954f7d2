//! Command implementations for the flare CLI.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::analyzer::TweetAnalyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::FlareConfig;
use crate::document::{ClassTokenStats, Corpus, CorpusSummary, data_source_for_path, write_submission};
use crate::ml::pipeline::{Pipeline, TrainedPipeline};

/// Execute a CLI command.
pub fn execute_command(args: &FlareArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, args),
        Command::Predict(predict_args) => predict(predict_args, args),
        Command::Stats(stats_args) => stats(stats_args, args),
    }
}

fn load_config(path: Option<&Path>) -> Result<FlareConfig> {
    match path {
        Some(path) => FlareConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(FlareConfig::default()),
    }
}

fn load_corpus(path: &Path, require_target: bool) -> Result<Corpus> {
    data_source_for_path(path, require_target)
        .load(path)
        .with_context(|| format!("failed to load tweets from {}", path.display()))
}

fn to_weights(terms: Vec<(&str, f64)>) -> Vec<TermWeight> {
    terms
        .into_iter()
        .map(|(term, weight)| TermWeight {
            term: term.to_string(),
            weight,
        })
        .collect()
}

fn to_counts(tokens: Vec<(&str, usize)>) -> Vec<TokenCount> {
    tokens
        .into_iter()
        .map(|(token, count)| TokenCount {
            token: token.to_string(),
            count,
        })
        .collect()
}

/// Train a model and save it.
fn train(args: &TrainArgs, cli_args: &FlareArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    if let Some(fraction) = args.validation_fraction {
        config.split.validation_fraction = fraction;
    }
    if let Some(max_features) = args.max_features {
        config.vectorizer.max_features = max_features;
    }
    if args.stratify {
        config.split.stratify = true;
    }

    let corpus = load_corpus(&args.train_file, true)?;
    let labeled_documents = corpus.labeled().count();
    let trained = Pipeline::new(config)?
        .train(&corpus)
        .context("training failed")?;
    trained
        .save(&args.output)
        .with_context(|| format!("failed to save model to {}", args.output.display()))?;

    let validation_size = trained.evaluation().support();

    output_result(
        "Training complete",
        &TrainingSummary {
            model_path: args.output.display().to_string(),
            labeled_documents,
            vocabulary_size: trained.model().dimension(),
            train_size: labeled_documents - validation_size,
            validation_size,
            report: trained.report().clone(),
            evaluation: *trained.evaluation(),
            disaster_terms: to_weights(trained.top_terms(1, args.top_terms)?),
            non_disaster_terms: to_weights(trained.top_terms(0, args.top_terms)?),
        },
        cli_args,
    )
}

/// Label every tweet of a file and write a submission.
fn predict(args: &PredictArgs, cli_args: &FlareArgs) -> Result<()> {
    let trained = TrainedPipeline::load(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let corpus = load_corpus(&args.input, false)?;

    let texts = corpus.texts();
    let probabilities = trained.predict_proba_texts(&texts)?;
    let labels: Vec<u8> = probabilities.iter().map(|&p| u8::from(p >= 0.5)).collect();
    write_submission(&args.output, &corpus.ids(), &labels)
        .with_context(|| format!("failed to write submission to {}", args.output.display()))?;
    info!(predictions = labels.len(), "labeled tweets");

    let mean_probability = if probabilities.is_empty() {
        0.0
    } else {
        probabilities.iter().sum::<f64>() / probabilities.len() as f64
    };
    output_result(
        "Prediction complete",
        &PredictionSummary {
            model_path: args.model.display().to_string(),
            output_path: args.output.display().to_string(),
            predictions: labels.len(),
            predicted_disasters: labels.iter().filter(|&&l| l == 1).count(),
            mean_probability,
        },
        cli_args,
    )
}

/// Summarize a tweet file.
fn stats(args: &StatsArgs, cli_args: &FlareArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let corpus = load_corpus(&args.input, false)?;
    let analyzer = TweetAnalyzer::from_config(config.preprocessing)?;
    let token_stats = ClassTokenStats::from_corpus(&corpus, &analyzer)?;

    output_result(
        "Corpus statistics",
        &StatsSummary {
            summary: CorpusSummary::from_corpus(&corpus),
            top_disaster_tokens: to_counts(token_stats.top(1, args.top)),
            top_non_disaster_tokens: to_counts(token_stats.top(0, args.top)),
            top_tokens: to_counts(token_stats.top_overall(args.top)),
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    const TRAIN: &str = "\
id,keyword,location,text,target
1,,,Forest fire near La Ronge Sask. Canada,1
2,,,Residents asked to shelter in place as wildfire spreads,1
3,,,Flood waters rising fast downtown,1
4,,,Earthquake shakes the city,1
5,,,I love fruits and sunny mornings,0
6,,,Summer is lovely,0
7,,,My new phone arrived today,0
8,,,Baking bread this weekend,0
";

    #[test]
    fn test_train_then_predict() {
        let dir = TempDir::new().unwrap();
        let train_path = dir.path().join("train.csv");
        let test_path = dir.path().join("test.csv");
        let model_path = dir.path().join("model.json");
        let submission_path = dir.path().join("submission.csv");
        fs::write(&train_path, TRAIN).unwrap();
        fs::write(&test_path, "id,text\n10,wildfire near the city\n11,\n").unwrap();

        let train_args = FlareArgs::try_parse_from([
            "flare",
            "-q",
            "--format",
            "json",
            "train",
            train_path.to_str().unwrap(),
            "--output",
            model_path.to_str().unwrap(),
            "--validation-fraction",
            "0.25",
        ])
        .unwrap();
        execute_command(&train_args).unwrap();
        assert!(model_path.exists());

        let predict_args = FlareArgs::try_parse_from([
            "flare",
            "-q",
            "predict",
            model_path.to_str().unwrap(),
            test_path.to_str().unwrap(),
            "--output",
            submission_path.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(&predict_args).unwrap();

        let submission = fs::read_to_string(&submission_path).unwrap();
        let lines: Vec<&str> = submission.lines().collect();
        assert_eq!(lines[0], "id,target");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("10,"));
        assert!(lines[2].starts_with("11,"));
    }

    #[test]
    fn test_stats_command() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, TRAIN).unwrap();

        let args = FlareArgs::try_parse_from([
            "flare",
            "-q",
            "stats",
            path.to_str().unwrap(),
            "--top",
            "3",
        ])
        .unwrap();
        assert!(execute_command(&args).is_ok());
    }

    #[test]
    fn test_missing_training_file() {
        let args = FlareArgs::try_parse_from(["flare", "-q", "train", "/nonexistent/train.csv"]).unwrap();
        let err = execute_command(&args).unwrap_err();
        assert!(err.to_string().contains("failed to load tweets"));
    }
}
