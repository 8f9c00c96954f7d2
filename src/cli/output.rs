//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cli::args::{FlareArgs, OutputFormat};
use crate::document::stats::CorpusSummary;
use crate::ml::logistic::TrainingReport;
use crate::ml::metrics::MetricResult;

/// Plain-text rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

/// A term and its model weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f64,
}

/// A token and how often it occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Result of `flare train`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub model_path: String,
    pub labeled_documents: usize,
    pub vocabulary_size: usize,
    pub train_size: usize,
    pub validation_size: usize,
    pub report: TrainingReport,
    pub evaluation: MetricResult,
    pub disaster_terms: Vec<TermWeight>,
    pub non_disaster_terms: Vec<TermWeight>,
}

/// Result of `flare predict`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub model_path: String,
    pub output_path: String,
    pub predictions: usize,
    pub predicted_disasters: usize,
    pub mean_probability: f64,
}

/// Result of `flare stats`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsSummary {
    pub summary: CorpusSummary,
    pub top_disaster_tokens: Vec<TokenCount>,
    pub top_non_disaster_tokens: Vec<TokenCount>,
    pub top_tokens: Vec<TokenCount>,
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &FlareArgs,
) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human());
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn render_terms(out: &mut String, title: &str, terms: &[TermWeight]) {
    let _ = writeln!(out, "{title}:");
    if terms.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for term in terms {
        let _ = writeln!(out, "  {:<24} {:+.4}", term.term, term.weight);
    }
}

fn render_tokens(out: &mut String, title: &str, tokens: &[TokenCount]) {
    let _ = writeln!(out, "{title}:");
    if tokens.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (rank, token) in tokens.iter().enumerate() {
        let _ = writeln!(out, "  {:>3}. {:<24} {}", rank + 1, token.token, token.count);
    }
}

impl HumanOutput for TrainingSummary {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let e = &self.evaluation;
        let _ = writeln!(out, "Model:            {}", self.model_path);
        let _ = writeln!(out, "Labeled tweets:   {}", self.labeled_documents);
        let _ = writeln!(out, "Vocabulary size:  {}", self.vocabulary_size);
        let _ = writeln!(
            out,
            "Split:            {} train / {} validation",
            self.train_size, self.validation_size
        );
        let _ = writeln!(
            out,
            "Optimizer:        {} iterations, {}",
            self.report.iterations,
            if self.report.converged {
                "converged"
            } else {
                "stopped at the iteration cap"
            }
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "F1 Score:         {:.4}", e.f1);
        let _ = writeln!(out, "Precision:        {:.4}", e.precision);
        let _ = writeln!(out, "Recall:           {:.4}", e.recall);
        let _ = writeln!(out, "Accuracy:         {:.4}", e.accuracy);
        let _ = writeln!(
            out,
            "Confusion:        tp={} fp={} tn={} fn={}",
            e.true_positives, e.false_positives, e.true_negatives, e.false_negatives
        );
        let _ = writeln!(out);
        render_terms(&mut out, "Disaster terms", &self.disaster_terms);
        render_terms(&mut out, "Non-disaster terms", &self.non_disaster_terms);
        out
    }
}

impl HumanOutput for PredictionSummary {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model:        {}", self.model_path);
        let _ = writeln!(out, "Submission:   {}", self.output_path);
        let _ = writeln!(out, "Predictions:  {}", self.predictions);
        let _ = writeln!(
            out,
            "Disasters:    {} ({:.1}%)",
            self.predicted_disasters,
            share(self.predicted_disasters, self.predictions) * 100.0
        );
        let _ = writeln!(out, "Mean p(1):    {:.4}", self.mean_probability);
        out
    }
}

impl HumanOutput for StatsSummary {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;
        let _ = writeln!(out, "Tweets:           {}", s.documents);
        let _ = writeln!(out, "Labeled:          {}", s.labeled);
        let _ = writeln!(
            out,
            "Class 0 (Non-disaster): {} ({:.1}%)",
            s.class_counts[0],
            s.class_share(0) * 100.0
        );
        let _ = writeln!(
            out,
            "Class 1 (Disaster):     {} ({:.1}%)",
            s.class_counts[1],
            s.class_share(1) * 100.0
        );
        let _ = writeln!(out, "Empty texts:      {}", s.empty_texts);
        if let Some(length) = &s.text_length {
            let _ = writeln!(
                out,
                "Text length:      min {} / mean {:.1} / max {}",
                length.min, length.mean, length.max
            );
        }
        let _ = writeln!(out);
        render_tokens(&mut out, "Most frequent tokens", &self.top_tokens);
        render_tokens(&mut out, "Disaster tweets", &self.top_disaster_tokens);
        render_tokens(&mut out, "Non-disaster tweets", &self.top_non_disaster_tokens);
        out
    }
}

fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
