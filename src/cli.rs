//! Command line interface for the `flare` binary.

pub mod args;
pub mod commands;
pub mod output;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::args::FlareArgs;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over the level picked
/// from `-q` / `-v`.
pub fn init_tracing(args: &FlareArgs) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow::Error::msg(e.to_string()))?;
    Ok(())
}
