//! Flare CLI binary.

use std::process;

use clap::Parser;
use flare::cli::{args::FlareArgs, commands::execute_command, init_tracing};

fn main() {
    let args = FlareArgs::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    if let Err(e) = execute_command(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
