//! CLI module for reguscope
//!
//! - `serve`: run the HTTP API
//! - `ask`: answer a single question and print the result as JSON

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// reguscope - cited answers to regulatory compliance questions
#[derive(Parser)]
#[command(name = "reguscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Run one pipeline execution and print the result
    Ask(ask::AskArgs),
}
