//! Binary entry point for llmbench.
//!
//! Wires the three core services together (the composition root) and exposes
//! them through a small CLI.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stdout in main binary for CLI output
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use llmbench::cli::{self, ClearTarget, ExportFormat, Workbench};
use llmbench::config::LlmBenchConfig;
use llmbench::observability::{InitOptions, LogFormat, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// llmbench - core services for a local LLM testing workbench.
#[derive(Parser)]
#[command(name = "llmbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format (text or json).
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Documents to ingest into memory before running the command.
    #[arg(short, long, global = true)]
    docs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Add documents to the memory store.
    Ingest {
        /// Files to ingest, named after their stems.
        files: Vec<PathBuf>,
        /// Inline text to ingest as one document.
        #[arg(long)]
        text: Option<String>,
        /// Name for the inline document.
        #[arg(long, default_value = "inline")]
        name: String,
    },
    /// Similarity search over the ingested documents.
    Search {
        /// The search query.
        query: String,
        /// Number of results to return (configured default when omitted).
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Run one message through the matcher pipeline.
    Ask {
        /// The user message.
        message: String,
        /// JSON file with an array of tool descriptors.
        #[arg(long)]
        tools: Option<PathBuf>,
    },
    /// Show memory and metrics status.
    Status,
    /// Export recorded metrics.
    Export {
        /// Output format.
        #[arg(value_enum)]
        format: ExportFormat,
        /// Only include the trailing window, in seconds.
        #[arg(long)]
        window_secs: Option<u64>,
    },
    /// Drop stored documents and/or recorded metrics.
    Clear {
        /// What to clear.
        #[arg(value_enum)]
        target: Option<ClearTarget>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(InitOptions {
        verbose: cli.verbose,
        format: LogFormat::parse(&cli.log_format),
    });

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = LlmBenchConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let session = Workbench::new(&config);

    if !cli.docs.is_empty() {
        let infos = session
            .ingest_files(&cli.docs)
            .context("ingesting documents")?;
        let chunks: usize = infos.iter().map(|i| i.chunk_count).sum();
        tracing::info!(files = cli.docs.len(), chunks, "documents ingested");
    }

    let output = match &cli.command {
        Commands::Ingest { files, text, name } => {
            cli::cmd_ingest(&session, files, text.as_deref(), name)?
        }
        Commands::Search { query, top_k } => {
            cli::cmd_search(&session, query, top_k.unwrap_or(session.default_top_k))?
        }
        Commands::Ask { message, tools } => {
            let tools = tools
                .as_deref()
                .map(cli::load_tools)
                .transpose()
                .context("loading tools")?
                .unwrap_or_default();
            cli::cmd_ask(&session, message, &tools)?
        }
        Commands::Status => cli::cmd_status(&session),
        Commands::Export {
            format,
            window_secs,
        } => cli::cmd_export(&session, *format, *window_secs)?,
        Commands::Clear { target } => {
            cli::cmd_clear(&session, target.unwrap_or(ClearTarget::All))
        }
    };
    Ok(output)
}
