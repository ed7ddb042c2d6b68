//! MSR search compiler
//!
//! Reads a JSON request document with `filter` and/or `paging` members from
//! a file or stdin and prints the compiled query, geometry, sort and page as
//! JSON.

mod document;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use msr_search::SearchConfig;
use tracing::{debug, info};

use crate::document::{RequestDocument, compile_document};

#[derive(Debug, Parser)]
#[command(name = "msr-search", version)]
#[command(about = "Maritime Service Registry search compiler")]
struct Cli {
    /// Request document; stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    config: SearchConfig,
}

/// Initializes the tracing subscriber, writing to stderr.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("msr_search={level},msr_search_cli={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let text = read_input(cli.input.as_ref())?;
    let document: RequestDocument =
        serde_json::from_str(&text).context("Invalid request document")?;
    if document.is_empty() {
        anyhow::bail!("Request document has neither a filter nor a paging member");
    }
    debug!(
        filter = document.filter.is_some(),
        paging = document.paging.is_some(),
        "Read request document"
    );

    let response = compile_document(&document, &cli.config)?;
    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    info!(version = msr_search::VERSION, "Compiled request document");
    Ok(())
}
