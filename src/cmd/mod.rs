//! Command-line surface

pub mod import;
pub mod report;
pub mod schema;
pub mod write;

use crate::record;
use crate::sources::Source;
use crate::strategy::Strategy;
use crate::transaction::Transaction;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "btax", version, about = "Bitcoin capital gains calculator")]
pub struct Cli {
    /// Suppress the disclaimer banner
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a platform transaction history into the normalized format
    Import(import::ImportCommand),
    /// Calculate capital gains and display per-year tax tables
    Report(report::ReportCommand),
    /// Write per-year capital gains CSV files
    Write(write::WriteCommand),
    /// Print the expected input formats
    Schema(schema::SchemaCommand),
}

impl Cli {
    pub fn exec(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Import(cmd) => cmd.exec(),
            Command::Report(cmd) => cmd.exec(),
            Command::Write(cmd) => cmd.exec(),
            Command::Schema(cmd) => cmd.exec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StrategyArg {
    FirstInFirstOut,
    #[default]
    LastInFirstOut,
    MostExpensiveFirstOut,
    LeastExpensiveFirstOut,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FirstInFirstOut => Strategy::FirstInFirstOut,
            StrategyArg::LastInFirstOut => Strategy::LastInFirstOut,
            StrategyArg::MostExpensiveFirstOut => Strategy::MostExpensiveFirstOut,
            StrategyArg::LeastExpensiveFirstOut => Strategy::LeastExpensiveFirstOut,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Gemini,
    Swan,
    Cashapp,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Gemini => Source::Gemini,
            SourceArg::Swan => Source::Swan,
            SourceArg::Cashapp => Source::CashApp,
        }
    }
}

/// Read normalized transactions from a CSV or JSON file, or stdin with "-"
pub fn read_transactions(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => record::read_json(reader),
        _ => record::read_csv(reader),
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<Transaction>> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;
    if buffer.is_empty() {
        anyhow::bail!("no input received; provide a file or pipe data to stdin");
    }
    record::read_csv(io::Cursor::new(buffer))
}
