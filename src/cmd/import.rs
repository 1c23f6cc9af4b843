//! Import command - platform history to normalized transaction CSV

use super::SourceArg;
use crate::record::TransactionRecord;
use crate::sources::Source;
use crate::utils;
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// Platform the history was exported from
    #[arg(short, long, value_enum)]
    source: SourceArg,

    /// Platform CSV export
    file: PathBuf,
}

impl ImportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let source = Source::from(self.source);
        let file = File::open(&self.file)
            .with_context(|| format!("failed to open {}", self.file.display()))?;
        let transactions = source
            .read_transactions(file)
            .with_context(|| format!("failed to import {} history", source.display()))?;
        log::info!(
            "imported {} transactions from {}",
            transactions.len(),
            self.file.display()
        );

        let records: Vec<TransactionRecord> = transactions.iter().map(Into::into).collect();
        utils::write_csv(records, io::stdout())
    }
}
