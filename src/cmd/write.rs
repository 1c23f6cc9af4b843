//! Write command - per-year capital gains CSV files

use super::{read_transactions, StrategyArg};
use crate::capgains;
use crate::report::{tabulate, write_capital_gains};
use crate::strategy::Strategy;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct WriteCommand {
    /// Normalized transactions (CSV or JSON); "-" reads CSV from stdin
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Directory for the per-year CSV files
    #[arg(short, long)]
    out: PathBuf,

    /// Lot-selection strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::LastInFirstOut)]
    strategy: StrategyArg,
}

impl WriteCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let strategy = Strategy::from(self.strategy);
        let mut transactions = read_transactions(&self.file)?;
        let gains = capgains::match_capital_gains(&mut transactions, strategy);
        let tables = tabulate(&gains);

        let written = write_capital_gains(&self.out, &tables)?;
        if written.is_empty() {
            println!("No capital gains to write");
        }
        for path in &written {
            println!("{}", path.display());
        }
        Ok(())
    }
}
