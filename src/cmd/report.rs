//! Report command - per-year capital gains tables and totals

use super::{read_transactions, StrategyArg};
use crate::capgains::{self, CapitalGain, Duration};
use crate::report::{tabulate, Totals, Year};
use crate::strategy::Strategy;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table,
};

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Normalized transactions (CSV or JSON); "-" reads CSV from stdin
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Lot-selection strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::LastInFirstOut)]
    strategy: StrategyArg,

    /// Calendar year to report
    #[arg(short, long)]
    year: Option<Year>,

    /// Holding-period filter
    #[arg(short, long, value_enum)]
    duration: Option<DurationArg>,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DurationArg {
    Short,
    Long,
}

impl From<DurationArg> for Duration {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::Short => Duration::Short,
            DurationArg::Long => Duration::Long,
        }
    }
}

/// Report summary for JSON output
#[derive(Debug, Serialize)]
struct ReportData {
    strategy: String,
    year: String,
    sections: Vec<SectionData>,
    totals: TotalsData,
}

#[derive(Debug, Serialize)]
struct SectionData {
    year: Year,
    duration: String,
    disposals: usize,
    proceeds: String,
    cost_basis: String,
    gain: String,
}

#[derive(Debug, Serialize)]
struct TotalsData {
    disposals: usize,
    proceeds: String,
    cost_basis: String,
    gain: String,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let strategy = Strategy::from(self.strategy);
        let mut transactions = read_transactions(&self.file)?;
        if !capgains::has_sell(&transactions) {
            println!("No sells found; nothing to report");
            return Ok(());
        }

        let gains = capgains::match_capital_gains(&mut transactions, strategy);
        let gains = self.filter(gains);

        if self.json {
            self.print_json(&gains, strategy)
        } else {
            self.print_tables(&gains, strategy);
            Ok(())
        }
    }

    fn filter(&self, gains: Vec<CapitalGain>) -> Vec<CapitalGain> {
        gains
            .into_iter()
            .filter(|g| self.year.is_none_or(|y| g.year() == y))
            .filter(|g| {
                self.duration
                    .is_none_or(|d| g.duration() == Duration::from(d))
            })
            .collect()
    }

    fn print_tables(&self, gains: &[CapitalGain], strategy: Strategy) {
        let year_str = self
            .year
            .map_or("All Years".to_string(), |y| y.to_string());

        println!();
        println!("CAPITAL GAINS ({}, {})", year_str, strategy);
        println!();

        if gains.is_empty() {
            println!("No capital gains found matching filters");
            return;
        }

        let tables = tabulate(gains);
        let groups = [
            (Duration::Short, &tables.short),
            (Duration::Long, &tables.long),
        ];
        for (duration, years) in groups {
            for (year, rows) in years {
                let totals = Totals::from_gains(section_gains(gains, *year, duration));

                println!("{} {}", year, duration_title(duration));
                let table = Table::new(rows)
                    .with(Style::rounded())
                    .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                    .to_string();
                println!("{}", table);
                println!(
                    "  Proceeds: {} | Cost Basis: {} | Gain: {}",
                    format_usd(totals.proceeds),
                    format_usd(totals.cost_basis),
                    format_usd_signed(totals.gain)
                );
                println!();
            }
        }

        let totals = Totals::from_gains(gains);
        println!(
            "TOTAL ({} disposals): Proceeds {} | Cost Basis {} | Gain {}",
            totals.disposals,
            format_usd(totals.proceeds),
            format_usd(totals.cost_basis),
            format_usd_signed(totals.gain)
        );
        println!();
    }

    fn print_json(&self, gains: &[CapitalGain], strategy: Strategy) -> anyhow::Result<()> {
        let tables = tabulate(gains);
        let mut sections = Vec::new();
        let groups = [
            (Duration::Short, &tables.short),
            (Duration::Long, &tables.long),
        ];
        for (duration, years) in groups {
            for year in years.keys() {
                let totals = Totals::from_gains(section_gains(gains, *year, duration));
                sections.push(SectionData {
                    year: *year,
                    duration: duration_name(duration).to_string(),
                    disposals: totals.disposals,
                    proceeds: format_amount(totals.proceeds),
                    cost_basis: format_amount(totals.cost_basis),
                    gain: format_amount(totals.gain),
                });
            }
        }

        let totals = Totals::from_gains(gains);
        let data = ReportData {
            strategy: strategy.to_string(),
            year: self
                .year
                .map_or("All Years".to_string(), |y| y.to_string()),
            sections,
            totals: TotalsData {
                disposals: totals.disposals,
                proceeds: format_amount(totals.proceeds),
                cost_basis: format_amount(totals.cost_basis),
                gain: format_amount(totals.gain),
            },
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

fn section_gains(
    gains: &[CapitalGain],
    year: Year,
    duration: Duration,
) -> impl Iterator<Item = &CapitalGain> {
    gains
        .iter()
        .filter(move |g| g.year() == year && g.duration() == duration)
}

fn duration_title(duration: Duration) -> &'static str {
    match duration {
        Duration::Short => "SHORT-TERM",
        Duration::Long => "LONG-TERM",
    }
}

fn duration_name(duration: Duration) -> &'static str {
    match duration {
        Duration::Short => "short",
        Duration::Long => "long",
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn format_usd_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs().round_dp(2))
    } else {
        format!("${:.2}", amount.round_dp(2))
    }
}
