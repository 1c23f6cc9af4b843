//! Per-year tax tables in the shape of IRS Form 8949 rows

use crate::capgains::{CapitalGain, Duration};
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::Tabled;

pub type Year = i32;

/// One reportable disposal, formatted for tax filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct GainRow {
    #[serde(rename = "Description of Property")]
    #[tabled(rename = "Description of Property")]
    pub description: String,

    #[serde(rename = "Date Acquired")]
    #[tabled(rename = "Date Acquired")]
    pub date_acquired: String,

    #[serde(rename = "Date Sold or Disposed Of")]
    #[tabled(rename = "Date Sold or Disposed Of")]
    pub date_sold: String,

    #[serde(rename = "Proceeds (Sales Price)")]
    #[tabled(rename = "Proceeds (Sales Price)")]
    pub proceeds: String,

    #[serde(rename = "Cost or Other Basis")]
    #[tabled(rename = "Cost or Other Basis")]
    pub cost_basis: String,

    #[serde(rename = "Gain or (Loss)")]
    #[tabled(rename = "Gain or (Loss)")]
    pub gain: String,
}

impl From<&CapitalGain> for GainRow {
    fn from(gain: &CapitalGain) -> Self {
        GainRow {
            description: format!("{:.8} BTC", gain.buy.btc),
            date_acquired: gain.buy.timestamp.format("%m/%d/%Y").to_string(),
            date_sold: gain.sell.timestamp.format("%m/%d/%Y").to_string(),
            proceeds: format_amount(gain.sell.usd),
            cost_basis: format_amount(gain.buy.usd.abs()),
            gain: format_amount(gain.gain()),
        }
    }
}

/// Gains grouped by sale year and holding period
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaxTables {
    pub short: BTreeMap<Year, Vec<GainRow>>,
    pub long: BTreeMap<Year, Vec<GainRow>>,
}

/// Group matched gains by sale year and duration into Form 8949 rows
pub fn tabulate(gains: &[CapitalGain]) -> TaxTables {
    let mut tables = TaxTables::default();
    for gain in gains {
        let table = match gain.duration() {
            Duration::Short => &mut tables.short,
            Duration::Long => &mut tables.long,
        };
        table.entry(gain.year()).or_default().push(gain.into());
    }
    tables
}

/// Aggregate totals over a set of matched gains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub disposals: usize,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub gain: Decimal,
}

impl Totals {
    pub fn from_gains<'a, I>(gains: I) -> Self
    where
        I: IntoIterator<Item = &'a CapitalGain>,
    {
        gains.into_iter().fold(Totals::default(), |acc, g| Totals {
            disposals: acc.disposals + 1,
            proceeds: acc.proceeds + g.sell.usd,
            cost_basis: acc.cost_basis + g.buy.usd.abs(),
            gain: acc.gain + g.gain(),
        })
    }
}

/// Write one year's rows as CSV with the Form 8949 header
pub fn write_gains_csv<W: Write>(rows: &[GainRow], writer: W) -> anyhow::Result<()> {
    crate::utils::write_csv(rows, writer)
}

pub fn gains_file_name(year: Year, duration: Duration) -> String {
    let duration = match duration {
        Duration::Short => "short",
        Duration::Long => "long",
    };
    format!("{year}_{duration}_gains.csv")
}

/// Write one CSV per year and holding period into `dir`, creating it if
/// absent. Returns the paths written.
pub fn write_capital_gains(dir: &Path, tables: &TaxTables) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut written = Vec::new();
    let groups = [
        (Duration::Short, &tables.short),
        (Duration::Long, &tables.long),
    ];
    for (duration, years) in groups {
        for (year, rows) in years {
            if rows.is_empty() {
                continue;
            }
            let path = dir.join(gains_file_name(*year, duration));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_gains_csv(rows, file)?;
            log::info!("wrote {}", path.display());
            written.push(path);
        }
    }
    Ok(written)
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
