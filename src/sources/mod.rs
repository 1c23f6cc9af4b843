//! Platform transaction-history imports

pub mod cashapp;
pub mod gemini;
pub mod swan;

use crate::record::CsvField;
use crate::transaction::{Transaction, TransactionError};
use serde::de::DeserializeOwned;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("invalid {field} amount {value:?}")]
    InvalidAmount { field: &'static str, value: String },
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// A row of a platform's transaction-history export.
///
/// Conversion yields `None` for rows that are not BTCUSD trades
/// (transfers, rewards, summary lines).
pub trait SourceRecord: DeserializeOwned {
    fn into_transaction(self) -> Result<Option<Transaction>, SourceError>;
}

/// Supported transaction-history sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Gemini,
    Swan,
    CashApp,
}

impl Source {
    pub fn read_transactions<R: Read>(&self, reader: R) -> Result<Vec<Transaction>, SourceError> {
        match self {
            Source::Gemini => csv_to_transactions::<R, gemini::Record>(reader),
            Source::Swan => csv_to_transactions::<R, swan::Record>(reader),
            Source::CashApp => csv_to_transactions::<R, cashapp::Record>(reader),
        }
    }

    /// Columns expected in this platform's export
    pub fn csv_schema(&self) -> &'static [CsvField] {
        match self {
            Source::Gemini => gemini::Record::csv_schema(),
            Source::Swan => swan::Record::csv_schema(),
            Source::CashApp => cashapp::Record::csv_schema(),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Source::Gemini => "gemini",
            Source::Swan => "swan",
            Source::CashApp => "cashapp",
        }
    }
}

/// Deserialize an export, convert the trade rows, and sort by timestamp
pub fn csv_to_transactions<R, Rec>(reader: R) -> Result<Vec<Transaction>, SourceError>
where
    R: Read,
    Rec: SourceRecord,
{
    let mut rdr = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    for result in rdr.deserialize::<Rec>() {
        let record = result?;
        if let Some(tx) = record.into_transaction()? {
            transactions.push(tx);
        }
    }
    transactions.sort_by_key(|tx| tx.timestamp());
    Ok(transactions)
}

fn parse_timestamp(value: &str) -> Result<chrono::DateTime<chrono::Utc>, SourceError> {
    crate::utils::parse_timestamp(value)
        .ok_or_else(|| SourceError::InvalidTimestamp(value.to_string()))
}

fn parse_amount(field: &'static str, value: &str) -> Result<rust_decimal::Decimal, SourceError> {
    crate::utils::parse_amount(value).ok_or_else(|| SourceError::InvalidAmount {
        field,
        value: value.to_string(),
    })
}
