//! Normalized transaction interchange format (CSV and JSON)

use crate::transaction::{Buy, Sell, Transaction, TransactionError};
use crate::utils;
use btax_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// Description of one CSV column, generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Error)]
pub enum RecordError {
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("invalid {field} amount {value:?}")]
    InvalidAmount { field: &'static str, value: String },
    #[error("unknown transaction kind {0:?}")]
    UnknownKind(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Wire format for a normalized BTCUSD transaction.
///
/// Amounts are exact decimal strings, signed by the ledger convention:
/// buys have positive `btc` and negative `usd`, sells the reverse.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct TransactionRecord {
    /// Execution time, RFC 3339 (UTC)
    pub timestamp: String,
    /// Buy or Sell
    pub kind: String,
    /// Signed USD amount (negative on buys)
    pub usd: String,
    /// Signed BTC amount (negative on sells)
    pub btc: String,
}

/// JSON input document wrapping normalized transaction records
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionsInput {
    pub transactions: Vec<TransactionRecord>,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        let kind = match tx {
            Transaction::Buy(_) => "Buy",
            Transaction::Sell(_) => "Sell",
        };
        TransactionRecord {
            timestamp: tx.timestamp().to_rfc3339(),
            kind: kind.to_string(),
            usd: tx.usd().to_string(),
            btc: tx.btc().to_string(),
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = RecordError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let timestamp = utils::parse_timestamp(&record.timestamp)
            .ok_or_else(|| RecordError::InvalidTimestamp(record.timestamp.clone()))?;
        let usd: Decimal = utils::parse_amount(&record.usd).ok_or(RecordError::InvalidAmount {
            field: "usd",
            value: record.usd.clone(),
        })?;
        let btc: Decimal = utils::parse_amount(&record.btc).ok_or(RecordError::InvalidAmount {
            field: "btc",
            value: record.btc.clone(),
        })?;

        match record.kind.as_str() {
            "Buy" => Ok(Transaction::Buy(Buy::new(timestamp, btc, usd)?)),
            "Sell" => Ok(Transaction::Sell(Sell::new(timestamp, btc, usd)?)),
            other => Err(RecordError::UnknownKind(other.to_string())),
        }
    }
}

/// Read normalized transactions from CSV, sorted by timestamp
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    for result in rdr.deserialize::<TransactionRecord>() {
        let record = result?;
        transactions.push(Transaction::try_from(record)?);
    }
    transactions.sort_by_key(|tx| tx.timestamp());
    Ok(transactions)
}

/// Read normalized transactions from JSON, sorted by timestamp
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let input: TransactionsInput = serde_json::from_reader(reader)?;
    let mut transactions = input
        .transactions
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    transactions.sort_by_key(|tx| tx.timestamp());
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn parse_csv_sorted_by_timestamp() {
        let csv_data = "\
timestamp,kind,usd,btc
2020-06-24T16:13:54Z,Buy,-10,2
2020-06-23T20:45:03Z,Sell,5,-1
2020-06-23T20:42:26Z,Buy,-5,1
";
        let transactions = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(
            transactions[0],
            Transaction::Buy(
                Buy::new(
                    Utc.with_ymd_and_hms(2020, 6, 23, 20, 42, 26).unwrap(),
                    dec!(1),
                    dec!(-5),
                )
                .unwrap()
            )
        );
        assert!(transactions[1].is_sell());
        assert_eq!(transactions[2].btc(), dec!(2));
    }

    #[test]
    fn parse_json_input() {
        let json_data = r#"{
            "transactions": [
                {
                    "timestamp": "2021-06-08T15:04:56Z",
                    "kind": "Sell",
                    "usd": "15",
                    "btc": "-3"
                }
            ]
        }"#;
        let transactions = read_json(json_data.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].usd(), dec!(15));
    }

    #[test]
    fn sign_violations_are_errors() {
        let csv_data = "\
timestamp,kind,usd,btc
2020-06-23T20:42:26Z,Buy,5,1
";
        assert!(read_csv(csv_data.as_bytes()).is_err());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let record = TransactionRecord {
            timestamp: "2020-06-23T20:42:26Z".to_string(),
            kind: "Transfer".to_string(),
            usd: "0".to_string(),
            btc: "0".to_string(),
        };
        assert!(matches!(
            Transaction::try_from(record),
            Err(RecordError::UnknownKind(_))
        ));
    }

    #[test]
    fn record_round_trip() {
        let tx = Transaction::Sell(
            Sell::new(
                Utc.with_ymd_and_hms(2023, 12, 25, 14, 53, 19).unwrap(),
                dec!(-0.12656005),
                dec!(5500),
            )
            .unwrap(),
        );
        let record = TransactionRecord::from(&tx);
        assert_eq!(record.kind, "Sell");
        assert_eq!(Transaction::try_from(record).unwrap(), tx);
    }

    #[test]
    fn csv_schema_from_derive() {
        let schema = TransactionRecord::csv_schema();
        let names: Vec<_> = schema.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["timestamp", "kind", "usd", "btc"]);
        assert!(schema.iter().all(|f| f.required));
    }
}
