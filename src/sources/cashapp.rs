//! Cash App activity export

use super::{parse_amount, parse_timestamp, SourceError, SourceRecord};
use crate::record::CsvField;
use crate::transaction::{Buy, Sell, Transaction};
use btax_derive::CsvSchema;
use serde::Deserialize;

/// Row of a Cash App activity export. `Amount` arrives signed (negative on
/// buys), `Asset Amount` unsigned.
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct Record {
    /// Platform transaction identifier
    #[serde(rename = "Transaction ID")]
    #[allow(dead_code)]
    pub transaction_id: Option<String>,
    /// Event time
    #[serde(rename = "Date")]
    pub date: String,
    /// Row type: Bitcoin Buy, Bitcoin Sale, Bitcoin Send, ...
    #[serde(rename = "Transaction Type")]
    pub tx_type: String,
    /// Traded asset symbol
    #[serde(rename = "Asset Type")]
    pub asset_type: Option<String>,
    /// BTCUSD price at execution
    #[serde(rename = "Asset Price")]
    #[allow(dead_code)]
    pub asset_price: Option<String>,
    /// Unsigned BTC quantity
    #[serde(rename = "Asset Amount")]
    pub asset_amount: Option<String>,
    /// Signed USD amount (negative on buys)
    #[serde(rename = "Amount")]
    pub amount: Option<String>,
    /// Row status
    #[serde(rename = "Status")]
    #[allow(dead_code)]
    pub status: Option<String>,
}

impl SourceRecord for Record {
    fn into_transaction(self) -> Result<Option<Transaction>, SourceError> {
        if self.tx_type != "Bitcoin Buy" && self.tx_type != "Bitcoin Sale" {
            return Ok(None);
        }
        if self.asset_type.as_deref() != Some("BTC") {
            return Ok(None);
        }
        let (Some(amount), Some(asset_amount)) = (&self.amount, &self.asset_amount) else {
            return Ok(None);
        };

        let timestamp = parse_timestamp(&self.date)?;
        let usd = parse_amount("Amount", amount)?;
        let btc = parse_amount("Asset Amount", asset_amount)?.abs();

        let tx = match self.tx_type.as_str() {
            "Bitcoin Buy" => Transaction::Buy(Buy::new(timestamp, btc, usd)?),
            _ => Transaction::Sell(Sell::new(timestamp, -btc, usd)?),
        };
        Ok(Some(tx))
    }
}
