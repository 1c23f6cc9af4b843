//! Swan transaction history

use super::{parse_amount, parse_timestamp, SourceError, SourceRecord};
use crate::record::CsvField;
use crate::transaction::{Buy, Sell, Transaction};
use btax_derive::CsvSchema;
use serde::Deserialize;

/// Row of a Swan transaction history export. Amounts arrive unsigned and
/// are signed during normalization.
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct Record {
    /// Event time, RFC 3339
    #[serde(rename = "Date")]
    pub date: String,
    /// Event kind: Purchase, Sale, Withdrawal, ...
    #[serde(rename = "Event")]
    pub event: String,
    /// Event status; only Completed rows are trades
    #[serde(rename = "Status")]
    pub status: String,
    /// BTCUSD price at execution
    #[serde(rename = "Unit Price")]
    #[allow(dead_code)]
    pub unit_price: Option<String>,
    /// Unsigned USD amount
    #[serde(rename = "Amount USD")]
    pub usd_amount: Option<String>,
    /// Unsigned BTC amount
    #[serde(rename = "Amount BTC")]
    pub btc_amount: Option<String>,
}

impl SourceRecord for Record {
    fn into_transaction(self) -> Result<Option<Transaction>, SourceError> {
        if self.status != "Completed" {
            return Ok(None);
        }
        if self.event != "Purchase" && self.event != "Sale" {
            return Ok(None);
        }
        let (Some(usd_amount), Some(btc_amount)) = (&self.usd_amount, &self.btc_amount) else {
            return Ok(None);
        };

        let timestamp = parse_timestamp(&self.date)?;
        let usd = parse_amount("Amount USD", usd_amount)?.abs();
        let btc = parse_amount("Amount BTC", btc_amount)?.abs();

        let tx = match self.event.as_str() {
            "Purchase" => Transaction::Buy(Buy::new(timestamp, btc, -usd)?),
            _ => Transaction::Sell(Sell::new(timestamp, -btc, usd)?),
        };
        Ok(Some(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::csv_to_transactions;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    const HISTORY: &str = "\
Date,Event,Status,Unit Price,Amount USD,Amount BTC
2023-06-13T15:27:27Z,Purchase,Completed,\"$25,864.93\",900.00,0.0347969
2023-09-02T10:11:12Z,Withdrawal,Completed,,,0.02
2023-11-14T13:34:17Z,Purchase,Completed,\"$36,703.48\",500.00,0.01362289
2023-11-20T08:00:00Z,Purchase,Canceled,\"$37,000.00\",100.00,0.0027
";

    #[test]
    fn reads_completed_purchases() {
        let transactions = csv_to_transactions::<_, Record>(HISTORY.as_bytes()).unwrap();

        assert_eq!(
            transactions,
            vec![
                Transaction::Buy(
                    Buy::new(
                        Utc.with_ymd_and_hms(2023, 6, 13, 15, 27, 27).unwrap(),
                        dec!(0.0347969),
                        dec!(-900.00),
                    )
                    .unwrap()
                ),
                Transaction::Buy(
                    Buy::new(
                        Utc.with_ymd_and_hms(2023, 11, 14, 13, 34, 17).unwrap(),
                        dec!(0.01362289),
                        dec!(-500.00),
                    )
                    .unwrap()
                ),
            ]
        );
    }

    #[test]
    fn reads_sales_with_signed_amounts() {
        let history = "\
Date,Event,Status,Unit Price,Amount USD,Amount BTC
2024-02-01T09:30:00Z,Sale,Completed,\"$43,210.00\",432.10,0.01
";
        let transactions = csv_to_transactions::<_, Record>(history.as_bytes()).unwrap();

        assert_eq!(
            transactions,
            vec![Transaction::Sell(
                Sell::new(
                    Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap(),
                    dec!(-0.01),
                    dec!(432.10),
                )
                .unwrap()
            )]
        );
    }
}
