//! Gemini transaction history

use super::{parse_amount, parse_timestamp, SourceError, SourceRecord};
use crate::record::CsvField;
use crate::transaction::{Buy, Sell, Transaction};
use btax_derive::CsvSchema;
use serde::Deserialize;

/// Row of a Gemini transaction history export. Amounts arrive already
/// signed: USD negative on buys, BTC negative on sells.
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct Record {
    /// Execution time (UTC)
    #[serde(rename = "Date")]
    pub date: String,
    /// Row type: Buy, Sell, Credit, Debit, ...
    #[serde(rename = "Type")]
    pub tx_type: String,
    /// Signed USD notional; blank on non-trade rows
    #[serde(rename = "USD Amount USD")]
    pub usd_amount: Option<String>,
    /// Signed BTC quantity; blank on non-trade rows
    #[serde(rename = "BTC Amount BTC")]
    pub btc_amount: Option<String>,
}

impl SourceRecord for Record {
    fn into_transaction(self) -> Result<Option<Transaction>, SourceError> {
        if self.tx_type != "Buy" && self.tx_type != "Sell" {
            return Ok(None);
        }
        let (Some(usd_amount), Some(btc_amount)) = (&self.usd_amount, &self.btc_amount) else {
            return Ok(None);
        };

        let timestamp = parse_timestamp(&self.date)?;
        let usd = parse_amount("USD Amount USD", usd_amount)?;
        let btc = parse_amount("BTC Amount BTC", btc_amount)?;

        let tx = match self.tx_type.as_str() {
            "Buy" => Transaction::Buy(Buy::new(timestamp, btc, usd)?),
            _ => Transaction::Sell(Sell::new(timestamp, btc, usd)?),
        };
        Ok(Some(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::csv_to_transactions;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HISTORY: &str = "\
Date,Type,Symbol,USD Amount USD,BTC Amount BTC
2020-06-23 20:42:26.889,Buy,BTCUSD,-5,1
2020-06-23 20:45:03.979,Sell,BTCUSD,5,-1
2020-06-24 16:13:54,Buy,BTCUSD,-10,2
2020-07-01 09:00:00,Credit,BTCUSD,,0.1
2020-08-17 14:13:24.948,Sell,BTCUSD,10,-2
2021-06-08 15:04:56.840,Sell,BTCUSD,15,-3
";

    #[test]
    fn reads_buys_and_sells() {
        let transactions = csv_to_transactions::<_, Record>(HISTORY.as_bytes()).unwrap();

        let expected_first = Transaction::Buy(
            Buy::new(
                NaiveDate::from_ymd_opt(2020, 6, 23)
                    .unwrap()
                    .and_hms_milli_opt(20, 42, 26, 889)
                    .unwrap()
                    .and_utc(),
                dec!(1),
                dec!(-5),
            )
            .unwrap(),
        );
        assert_eq!(transactions.len(), 5);
        assert_eq!(transactions[0], expected_first);
        assert!(transactions[1].is_sell());
        assert_eq!(transactions[4].usd(), dec!(15));
    }

    #[test]
    fn skips_non_trade_rows() {
        let transactions = csv_to_transactions::<_, Record>(HISTORY.as_bytes()).unwrap();
        assert!(transactions.iter().all(|tx| tx.btc().abs() >= dec!(1)));
    }

    #[test]
    fn schema_names_export_columns() {
        let names: Vec<_> = Record::csv_schema().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["Date", "Type", "USD Amount USD", "BTC Amount BTC"]
        );
    }
}
