use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Violation of the sign conventions for a buy or sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("BTC amount must be positive for a buy")]
    BuyBtcSign,
    #[error("USD amount must be negative for a buy")]
    BuyUsdSign,
    #[error("BTC amount must be negative for a sell")]
    SellBtcSign,
    #[error("USD amount must be positive for a sell")]
    SellUsdSign,
}

/// A BTCUSD purchase: cash out, coin in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buy {
    pub timestamp: DateTime<Utc>,
    pub btc: Decimal,
    pub usd: Decimal,
}

impl Buy {
    pub fn new(
        timestamp: DateTime<Utc>,
        btc: Decimal,
        usd: Decimal,
    ) -> Result<Self, TransactionError> {
        if btc < Decimal::ZERO {
            return Err(TransactionError::BuyBtcSign);
        }
        if usd > Decimal::ZERO {
            return Err(TransactionError::BuyUsdSign);
        }
        Ok(Buy {
            timestamp,
            btc,
            usd,
        })
    }

    /// BTCUSD execution price
    pub fn price(&self) -> Decimal {
        price(self.btc, self.usd)
    }

    /// Divide the lot at `at_btc` (positive), carrying proportional USD.
    /// The two parts always sum back to the original.
    pub fn split(&self, at_btc: Decimal) -> (Buy, Buy) {
        let ((btc, usd), (rest_btc, rest_usd)) = split_amounts(self.btc, self.usd, at_btc);
        (
            Buy {
                timestamp: self.timestamp,
                btc,
                usd,
            },
            Buy {
                timestamp: self.timestamp,
                btc: rest_btc,
                usd: rest_usd,
            },
        )
    }
}

/// A BTCUSD sale: coin out, cash in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sell {
    pub timestamp: DateTime<Utc>,
    pub btc: Decimal,
    pub usd: Decimal,
}

impl Sell {
    pub fn new(
        timestamp: DateTime<Utc>,
        btc: Decimal,
        usd: Decimal,
    ) -> Result<Self, TransactionError> {
        if btc > Decimal::ZERO {
            return Err(TransactionError::SellBtcSign);
        }
        if usd < Decimal::ZERO {
            return Err(TransactionError::SellUsdSign);
        }
        Ok(Sell {
            timestamp,
            btc,
            usd,
        })
    }

    /// BTCUSD execution price
    #[allow(dead_code)]
    pub fn price(&self) -> Decimal {
        price(self.btc, self.usd)
    }

    /// Divide the sale at `at_btc` (negative), carrying proportional USD.
    pub fn split(&self, at_btc: Decimal) -> (Sell, Sell) {
        let ((btc, usd), (rest_btc, rest_usd)) = split_amounts(self.btc, self.usd, at_btc);
        (
            Sell {
                timestamp: self.timestamp,
                btc,
                usd,
            },
            Sell {
                timestamp: self.timestamp,
                btc: rest_btc,
                usd: rest_usd,
            },
        )
    }
}

/// A ledger entry: either side of the BTCUSD trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Buy(Buy),
    Sell(Sell),
}

impl Transaction {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Transaction::Buy(buy) => buy.timestamp,
            Transaction::Sell(sell) => sell.timestamp,
        }
    }

    pub fn btc(&self) -> Decimal {
        match self {
            Transaction::Buy(buy) => buy.btc,
            Transaction::Sell(sell) => sell.btc,
        }
    }

    pub fn usd(&self) -> Decimal {
        match self {
            Transaction::Buy(buy) => buy.usd,
            Transaction::Sell(sell) => sell.usd,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Transaction::Sell(_))
    }
}

fn price(btc: Decimal, usd: Decimal) -> Decimal {
    usd.checked_div(btc)
        .map(|p| p.abs())
        .unwrap_or(Decimal::ZERO)
}

/// Split `(btc, usd)` at `at_btc`, USD pro rata. The remainder takes the
/// exact rest so that BTC and USD are conserved.
fn split_amounts(
    btc: Decimal,
    usd: Decimal,
    at_btc: Decimal,
) -> ((Decimal, Decimal), (Decimal, Decimal)) {
    let at_usd = usd
        .checked_div(btc)
        .map(|unit| unit * at_btc)
        .unwrap_or(Decimal::ZERO);
    ((at_btc, at_usd), (btc - at_btc, usd - at_usd))
}
