//! Matching engine: pairs sells against prior buys into capital gains

use crate::strategy::Strategy;
use crate::transaction::{Buy, Sell, Transaction};
use chrono::{DateTime, Datelike, Months, Utc};
use rust_decimal::Decimal;

/// Holding-period classification of a matched gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    Short,
    Long,
}

/// A sell matched against the buy lot that funded it.
/// Both sides always carry the same BTC magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalGain {
    pub buy: Buy,
    pub sell: Sell,
}

impl CapitalGain {
    /// Realized gain: sale proceeds plus the (negative) purchase cost
    pub fn gain(&self) -> Decimal {
        self.sell.usd + self.buy.usd
    }

    /// Long-term only when held strictly longer than one calendar year;
    /// a sale on the anniversary itself is short-term.
    pub fn duration(&self) -> Duration {
        match self.buy.timestamp.checked_add_months(Months::new(12)) {
            Some(anniversary) if self.sell.timestamp > anniversary => Duration::Long,
            _ => Duration::Short,
        }
    }

    /// Reporting year: the calendar year of the sale
    pub fn year(&self) -> i32 {
        self.sell.timestamp.year()
    }
}

/// Whether any unmatched sell remains in the ledger
pub fn has_sell(transactions: &[Transaction]) -> bool {
    transactions.iter().any(Transaction::is_sell)
}

/// Index of the next sell in the ledger
pub fn next_sell_index(transactions: &[Transaction]) -> Option<usize> {
    transactions.iter().position(Transaction::is_sell)
}

/// Consume buy lots from the back of a strategy-ordered list until `btc`
/// is covered, splitting the final lot when it only partially covers.
/// Returns the consumed lots in consumption order.
pub fn pop_buys(buys: &mut Vec<Buy>, sell_timestamp: DateTime<Utc>, btc: Decimal) -> Vec<Buy> {
    let mut popped = Vec::new();
    let mut remaining = btc;

    while remaining > Decimal::ZERO {
        let Some(buy) = buys.pop() else {
            log::warn!(
                "sell of {} on {} exceeds open position by {} BTC",
                btc,
                sell_timestamp.format("%Y-%m-%d"),
                remaining
            );
            break;
        };
        if buy.btc <= remaining {
            log::debug!(
                "consumed lot of {} BTC from {}",
                buy.btc,
                buy.timestamp.format("%Y-%m-%d")
            );
            remaining -= buy.btc;
            popped.push(buy);
        } else {
            let (split, rest) = buy.split(remaining);
            log::debug!(
                "split lot of {} BTC from {}: consumed {}, kept {}",
                buy.btc,
                buy.timestamp.format("%Y-%m-%d"),
                split.btc,
                rest.btc
            );
            buys.push(rest);
            popped.push(split);
            remaining = Decimal::ZERO;
        }
    }

    popped
}

/// Remove the sell at `index` and match it against the buys that precede
/// it, ordered by the strategy. Unconsumed buy remainders go back into the
/// ledger in chronological order.
pub fn extract_sell(
    transactions: &mut Vec<Transaction>,
    index: usize,
    strategy: Strategy,
) -> (Sell, Vec<Buy>) {
    let mut buys = Vec::with_capacity(index);
    let mut unmatched = Vec::new();
    for tx in transactions.drain(..index) {
        match tx {
            Transaction::Buy(buy) => buys.push(buy),
            other => unmatched.push(other),
        }
    }
    let sell = match transactions.remove(0) {
        Transaction::Sell(sell) => sell,
        Transaction::Buy(_) => panic!("index {index} does not point at a sell"),
    };

    strategy.order_buys(&mut buys);
    let matched = pop_buys(&mut buys, sell.timestamp, -sell.btc);

    let mut front: Vec<Transaction> = buys.into_iter().map(Transaction::Buy).collect();
    front.extend(unmatched);
    front.sort_by_key(|tx| tx.timestamp());
    transactions.splice(0..0, front);

    (sell, matched)
}

/// Split a sell into per-lot sells mirroring the matched buys, each with
/// proportional USD. The final piece absorbs the exact remainder.
pub fn split_sell(sell: &Sell, buys: &[Buy]) -> Vec<Sell> {
    let mut parts = Vec::with_capacity(buys.len());
    let mut rest = Some(sell.clone());

    for buy in buys {
        let Some(current) = rest.take() else {
            break;
        };
        if current.btc == -buy.btc {
            parts.push(current);
        } else {
            let (piece, remainder) = current.split(-buy.btc);
            parts.push(piece);
            rest = Some(remainder);
        }
    }

    parts
}

/// Match every sell in the ledger against prior buys under the strategy,
/// in chronological sell order. Leftover buys stay in the ledger as the
/// open position.
pub fn match_capital_gains(
    transactions: &mut Vec<Transaction>,
    strategy: Strategy,
) -> Vec<CapitalGain> {
    let mut gains = Vec::new();

    while let Some(index) = next_sell_index(transactions) {
        let (sell, buys) = extract_sell(transactions, index, strategy);
        let sells = split_sell(&sell, &buys);
        for (buy, sell) in buys.into_iter().zip(sells) {
            gains.push(CapitalGain { buy, sell });
        }
    }

    log::debug!(
        "matched {} capital gains, {} open lots remain",
        gains.len(),
        transactions.len()
    );
    gains
}
