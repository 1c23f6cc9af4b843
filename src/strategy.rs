use crate::transaction::Buy;
use std::fmt;

/// Lot-selection strategy for matching sells against prior buys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    FirstInFirstOut,
    #[default]
    LastInFirstOut,
    MostExpensiveFirstOut,
    LeastExpensiveFirstOut,
}

impl Strategy {
    /// Order candidate buys so that lots are consumed from the back of the
    /// list: FIFO puts the oldest lot last, LIFO the newest, and the price
    /// strategies the priciest or cheapest.
    pub fn order_buys(&self, buys: &mut [Buy]) {
        match self {
            Strategy::FirstInFirstOut => buys.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            Strategy::LastInFirstOut => buys.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            Strategy::MostExpensiveFirstOut => buys.sort_by(|a, b| a.price().cmp(&b.price())),
            Strategy::LeastExpensiveFirstOut => buys.sort_by(|a, b| b.price().cmp(&a.price())),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Strategy::FirstInFirstOut => "first-in-first-out",
            Strategy::LastInFirstOut => "last-in-first-out",
            Strategy::MostExpensiveFirstOut => "most-expensive-first-out",
            Strategy::LeastExpensiveFirstOut => "least-expensive-first-out",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
