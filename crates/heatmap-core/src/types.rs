use serde::{Deserialize, Serialize};

/// One constituent's derived daily performance. Built only when both of the
/// two most recent daily closes are known and the prior close is nonzero;
/// symbols failing that precondition are dropped, never placeholdered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    /// Percentage change between the two most recent daily closes.
    pub daily_return: f64,
    /// Latest quoted price.
    pub price: f64,
    /// Provider-reported percent change when present, else `daily_return`.
    pub change: f64,
}

/// Latest quote for a symbol.
#[derive(Debug, Clone, Default)]
pub struct Quote {
    pub current: f64,
    pub percent_change: Option<f64>,
}

/// A window of daily candles. `status` mirrors the provider's flag;
/// anything other than "ok" means the window carries no usable data.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    pub status: String,
    pub closes: Vec<f64>,
}

impl CandleWindow {
    pub fn has_data(&self) -> bool {
        self.status == "ok"
    }
}
