use async_trait::async_trait;

use crate::error::HeatmapError;
use crate::types::{CandleWindow, Quote};

/// Read-only market data source. Implemented by the Finnhub client and by
/// in-memory mocks in tests.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Ordered symbol list for a named index.
    async fn index_constituents(&self, index: &str) -> Result<Vec<String>, HeatmapError>;

    /// Latest quote for a symbol.
    async fn quote(&self, symbol: &str) -> Result<Quote, HeatmapError>;

    /// Daily candles for a symbol over a unix time range.
    async fn daily_candles(
        &self,
        symbol: &str,
        from: i64,
        to: i64,
    ) -> Result<CandleWindow, HeatmapError>;
}
