use heatmap_core::{summarize, HeatmapError, MarketData, RunStatistics, StockRecord};

use crate::aggregator;

/// The one fixed universe this bot reports on.
pub const INDEX_SYMBOL: &str = "^NDX";

/// Everything one run produces before delivery.
#[derive(Debug)]
pub struct RunOutput {
    pub stats: RunStatistics,
    pub records: Vec<StockRecord>,
    pub image: String,
}

/// One full run: resolve constituents, aggregate records, summarize,
/// render. Fails with `DataUnavailable` before any per-symbol fetch when
/// the constituent list is empty.
pub async fn build_report<M: MarketData>(market: &M) -> Result<RunOutput, HeatmapError> {
    let symbols = market.index_constituents(INDEX_SYMBOL).await?;
    if symbols.is_empty() {
        return Err(HeatmapError::DataUnavailable(format!(
            "index {} returned no constituents",
            INDEX_SYMBOL
        )));
    }
    tracing::info!("Resolved {} constituents for {}", symbols.len(), INDEX_SYMBOL);

    let records = aggregator::collect_records(market, &symbols).await?;
    tracing::info!(
        "Aggregated {} of {} symbols",
        records.len(),
        symbols.len()
    );

    let stats = summarize(&records).ok_or(HeatmapError::NoDataAvailable)?;
    let image = treemap_render::render(&records);

    Ok(RunOutput {
        stats,
        records,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use heatmap_core::{CandleWindow, Quote};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolves an empty constituent list and counts per-symbol calls.
    #[derive(Default)]
    struct EmptyIndex {
        per_symbol_calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketData for EmptyIndex {
        async fn index_constituents(&self, _index: &str) -> Result<Vec<String>, HeatmapError> {
            Ok(Vec::new())
        }

        async fn quote(&self, _symbol: &str) -> Result<Quote, HeatmapError> {
            self.per_symbol_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Quote::default())
        }

        async fn daily_candles(
            &self,
            _symbol: &str,
            _from: i64,
            _to: i64,
        ) -> Result<CandleWindow, HeatmapError> {
            self.per_symbol_calls.fetch_add(1, Ordering::SeqCst);
            Ok(CandleWindow {
                status: "ok".to_string(),
                closes: vec![],
            })
        }
    }

    #[tokio::test]
    async fn empty_constituents_fail_before_any_fetch() {
        let market = EmptyIndex::default();

        let err = build_report(&market).await.unwrap_err();
        assert!(matches!(err, HeatmapError::DataUnavailable(_)));
        assert_eq!(market.per_symbol_calls.load(Ordering::SeqCst), 0);
    }

    /// A fixed two-symbol index with healthy data end to end.
    struct TinyIndex;

    #[async_trait]
    impl MarketData for TinyIndex {
        async fn index_constituents(&self, _index: &str) -> Result<Vec<String>, HeatmapError> {
            Ok(vec!["AAPL".to_string(), "MSFT".to_string()])
        }

        async fn quote(&self, _symbol: &str) -> Result<Quote, HeatmapError> {
            Ok(Quote {
                current: 100.0,
                percent_change: None,
            })
        }

        async fn daily_candles(
            &self,
            symbol: &str,
            _from: i64,
            _to: i64,
        ) -> Result<CandleWindow, HeatmapError> {
            let closes = if symbol == "AAPL" {
                vec![100.0, 102.0]
            } else {
                vec![100.0, 99.0]
            };
            Ok(CandleWindow {
                status: "ok".to_string(),
                closes,
            })
        }
    }

    #[tokio::test]
    async fn healthy_index_produces_stats_and_image() {
        let output = build_report(&TinyIndex).await.unwrap();

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.stats.gainers, 1);
        assert_eq!(output.stats.losers, 1);
        assert_eq!(output.stats.best_performer.symbol, "AAPL");
        assert!(output.image.contains("<svg"));
        assert!(output.image.contains("AAPL"));
    }
}
