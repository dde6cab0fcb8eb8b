use chrono::Utc;
use heatmap_core::{HeatmapError, MarketData, StockRecord};
use std::time::Duration;

/// Symbols fetched per batch, chosen well under Finnhub's 60-calls/minute
/// free-tier budget (two calls per symbol per batch).
pub const BATCH_SIZE: usize = 30;

/// Pause between batches; together with BATCH_SIZE this keeps the request
/// rate inside the provider ceiling.
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Candle lookback covering the two most recent daily closes.
const CANDLE_WINDOW_SECS: i64 = 2 * 24 * 60 * 60;

/// Fetch daily-return records for `symbols`, batch by batch. Within a
/// batch every symbol's two calls run concurrently and the whole batch
/// settles before the next one starts; batches are separated by a fixed
/// pause. Per-symbol failures drop that symbol only. Fails with
/// `NoDataAvailable` when nothing usable came back at all.
pub async fn collect_records<M: MarketData>(
    market: &M,
    symbols: &[String],
) -> Result<Vec<StockRecord>, HeatmapError> {
    let mut records = Vec::with_capacity(symbols.len());

    for (batch_index, batch) in symbols.chunks(BATCH_SIZE).enumerate() {
        let fetched =
            futures::future::join_all(batch.iter().map(|s| fetch_record(market, s))).await;
        records.extend(fetched.into_iter().flatten());

        let processed = (batch_index + 1) * BATCH_SIZE;
        if processed < symbols.len() {
            tracing::debug!(
                "Batch {} done ({} records so far), pausing {:?}",
                batch_index + 1,
                records.len(),
                BATCH_PAUSE
            );
            tokio::time::sleep(BATCH_PAUSE).await;
        }
    }

    if records.is_empty() {
        return Err(HeatmapError::NoDataAvailable);
    }

    Ok(records)
}

/// One symbol's quote and candle window, issued concurrently. Returns
/// `None` for anything unusable: fetch errors, a zero quote price, a
/// candle status other than "ok", fewer than two closes, or a zero prior
/// close. None of these abort the batch.
async fn fetch_record<M: MarketData>(market: &M, symbol: &str) -> Option<StockRecord> {
    let to = Utc::now().timestamp();
    let from = to - CANDLE_WINDOW_SECS;

    let (quote, candles) = tokio::join!(
        market.quote(symbol),
        market.daily_candles(symbol, from, to)
    );

    let quote = match quote {
        Ok(q) => q,
        Err(e) => {
            tracing::warn!("Dropping {}: quote fetch failed: {}", symbol, e);
            return None;
        }
    };
    let candles = match candles {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Dropping {}: candle fetch failed: {}", symbol, e);
            return None;
        }
    };

    if quote.current == 0.0 || !candles.has_data() {
        tracing::debug!("Dropping {}: no usable quote or candle data", symbol);
        return None;
    }

    if candles.closes.len() < 2 {
        tracing::debug!("Dropping {}: fewer than two daily closes", symbol);
        return None;
    }

    let prev_close = candles.closes[candles.closes.len() - 2];
    let last_close = candles.closes[candles.closes.len() - 1];
    if prev_close == 0.0 {
        tracing::debug!("Dropping {}: zero prior close", symbol);
        return None;
    }

    let daily_return = (last_close - prev_close) / prev_close * 100.0;

    Some(StockRecord {
        symbol: symbol.to_string(),
        daily_return,
        price: quote.current,
        // Prefer the provider's own percent change; fall back to derived.
        change: quote.percent_change.unwrap_or(daily_return),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use heatmap_core::{CandleWindow, Quote};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted market data source: per-symbol behaviors, call counting.
    #[derive(Default)]
    struct MockMarket {
        quotes: HashMap<String, Quote>,
        candles: HashMap<String, CandleWindow>,
        quote_calls: AtomicUsize,
        candle_calls: AtomicUsize,
    }

    impl MockMarket {
        fn with_uniform(symbols: &[String], prev: f64, last: f64) -> Self {
            let mut mock = Self::default();
            for s in symbols {
                mock.quotes.insert(
                    s.clone(),
                    Quote {
                        current: last,
                        percent_change: None,
                    },
                );
                mock.candles.insert(
                    s.clone(),
                    CandleWindow {
                        status: "ok".to_string(),
                        closes: vec![prev, last],
                    },
                );
            }
            mock
        }
    }

    #[async_trait]
    impl MarketData for MockMarket {
        async fn index_constituents(&self, _index: &str) -> Result<Vec<String>, HeatmapError> {
            Ok(self.quotes.keys().cloned().collect())
        }

        async fn quote(&self, symbol: &str) -> Result<Quote, HeatmapError> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            self.quotes
                .get(symbol)
                .cloned()
                .ok_or_else(|| HeatmapError::ApiError(format!("no quote for {symbol}")))
        }

        async fn daily_candles(
            &self,
            symbol: &str,
            _from: i64,
            _to: i64,
        ) -> Result<CandleWindow, HeatmapError> {
            self.candle_calls.fetch_add(1, Ordering::SeqCst);
            self.candles
                .get(symbol)
                .cloned()
                .ok_or_else(|| HeatmapError::ApiError(format!("no candles for {symbol}")))
        }
    }

    fn symbols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("SYM{i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn sixty_five_symbols_make_three_batches_and_two_pauses() {
        let syms = symbols(65);
        let mock = MockMarket::with_uniform(&syms, 100.0, 102.0);

        let started = tokio::time::Instant::now();
        let records = collect_records(&mock, &syms).await.unwrap();

        // All 65 fetched, two calls each.
        assert_eq!(records.len(), 65);
        assert_eq!(mock.quote_calls.load(Ordering::SeqCst), 65);
        assert_eq!(mock.candle_calls.load(Ordering::SeqCst), 65);

        // Exactly two inter-batch pauses of 1s under paused time.
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn exact_multiple_of_batch_size_pauses_once_less() {
        let syms = symbols(60);
        let mock = MockMarket::with_uniform(&syms, 100.0, 101.0);

        let started = tokio::time::Instant::now();
        collect_records(&mock, &syms).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn unusable_symbols_are_dropped_without_aborting() {
        let syms: Vec<String> = ["GOOD", "ZEROPX", "NODATA", "ONECLOSE", "ZEROPREV", "MISSING"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut mock = MockMarket::with_uniform(&syms, 200.0, 205.0);

        // Zero quote price
        mock.quotes.get_mut("ZEROPX").unwrap().current = 0.0;
        // Candle status says no data
        mock.candles.get_mut("NODATA").unwrap().status = "no_data".to_string();
        // Only one close in the window
        mock.candles.get_mut("ONECLOSE").unwrap().closes = vec![205.0];
        // Division guard
        mock.candles.get_mut("ZEROPREV").unwrap().closes = vec![0.0, 205.0];
        // Fetch error path
        mock.quotes.remove("MISSING");

        let records = collect_records(&mock, &syms).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "GOOD");
    }

    #[tokio::test]
    async fn derives_return_and_prefers_provider_change() {
        let syms = vec!["AAPL".to_string(), "MSFT".to_string()];
        let mut mock = MockMarket::with_uniform(&syms, 100.0, 102.5);
        mock.quotes.get_mut("AAPL").unwrap().percent_change = Some(2.61);

        let records = collect_records(&mock, &syms).await.unwrap();
        let aapl = records.iter().find(|r| r.symbol == "AAPL").unwrap();
        let msft = records.iter().find(|r| r.symbol == "MSFT").unwrap();

        assert!((aapl.daily_return - 2.5).abs() < 1e-9);
        // Provider field wins when present
        assert!((aapl.change - 2.61).abs() < 1e-9);
        // Derived value is the fallback
        assert!((msft.change - 2.5).abs() < 1e-9);
        assert!((msft.price - 102.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn preserves_batch_then_symbol_order() {
        let syms = symbols(35);
        let mock = MockMarket::with_uniform(&syms, 50.0, 51.0);

        let records = collect_records(&mock, &syms).await.unwrap();
        let got: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        let want: Vec<String> = syms.clone();
        assert_eq!(got, want.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn all_symbols_unusable_is_a_run_failure() {
        let syms = symbols(3);
        let mut mock = MockMarket::with_uniform(&syms, 100.0, 101.0);
        for s in &syms {
            mock.quotes.get_mut(s).unwrap().current = 0.0;
        }

        let err = collect_records(&mock, &syms).await.unwrap_err();
        assert!(matches!(err, HeatmapError::NoDataAvailable));
    }
}
