use chrono::{DateTime, Utc};
use heatmap_core::RunStatistics;

/// Caption sent alongside the heatmap image. Partial failures show up
/// only as a smaller processed count here, by design.
pub fn format_summary(stats: &RunStatistics, total: usize, generated_at: DateTime<Utc>) -> String {
    format!(
        "Nasdaq-100 Daily Heatmap\n\
         {}\n\
         Average return: {:+.2}%\n\
         Gainers: {} | Losers: {}\n\
         Best: {} ({:+.2}%)\n\
         Worst: {} ({:+.2}%)\n\
         Symbols processed: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        stats.average_return,
        stats.gainers,
        stats.losers,
        stats.best_performer.symbol,
        stats.best_performer.daily_return,
        stats.worst_performer.symbol,
        stats.worst_performer.daily_return,
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use heatmap_core::StockRecord;

    fn record(symbol: &str, daily_return: f64) -> StockRecord {
        StockRecord {
            symbol: symbol.to_string(),
            daily_return,
            price: 100.0,
            change: daily_return,
        }
    }

    #[test]
    fn summary_carries_every_field() {
        let stats = RunStatistics {
            average_return: 0.5,
            gainers: 1,
            losers: 1,
            best_performer: record("AAPL", 2.5),
            worst_performer: record("MSFT", -1.0),
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 20, 5, 0).unwrap();

        let summary = format_summary(&stats, 3, at);
        assert!(summary.contains("2024-03-15 20:05 UTC"));
        assert!(summary.contains("Average return: +0.50%"));
        assert!(summary.contains("Gainers: 1 | Losers: 1"));
        assert!(summary.contains("Best: AAPL (+2.50%)"));
        assert!(summary.contains("Worst: MSFT (-1.00%)"));
        assert!(summary.contains("Symbols processed: 3"));
    }
}
