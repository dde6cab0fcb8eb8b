use crate::types::StockRecord;

/// Aggregate metrics for one run. Derived, read-only, never persisted.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub average_return: f64,
    pub gainers: usize,
    pub losers: usize,
    pub best_performer: StockRecord,
    pub worst_performer: StockRecord,
}

/// Reduce a record list into its run statistics. Returns `None` for an
/// empty input. Zero-return records count toward neither gainers nor
/// losers. Best/worst use first-occurrence-wins tie-breaking: the scan is
/// in input order and only a strictly better return replaces the holder.
pub fn summarize(records: &[StockRecord]) -> Option<RunStatistics> {
    let first = records.first()?;

    let mut sum = 0.0;
    let mut gainers = 0;
    let mut losers = 0;
    let mut best = first;
    let mut worst = first;

    for record in records {
        sum += record.daily_return;
        if record.daily_return > 0.0 {
            gainers += 1;
        } else if record.daily_return < 0.0 {
            losers += 1;
        }
        if record.daily_return > best.daily_return {
            best = record;
        }
        if record.daily_return < worst.daily_return {
            worst = record;
        }
    }

    Some(RunStatistics {
        average_return: sum / records.len() as f64,
        gainers,
        losers,
        best_performer: best.clone(),
        worst_performer: worst.clone(),
    })
}
