// =============================================================================
// Ranker — greedy two-tier top-N selection
// =============================================================================
//
// 1. Sort every record by (day_change, momentum) descending, symbol ascending
//    on full ties.
// 2. Primary tier:  day_change > 0 AND momentum > 0.005, in sorted order.
// 3. Backfill tier: day_change > 0 alone, same order, skipping selected ones.
// 4. Truncate to n.
//
// A record with day_change <= 0 is never selected, so "no winners today" is a
// valid, empty result.
// =============================================================================

use std::cmp::Ordering;

use serde::Serialize;

use crate::analytics::SymbolAnalytics;

/// Default number of top picks.
pub const DEFAULT_TOP_N: usize = 3;

/// Minimum momentum for the primary tier.
const PRIMARY_MIN_MOMENTUM: f64 = 0.005;

/// Which selection tier admitted a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickTier {
    Primary,
    Backfill,
}

/// One entry of a ranking, carrying its symbol explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPick<'a> {
    /// 1-based position.
    pub rank: usize,
    pub symbol: &'a str,
    pub tier: PickTier,
    pub analytics: &'a SymbolAnalytics,
}

/// One row of an ordered table (trending, up-and-coming).
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow<'a> {
    pub rank: usize,
    pub symbol: &'a str,
    pub analytics: &'a SymbolAnalytics,
}

/// Select up to `n` top picks from `records`.
pub fn top_picks<'a, I>(records: I, n: usize) -> Vec<RankedPick<'a>>
where
    I: IntoIterator<Item = &'a SymbolAnalytics>,
{
    let mut sorted: Vec<&SymbolAnalytics> = records.into_iter().collect();
    sorted.sort_by(|a, b| by_change_then_momentum(a, b));

    let mut selected: Vec<(&SymbolAnalytics, PickTier)> = sorted
        .iter()
        .copied()
        .filter(|r| r.day_change > 0.0 && r.momentum > PRIMARY_MIN_MOMENTUM)
        .take(n)
        .map(|r| (r, PickTier::Primary))
        .collect();

    if selected.len() < n {
        let missing = n - selected.len();
        let backfill: Vec<&SymbolAnalytics> = sorted
            .iter()
            .copied()
            .filter(|r| r.day_change > 0.0)
            .filter(|r| !selected.iter().any(|(s, _)| s.symbol == r.symbol))
            .take(missing)
            .collect();
        selected.extend(backfill.into_iter().map(|r| (r, PickTier::Backfill)));
    }

    selected.truncate(n);
    selected
        .into_iter()
        .enumerate()
        .map(|(i, (record, tier))| RankedPick {
            rank: i + 1,
            symbol: &record.symbol,
            tier,
            analytics: record,
        })
        .collect()
}

/// Order `records` by day change descending and keep the first `limit`.
pub fn rank_by_change<'a, I>(records: I, limit: usize) -> Vec<RankedRow<'a>>
where
    I: IntoIterator<Item = &'a SymbolAnalytics>,
{
    rank_rows(records, limit, |a, b| {
        b.day_change
            .total_cmp(&a.day_change)
            .then_with(|| a.symbol.cmp(&b.symbol))
    })
}

/// Order `records` by absolute momentum descending and keep the first
/// `limit`.  Strong moves in either direction rank high.
pub fn rank_by_momentum_magnitude<'a, I>(records: I, limit: usize) -> Vec<RankedRow<'a>>
where
    I: IntoIterator<Item = &'a SymbolAnalytics>,
{
    rank_rows(records, limit, |a, b| {
        b.momentum
            .abs()
            .total_cmp(&a.momentum.abs())
            .then_with(|| a.symbol.cmp(&b.symbol))
    })
}

fn rank_rows<'a, I, F>(records: I, limit: usize, cmp: F) -> Vec<RankedRow<'a>>
where
    I: IntoIterator<Item = &'a SymbolAnalytics>,
    F: Fn(&SymbolAnalytics, &SymbolAnalytics) -> Ordering,
{
    let mut sorted: Vec<&SymbolAnalytics> = records.into_iter().collect();
    sorted.sort_by(|a, b| cmp(a, b));
    sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, record)| RankedRow {
            rank: i + 1,
            symbol: &record.symbol,
            analytics: record,
        })
        .collect()
}

fn by_change_then_momentum(a: &SymbolAnalytics, b: &SymbolAnalytics) -> Ordering {
    b.day_change
        .total_cmp(&a.day_change)
        .then_with(|| b.momentum.total_cmp(&a.momentum))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

// =============================================================================
// Tests
// =============================================================================
