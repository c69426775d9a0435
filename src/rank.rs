use crate::types::AggregateBucket;

/// The first `n` buckets of an already sorted list.
pub fn top_n(buckets: &[AggregateBucket], n: usize) -> &[AggregateBucket] {
    &buckets[..n.min(buckets.len())]
}

/// Mean bucket amount; `0.0` when there are no buckets.
pub fn average_amount(buckets: &[AggregateBucket]) -> f64 {
    if buckets.is_empty() {
        return 0.0;
    }
    buckets.iter().map(|b| b.amount).sum::<f64>() / buckets.len() as f64
}

/// Percentage of `total` that `amount` represents, `None` when undefined.
pub fn share(amount: f64, total: f64) -> Option<f64> {
    let pct = amount / total * 100.0;
    pct.is_finite().then_some(pct)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub latest_label: String,
    pub latest_amount: f64,
    pub previous_label: String,
    pub previous_amount: f64,
    pub delta: f64,
    pub direction: Direction,
    /// `None` when the previous period had no sales.
    pub change_pct: Option<f64>,
}

/// Compare the two most recent periods of a key-sorted bucket list.
pub fn trend(buckets: &[AggregateBucket]) -> Option<Trend> {
    let [latest, previous, ..] = buckets else {
        return None;
    };
    let delta = latest.amount - previous.amount;
    let direction = if delta > 0.0 {
        Direction::Up
    } else if delta < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    };
    let change_pct = if previous.amount == 0.0 {
        None
    } else {
        share(delta, previous.amount.abs())
    };
    Some(Trend {
        latest_label: latest.label.clone(),
        latest_amount: latest.amount,
        previous_label: previous.label.clone(),
        previous_amount: previous.amount,
        delta,
        direction,
        change_pct,
    })
}
