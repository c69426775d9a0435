// Grouping and summation. Every dimension goes through the same
// `aggregate` function; only the field selector changes.
use crate::types::{AggregateBucket, NormalizedRow};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Descending by summed amount; ties keep first-seen order.
    Amount,
    /// Descending by label, i.e. most recent first for `YYYY-MM` keys.
    Key,
}

/// The standard grouping dimensions of a normalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Client,
    Item,
    Rep,
    Region,
    Category,
    Month,
    Week,
}

impl GroupKey {
    pub fn select(self, row: &NormalizedRow) -> &str {
        match self {
            GroupKey::Client => &row.client,
            GroupKey::Item => &row.item,
            GroupKey::Rep => &row.rep,
            GroupKey::Region => &row.region,
            GroupKey::Category => &row.category,
            GroupKey::Month => &row.month_key,
            GroupKey::Week => &row.week_key,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKey::Client => "顧客",
            GroupKey::Item => "商品",
            GroupKey::Rep => "担当者",
            GroupKey::Region => "地域",
            GroupKey::Category => "カテゴリ",
            GroupKey::Month => "月",
            GroupKey::Week => "週",
        }
    }
}

/// Group `rows` by the value `key` selects and sum each group.
///
/// Grouping is exact equality on the selected string. When `with_flags` is
/// set each bucket also counts its design and planning rows.
pub fn aggregate<F>(
    rows: &[NormalizedRow],
    key: F,
    sort: SortMode,
    with_flags: bool,
) -> Vec<AggregateBucket>
where
    F: Fn(&NormalizedRow) -> &str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<AggregateBucket> = Vec::new();

    for row in rows {
        let label = key(row);
        let slot = *index.entry(label).or_insert_with(|| {
            buckets.push(AggregateBucket::new(label, with_flags));
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.amount += row.amount;
        bucket.quantity += row.quantity;
        bucket.order_count += 1;
        if let Some(flags) = bucket.flags.as_mut() {
            flags.design += usize::from(row.design);
            flags.planning += usize::from(row.planning);
        }
    }

    // `sort_by` is stable, so equal amounts stay in first-seen order.
    match sort {
        SortMode::Amount => buckets.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
        }),
        SortMode::Key => buckets.sort_by(|a, b| b.label.cmp(&a.label)),
    }
    buckets
}

pub fn aggregate_by(
    rows: &[NormalizedRow],
    key: GroupKey,
    sort: SortMode,
    with_flags: bool,
) -> Vec<AggregateBucket> {
    aggregate(rows, |row| key.select(row), sort, with_flags)
}

/// The bucket lists the dashboard renders and the insight rules read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub by_client: Vec<AggregateBucket>,
    pub by_item: Vec<AggregateBucket>,
    pub by_rep: Vec<AggregateBucket>,
    pub by_region: Vec<AggregateBucket>,
    pub by_category: Vec<AggregateBucket>,
    pub by_month: Vec<AggregateBucket>,
    pub by_week: Vec<AggregateBucket>,
}

impl Aggregates {
    /// Independent passes over the same rows, one per dimension.
    pub fn build(rows: &[NormalizedRow]) -> Self {
        Self {
            by_client: aggregate_by(rows, GroupKey::Client, SortMode::Amount, true),
            by_item: aggregate_by(rows, GroupKey::Item, SortMode::Amount, false),
            by_rep: aggregate_by(rows, GroupKey::Rep, SortMode::Amount, false),
            by_region: aggregate_by(rows, GroupKey::Region, SortMode::Amount, false),
            by_category: aggregate_by(rows, GroupKey::Category, SortMode::Amount, false),
            by_month: aggregate_by(rows, GroupKey::Month, SortMode::Key, false),
            by_week: aggregate_by(rows, GroupKey::Week, SortMode::Key, false),
        }
    }

    pub fn get(&self, key: GroupKey) -> &[AggregateBucket] {
        match key {
            GroupKey::Client => &self.by_client,
            GroupKey::Item => &self.by_item,
            GroupKey::Rep => &self.by_rep,
            GroupKey::Region => &self.by_region,
            GroupKey::Category => &self.by_category,
            GroupKey::Month => &self.by_month,
            GroupKey::Week => &self.by_week,
        }
    }

    pub fn total_amount(&self) -> f64 {
        self.by_client.iter().map(|b| b.amount).sum()
    }
}
