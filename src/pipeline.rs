use crate::aggregate::Aggregates;
use crate::config::EngineConfig;
use crate::insights::build_insights;
use crate::normalize::normalize_rows_with_marker;
use crate::rank::average_amount;
use crate::types::{Dataset, Insight, NormalizedRow, RawRow, Summary};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Everything the dashboard shows for one upload. Built in one synchronous
/// pass and replaced wholesale on the next load.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub dataset: Dataset,
    pub summary: Summary,
    pub aggregates: Aggregates,
    pub monthly_average: f64,
    pub weekly_average: f64,
    pub insights: Vec<Insight>,
}

impl Analysis {
    pub fn run(raws: &[RawRow], config: &EngineConfig) -> Self {
        Self::from_dataset(normalize_rows_with_marker(raws, config.flag_marker), config)
    }

    pub fn from_dataset(dataset: Dataset, config: &EngineConfig) -> Self {
        let summary = summarize(&dataset.rows);
        let aggregates = Aggregates::build(&dataset.rows);
        let insights = build_insights(&aggregates, config);
        info!(
            clients = aggregates.by_client.len(),
            months = aggregates.by_month.len(),
            insights = insights.len(),
            "analysis ready"
        );
        Self {
            monthly_average: average_amount(&aggregates.by_month),
            weekly_average: average_amount(&aggregates.by_week),
            dataset,
            summary,
            aggregates,
            insights,
        }
    }
}

pub fn summarize(rows: &[NormalizedRow]) -> Summary {
    let total_amount: f64 = rows.iter().map(|r| r.amount).sum();
    let total_quantity: f64 = rows.iter().map(|r| r.quantity).sum();
    let average_order_value = if rows.is_empty() {
        0.0
    } else {
        total_amount / rows.len() as f64
    };
    let clients: HashSet<&str> = rows.iter().map(|r| r.client.as_str()).collect();
    let items: HashSet<&str> = rows.iter().map(|r| r.item.as_str()).collect();
    Summary {
        total_amount,
        total_quantity,
        order_count: rows.len(),
        average_order_value,
        client_count: clients.len(),
        item_count: items.len(),
        first_date: rows.iter().filter_map(|r| r.date).min(),
        last_date: rows.iter().filter_map(|r| r.date).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_rows;
    use chrono::NaiveDate;

    #[test]
    fn summary_of_sample_sheet() {
        let analysis = Analysis::run(&sample_rows(), &EngineConfig::default());
        let summary = &analysis.summary;
        assert_eq!(summary.order_count, 12);
        assert_eq!(summary.client_count, 4);
        assert_eq!(summary.total_amount, 1_938_600.0);
        assert_eq!(summary.average_order_value, 161_550.0);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 4, 3));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 6, 27));
        // April 548,000 + May 657,600 + June 733,000 over three months.
        assert_eq!(analysis.monthly_average, 646_200.0);
    }

    #[test]
    fn flag_marker_comes_from_config() {
        let raws = vec![
            serde_json::json!({"日付": "2024-01-05", "顧客名": "Acme", "金額": 100, "デザイン": "x"})
                .as_object()
                .cloned()
                .unwrap(),
        ];
        let default = Analysis::run(&raws, &EngineConfig::default());
        assert!(!default.dataset.rows[0].design);
        let config = EngineConfig {
            flag_marker: 'x',
            ..Default::default()
        };
        let custom = Analysis::run(&raws, &config);
        assert!(custom.dataset.rows[0].design);
        assert_eq!(custom.aggregates.by_client[0].flags.map(|f| f.design), Some(1));
    }

    #[test]
    fn summary_of_nothing() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
