use sales_insight::insights::{insufficient_data, INSUFFICIENT_DATA_TITLE};
use sales_insight::normalize::UNKNOWN;
use sales_insight::rank::average_amount;
use sales_insight::sample::sample_rows;
use sales_insight::{
    aggregate_by, normalize_row, normalize_rows, Aggregates, Analysis, EngineConfig, GroupKey,
    RawRow, SortMode,
};
use serde_json::{json, Value};

fn rows(values: Value) -> Vec<RawRow> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn order_sheet() -> Vec<RawRow> {
    rows(json!([
        {"売上請求日": "2024-01-05", "顧客名": "Acme", "担当者": "佐藤", "金額": "¥100", "数量": 1, "デザイン": "○"},
        {"売上請求日": "2024-01-20", "顧客名": "Acme", "担当者": "佐藤", "金額": 50, "数量": 2},
        {"売上請求日": "2024-02-11", "顧客名": "Beta", "担当者": "鈴木", "金額": "30", "数量": "1"},
        {"売上請求日": "not a date", "顧客名": "Ghost", "金額": 999},
        {"Billing": "2024/02/28", "Client": "Gamma", "Rep": "鈴木", "Amount": "abc"}
    ]))
}

const KEYS: [GroupKey; 7] = [
    GroupKey::Client,
    GroupKey::Item,
    GroupKey::Rep,
    GroupKey::Region,
    GroupKey::Category,
    GroupKey::Month,
    GroupKey::Week,
];

#[test]
fn groups_orders_by_client() {
    let dataset = normalize_rows(&rows(json!([
        {"date": "2024-01-01", "client": "Acme", "amount": 100, "qty": 1},
        {"date": "2024-01-02", "client": "Acme", "amount": 50, "qty": 2},
        {"date": "2024-01-03", "client": "Beta", "amount": 30, "qty": 1}
    ])));
    let buckets = aggregate_by(&dataset.rows, GroupKey::Client, SortMode::Amount, false);
    let summary: Vec<_> = buckets
        .iter()
        .map(|b| (b.label.as_str(), b.amount, b.quantity, b.order_count))
        .collect();
    assert_eq!(summary, vec![("Acme", 150.0, 3.0, 2), ("Beta", 30.0, 1.0, 1)]);
}

#[test]
fn bad_dates_are_dropped_bad_amounts_are_zero() {
    let dataset = normalize_rows(&order_sheet());
    assert_eq!(dataset.total_rows, 5);
    assert_eq!(dataset.dropped_rows, 1);
    let gamma = dataset.rows.iter().find(|r| r.client == "Gamma").unwrap();
    assert_eq!(gamma.amount, 0.0);
    assert!(dataset.rows.iter().all(|r| r.client != "Ghost"));
}

#[test]
fn month_key_matches_date() {
    for raw in sample_rows().iter().chain(order_sheet().iter()) {
        if let Some(row) = normalize_row(raw) {
            let date = row.date.unwrap();
            assert_eq!(row.month_key, date.format("%Y-%m").to_string());
        }
    }
}

#[test]
fn amounts_are_conserved_for_every_key() {
    let dataset = normalize_rows(&sample_rows());
    let total: f64 = dataset.rows.iter().map(|r| r.amount).sum();
    for key in KEYS {
        for sort in [SortMode::Amount, SortMode::Key] {
            let buckets = aggregate_by(&dataset.rows, key, sort, true);
            let bucket_total: f64 = buckets.iter().map(|b| b.amount).sum();
            assert!((bucket_total - total).abs() < 1e-6, "{key:?} {sort:?}");
            let orders: usize = buckets.iter().map(|b| b.order_count).sum();
            assert_eq!(orders, dataset.rows.len());
        }
    }
}

#[test]
fn sort_orders_hold() {
    let dataset = normalize_rows(&sample_rows());
    for key in KEYS {
        let by_amount = aggregate_by(&dataset.rows, key, SortMode::Amount, false);
        assert!(by_amount.windows(2).all(|w| w[0].amount >= w[1].amount));
        let by_key = aggregate_by(&dataset.rows, key, SortMode::Key, false);
        assert!(by_key.windows(2).all(|w| w[0].label >= w[1].label));
    }
}

#[test]
fn pipeline_is_idempotent() {
    let config = EngineConfig::default();
    let first = Analysis::run(&sample_rows(), &config);
    let second = Analysis::run(&sample_rows(), &config);
    assert_eq!(first.aggregates, second.aggregates);
    assert_eq!(first.insights, second.insights);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn empty_input_is_well_defined() {
    let analysis = Analysis::run(&[], &EngineConfig::default());
    assert_eq!(analysis.aggregates, Aggregates::default());
    assert_eq!(analysis.monthly_average, 0.0);
    assert_eq!(average_amount(&analysis.aggregates.by_week), 0.0);
    assert_eq!(analysis.summary.average_order_value, 0.0);
    assert_eq!(analysis.insights, vec![insufficient_data()]);
}

#[test]
fn all_rows_dropped_gives_fallback() {
    let analysis = Analysis::run(
        &rows(json!([{"金額": 100}, {"日付": "yesterday"}])),
        &EngineConfig::default(),
    );
    assert_eq!(analysis.dataset.dropped_rows, 2);
    assert_eq!(analysis.insights.len(), 1);
    assert_eq!(analysis.insights[0].title, INSUFFICIENT_DATA_TITLE);
}

#[test]
fn sample_sheet_insights() {
    let analysis = Analysis::run(&sample_rows(), &EngineConfig::default());
    let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "売上トップ顧客: みどり製菓",
            "単発取引の顧客: さくら不動産",
            "デザイン提案の余地: 北斗工業",
            "企画提案の余地: 北斗工業",
            "担当者間の売上差",
            "売上は増加傾向です",
        ]
    );
    assert!(titles.iter().all(|t| !t.contains(UNKNOWN)));
    assert!(analysis.insights[0].detail.contains("¥884,000"));
}

#[test]
fn product_sheet_without_clients_ranks_items() {
    let analysis = Analysis::run(
        &rows(json!([
            {"取引日": "2024-03-01", "商品名": "Widget", "カテゴリ": "A", "地域": "東京", "売上": "1,000"},
            {"取引日": "2024-03-09", "商品名": "Gadget", "カテゴリ": "B", "地域": "大阪", "売上": "400"},
            {"取引日": "2024-03-15", "商品名": "Widget", "カテゴリ": "A", "地域": "東京", "売上": "600"}
        ])),
        &EngineConfig::default(),
    );
    let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["売上トップ商品: Widget", "地域間の売上差", "売上は増加傾向です"]
    );
    assert_eq!(analysis.aggregates.by_week[0].label, "週3");
}

#[test]
fn rows_without_a_client_count_as_one_client() {
    let analysis = Analysis::run(
        &rows(json!([
            {"日付": "2024-01-05", "金額": 900},
            {"日付": "2024-01-05", "顧客名": "Acme", "金額": 500, "デザイン": "○"},
            {"日付": "2024-01-05", "顧客名": "Acme", "金額": 100, "デザイン": "○"},
            {"日付": "2024-01-05", "顧客名": "Beta", "金額": 50, "デザイン": "○"}
        ])),
        &EngineConfig::default(),
    );
    let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "売上トップ顧客: 不明",
            "単発取引の顧客: 不明",
            "デザイン提案の余地: 不明",
            "企画提案の余地: 不明",
        ]
    );
}
