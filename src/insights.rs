// Rule-based insight generation. Each rule looks at the ranked aggregates
// and may contribute one templated insight; rules never see each other's
// output, and the order of `RULES` is the order of the result.
use crate::aggregate::{Aggregates, GroupKey};
use crate::config::EngineConfig;
use crate::format::{format_currency, format_percent, PLACEHOLDER};
use crate::normalize::UNKNOWN;
use crate::rank::{share, top_n, trend, Direction};
use crate::types::{AggregateBucket, FlagCounts, Insight};

type Rule = fn(&Aggregates, &EngineConfig) -> Option<Insight>;

const RULES: [Rule; 6] = [
    concentration,
    low_touch_client,
    zero_design,
    zero_planning,
    performer_gap,
    period_trend,
];

pub const INSUFFICIENT_DATA_TITLE: &str = "データが不足しています";

/// Run every rule over `aggregates`. An empty dataset yields exactly one
/// insight explaining which columns are needed.
pub fn build_insights(aggregates: &Aggregates, config: &EngineConfig) -> Vec<Insight> {
    let mut insights: Vec<Insight> = RULES
        .iter()
        .filter_map(|rule| rule(aggregates, config))
        .collect();
    if insights.is_empty() {
        insights.push(insufficient_data());
    }
    insights
}

pub fn insufficient_data() -> Insight {
    Insight::new(
        INSUFFICIENT_DATA_TITLE,
        "売上請求日（または日付）と金額の列を含むファイルを読み込むと、分析結果が表示されます。",
    )
}

/// Clients, unless the sheet has no client column at all; then items.
fn primary_dimension(aggregates: &Aggregates) -> GroupKey {
    match aggregates.by_client.as_slice() {
        [only] if only.label == UNKNOWN => GroupKey::Item,
        _ => GroupKey::Client,
    }
}

/// Client buckets for the client rules; none when the sheet has no client
/// column. A `不明` bucket among named clients is still a client.
fn clients(aggregates: &Aggregates) -> &[AggregateBucket] {
    match primary_dimension(aggregates) {
        GroupKey::Client => &aggregates.by_client,
        _ => &[],
    }
}

fn concentration(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    let key = primary_dimension(aggregates);
    let top = aggregates.get(key).first()?;
    let pct = share(top.amount, aggregates.total_amount()).map_or_else(
        || PLACEHOLDER.to_string(),
        format_percent,
    );
    Some(Insight::new(
        format!("売上トップ{}: {}", key.label(), top.label),
        format!(
            "{}が売上全体の{}（{}）を占めています。関係を強化しつつ、特定先への依存が高まりすぎないよう注意しましょう。",
            top.label,
            pct,
            format_currency(top.amount, &config.currency_symbol),
        ),
    ))
}

fn low_touch_client(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    let client = clients(aggregates)
        .iter()
        .find(|b| b.order_count == 1 && b.amount > 0.0)?;
    Some(Insight::new(
        format!("単発取引の顧客: {}", client.label),
        format!(
            "{}との取引は1件のみ（{}）です。フォローアップで継続受注につなげましょう。",
            client.label,
            format_currency(client.amount, &config.currency_symbol),
        ),
    ))
}

fn zero_flag(
    aggregates: &Aggregates,
    config: &EngineConfig,
    count: fn(&FlagCounts) -> usize,
    theme: &str,
) -> Option<Insight> {
    let client = top_n(clients(aggregates), config.top_clients)
        .iter()
        .find(|b| b.flags.as_ref().is_some_and(|f| count(f) == 0))?;
    Some(Insight::new(
        format!("{}提案の余地: {}", theme, client.label),
        format!(
            "上位顧客の{}では{}を含む案件がありません（{}件中0件）。{}を組み合わせた提案を検討しましょう。",
            client.label, theme, client.order_count, theme,
        ),
    ))
}

fn zero_design(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    zero_flag(aggregates, config, |f| f.design, "デザイン")
}

fn zero_planning(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    zero_flag(aggregates, config, |f| f.planning, "企画")
}

/// Best vs worst rep; regions stand in when the sheet has fewer than two reps.
fn performer_gap(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    let key = [GroupKey::Rep, GroupKey::Region]
        .into_iter()
        .find(|key| aggregates.get(*key).len() >= 2)?;
    let buckets = aggregates.get(key);
    let (best, worst) = (buckets.first()?, buckets.last()?);
    let symbol = &config.currency_symbol;
    Some(Insight::new(
        format!("{}間の売上差", key.label()),
        format!(
            "トップの{}（{}）と最下位の{}（{}）の差は{}です。成功事例を共有して全体の底上げを図りましょう。",
            best.label,
            format_currency(best.amount, symbol),
            worst.label,
            format_currency(worst.amount, symbol),
            format_currency(best.amount - worst.amount, symbol),
        ),
    ))
}

/// Latest month against the one before; weeks when only one month exists.
fn period_trend(aggregates: &Aggregates, config: &EngineConfig) -> Option<Insight> {
    let t = trend(&aggregates.by_month).or_else(|| trend(&aggregates.by_week))?;
    let symbol = &config.currency_symbol;
    let title = match t.direction {
        Direction::Up => "売上は増加傾向です",
        Direction::Down => "売上は減少傾向です",
        Direction::Flat => "売上は横ばいです",
    };
    let delta = if t.delta > 0.0 {
        format!("+{}", format_currency(t.delta, symbol))
    } else {
        format_currency(t.delta, symbol)
    };
    let pct = t.change_pct.map_or_else(|| PLACEHOLDER.to_string(), format_percent);
    Some(Insight::new(
        title,
        format!(
            "{}の売上は{}で、{}（{}）から{}（{}）変化しました。",
            t.latest_label,
            format_currency(t.latest_amount, symbol),
            t.previous_label,
            format_currency(t.previous_amount, symbol),
            delta,
            pct,
        ),
    ))
}
