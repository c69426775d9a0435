// Presentation of an `Analysis`: console tables, per-dimension CSV exports
// and a full JSON dump.
use crate::aggregate::GroupKey;
use crate::config::EngineConfig;
use crate::error::InsightError;
use crate::format::{format_currency, format_quantity};
use crate::pipeline::Analysis;
use crate::rank::top_n;
use crate::types::AggregateBucket;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const EXPORTED: [(GroupKey, &str); 7] = [
    (GroupKey::Client, "sales_by_client.csv"),
    (GroupKey::Item, "sales_by_item.csv"),
    (GroupKey::Rep, "sales_by_rep.csv"),
    (GroupKey::Region, "sales_by_region.csv"),
    (GroupKey::Category, "sales_by_category.csv"),
    (GroupKey::Month, "sales_by_month.csv"),
    (GroupKey::Week, "sales_by_week.csv"),
];

pub fn print_analysis(analysis: &Analysis, config: &EngineConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_analysis(&mut out, analysis, config)?;
    out.flush()
}

pub fn write_analysis<W: Write>(
    out: &mut W,
    analysis: &Analysis,
    config: &EngineConfig,
) -> io::Result<()> {
    let symbol = &config.currency_symbol;
    let summary = &analysis.summary;
    let dataset = &analysis.dataset;

    writeln!(out, "Sales Insight Report")?;
    writeln!(
        out,
        "({} rows loaded, {} kept, {} dropped without a valid date)",
        dataset.total_rows,
        dataset.rows.len(),
        dataset.dropped_rows
    )?;
    writeln!(out)?;
    writeln!(out, "Total sales:         {}", format_currency(summary.total_amount, symbol))?;
    writeln!(out, "Orders:              {}", summary.order_count)?;
    writeln!(out, "Units:               {}", format_quantity(summary.total_quantity))?;
    writeln!(
        out,
        "Average order value: {}",
        format_currency(summary.average_order_value, symbol)
    )?;
    writeln!(
        out,
        "Monthly average:     {}",
        format_currency(analysis.monthly_average, symbol)
    )?;
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        writeln!(out, "Period:              {first} - {last}")?;
    }
    writeln!(out)?;

    let aggregates = &analysis.aggregates;
    write_table(out, "Top clients", top_n(&aggregates.by_client, config.top_clients), symbol)?;
    write_table(out, "Top items", top_n(&aggregates.by_item, config.top_items), symbol)?;
    write_table(out, "Sales by rep", &aggregates.by_rep, symbol)?;
    write_table(out, "Recent months", top_n(&aggregates.by_month, config.top_periods), symbol)?;
    write_table(out, "Recent weeks", top_n(&aggregates.by_week, config.top_periods), symbol)?;

    writeln!(out, "Insights")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for insight in &analysis.insights {
        writeln!(out, "* {}", insight.title)?;
        writeln!(out, "  {}", insight.detail)?;
    }
    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    title: &str,
    buckets: &[AggregateBucket],
    symbol: &str,
) -> io::Result<()> {
    if buckets.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    writeln!(
        out,
        "| {:<24} | {:>15} | {:>10} | {:>8} |",
        "Label", "Amount", "Quantity", "Orders"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for b in buckets {
        writeln!(
            out,
            "| {:<24} | {:>15} | {:>10} | {:>8} |",
            b.label,
            format_currency(b.amount, symbol),
            format_quantity(b.quantity),
            b.order_count
        )?;
    }
    writeln!(out)
}

/// Write one CSV per grouping dimension into `dir` and return the paths.
pub fn export_csv(dir: &Path, analysis: &Analysis) -> Result<Vec<PathBuf>, InsightError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(EXPORTED.len());
    for (key, file_name) in EXPORTED {
        let path = dir.join(file_name);
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(["Label", "Amount", "Quantity", "Orders", "Design", "Planning"])?;
        for b in analysis.aggregates.get(key) {
            let (design, planning) = match b.flags {
                Some(f) => (f.design.to_string(), f.planning.to_string()),
                None => (String::new(), String::new()),
            };
            wtr.write_record(&[
                b.label.clone(),
                format!("{:.2}", b.amount),
                format!("{:.2}", b.quantity),
                b.order_count.to_string(),
                design,
                planning,
            ])?;
        }
        wtr.flush()?;
        written.push(path);
    }
    info!(files = written.len(), dir = %dir.display(), "exported CSV tables");
    Ok(written)
}

pub fn export_json(path: &Path, analysis: &Analysis) -> Result<(), InsightError> {
    let mut writer = io::BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, analysis)?;
    writer.flush()?;
    info!(path = %path.display(), "exported JSON analysis");
    Ok(())
}
