use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use sales_insight::{loader, report, sample, Analysis, EngineConfig};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

// The current upload's analysis. Each load replaces it wholesale.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    analysis: Option<Analysis>,
}

#[derive(Parser)]
#[command(
    name = "sales_insight",
    version,
    about = "Aggregate a sales spreadsheet and derive insights"
)]
struct Cli {
    /// CSV, TSV or JSON file to analyze. Without --file or --sample the
    /// interactive menu starts.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Analyze the built-in sample sheet
    #[arg(long, conflicts_with = "file")]
    sample: bool,
    /// Write one CSV per grouping dimension into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Write the full analysis as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Currency symbol used in the report
    #[arg(long, default_value = "¥")]
    currency: String,
    #[arg(long, default_value_t = 5)]
    top_clients: usize,
    #[arg(long, default_value_t = 3)]
    top_items: usize,
    /// Number of recent months/weeks to show
    #[arg(long, default_value_t = 4)]
    top_periods: usize,
    /// Character marking a design/planning cell as included
    #[arg(long, default_value_t = sales_insight::normalize::FLAG_MARKER)]
    flag_marker: char,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            currency_symbol: self.currency.clone(),
            top_clients: self.top_clients,
            top_items: self.top_items,
            top_periods: self.top_periods,
            flag_marker: self.flag_marker,
        }
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.engine_config();

    let raws = match (&cli.file, cli.sample) {
        (Some(path), _) => Some(
            loader::load_path(path).with_context(|| format!("failed to load {}", path.display()))?,
        ),
        (None, true) => Some(sample::sample_rows()),
        (None, false) => None,
    };

    match raws {
        Some(raws) => {
            let analysis = Analysis::run(&raws, &config);
            report::print_analysis(&analysis, &config)?;
            export(&cli, &analysis)
        }
        None => run_menu(&config),
    }
}

fn export(cli: &Cli, analysis: &Analysis) -> Result<()> {
    if let Some(dir) = &cli.export_dir {
        let files = report::export_csv(dir, analysis)
            .with_context(|| format!("failed to export CSV tables to {}", dir.display()))?;
        println!("Tables exported to {} ({} files)", dir.display(), files.len());
    }
    if let Some(path) = &cli.json {
        report::export_json(path, analysis)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Full analysis exported to {}", path.display());
    }
    Ok(())
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn run_menu(config: &EngineConfig) -> Result<()> {
    loop {
        println!("Sales Insight");
        println!("[1] Load a file");
        println!("[2] Load sample data");
        println!("[3] Generate report");
        println!("[4] Exit");
        let Some(choice) = prompt("Enter Choice: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => load_file(config)?,
            "2" => replace_analysis(Analysis::run(&sample::sample_rows(), config)),
            "3" => generate_report(config)?,
            "4" => return Ok(()),
            _ => println!("Invalid choice. Please try again."),
        }
        println!();
    }
}

fn load_file(config: &EngineConfig) -> Result<()> {
    let Some(filename) = prompt("Enter filename: ")? else {
        return Ok(());
    };
    match loader::load_path(Path::new(&filename)) {
        Ok(raws) => replace_analysis(Analysis::run(&raws, config)),
        Err(e) => {
            warn!(file = %filename, error = %e, "load failed");
            println!("Failed to load file: {e}");
        }
    }
    Ok(())
}

fn replace_analysis(analysis: Analysis) {
    println!(
        "Processing dataset... ({} rows loaded, {} kept)",
        analysis.dataset.total_rows,
        analysis.dataset.rows.len()
    );
    let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.analysis = Some(analysis);
}

fn generate_report(config: &EngineConfig) -> Result<()> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(analysis) = state.analysis.as_ref() else {
        println!("No data loaded. Please choose [1] or [2] first.");
        return Ok(());
    };
    info!(rows = analysis.dataset.rows.len(), "generating report");
    report::print_analysis(analysis, config)?;
    Ok(())
}
