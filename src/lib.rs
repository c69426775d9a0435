//! Sales spreadsheet aggregation and insight engine.
//!
//! Raw rows → normalized rows → aggregates per dimension → rankings and
//! trends → templated insights. [`pipeline::Analysis::run`] performs the
//! whole pass in one synchronous call.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod insights;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod sample;
pub mod types;

pub use aggregate::{aggregate, aggregate_by, Aggregates, GroupKey, SortMode};
pub use config::EngineConfig;
pub use error::InsightError;
pub use format::format_currency;
pub use insights::build_insights;
pub use normalize::{
    normalize_row, normalize_row_with_marker, normalize_rows, normalize_rows_with_marker,
};
pub use pipeline::Analysis;
pub use types::{AggregateBucket, Dataset, FlagCounts, Insight, NormalizedRow, RawRow, Summary};
