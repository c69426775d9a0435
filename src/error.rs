use thiserror::Error;

/// Failures at the file boundary. The engine itself never errors; only
/// reading and writing files can.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Workbook has no sheets")]
    EmptyWorkbook,

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Expected a JSON array of rows")]
    NotAnArray,

    #[error("Row {0} is not a JSON object")]
    NotAnObject(usize),
}
