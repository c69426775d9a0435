use crate::normalize::FLAG_MARKER;

/// Knobs for ranking and rendering. Everything else in the pipeline is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub currency_symbol: String,
    /// How many clients the tables and the zero-flag rule look at.
    pub top_clients: usize,
    pub top_items: usize,
    pub top_periods: usize,
    /// Character whose presence marks a design/planning cell as included.
    pub flag_marker: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "¥".to_string(),
            top_clients: 5,
            top_items: 3,
            top_periods: 4,
            flag_marker: FLAG_MARKER,
        }
    }
}
