use serde::{Deserialize, Serialize};

/// Frequency used when a line names no recognisable schedule.
pub const DEFAULT_FREQUENCY: &str = "Once daily";

/// Candidate medicine record extracted from one line of prescription text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLine {
    pub name: String,
    /// Quantity and unit as one token, e.g. "500mg".
    pub dosage: Option<String>,
    /// Normalized phrase; never empty.
    pub frequency: String,
    /// Quantity and pluralised unit, e.g. "5 days".
    pub duration: Option<String>,
    pub raw_line: String,
}
