use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Medicheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming a formulary JSON file to load instead of the bundled one.
pub const FORMULARY_ENV: &str = "MEDICHECK_FORMULARY";

/// Environment variable naming a newline-separated vocabulary file.
pub const VOCABULARY_ENV: &str = "MEDICHECK_VOCABULARY";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medicheck=info,medicheck_lib=info"
}

/// Get the application data directory (~/.medicheck/).
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medicheck")
}

/// File names looked up in the data directory when no override is set.
pub const FORMULARY_FILE: &str = "formulary.json";
pub const VOCABULARY_FILE: &str = "vocabulary.txt";

/// Formulary file override from the environment, if any.
pub fn formulary_path_from_env() -> Option<PathBuf> {
    path_from_env(FORMULARY_ENV)
}

/// Vocabulary file override from the environment, if any.
pub fn vocabulary_path_from_env() -> Option<PathBuf> {
    path_from_env(VOCABULARY_ENV)
}

/// Environment override, else `~/.medicheck/formulary.json` when it exists.
/// `None` means the bundled formulary.
pub fn formulary_path() -> Option<PathBuf> {
    formulary_path_from_env().or_else(|| existing_in(&app_data_dir(), FORMULARY_FILE))
}

/// Environment override, else `~/.medicheck/vocabulary.txt` when it exists.
pub fn vocabulary_path() -> Option<PathBuf> {
    vocabulary_path_from_env().or_else(|| existing_in(&app_data_dir(), VOCABULARY_FILE))
}

fn existing_in(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let path = dir.join(file_name);
    path.is_file().then_some(path)
}

fn path_from_env(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// How a declared dosage is compared against the formulary's max daily dose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DosageCheckMode {
    /// Compare the first run of digits in each field, ignoring units.
    #[default]
    LeadingInteger,
    /// Convert both values to milligrams first; unconvertible values are not checked.
    UnitAware,
}

/// Options applied by the prescription analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub dosage_check: DosageCheckMode,
}

impl AnalysisConfig {
    pub fn strict_units() -> Self {
        Self {
            dosage_check: DosageCheckMode::UnitAware,
        }
    }
}
