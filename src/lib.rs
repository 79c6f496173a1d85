pub mod analysis;
pub mod config;
pub mod formulary;
pub mod parser;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use analysis::{ComparisonResult, EnrichedMedicine, MedicineRecord, SafetyReport};
pub use formulary::{Formulary, FormularyLookup};
pub use parser::{LineParser, ParsedLine, Vocabulary};
pub use pipeline::{PipelineError, PrescriptionAnalyzer};

/// Install the global tracing subscriber. `RUST_LOG` wins over the default filter.
///
/// Logs go to stderr so JSON on stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{} tracing initialized", config::APP_NAME, config::APP_VERSION);
}
