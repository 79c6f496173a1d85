pub mod analyzer;
pub mod extractor;

pub use analyzer::*;
pub use extractor::*;

use thiserror::Error;

use crate::formulary::FormularyError;
use crate::parser::VocabularyError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No text found in document")]
    NoTextFound,

    #[error("At least 2 medicines required for comparison")]
    TooFewMedicines,

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Extraction task failed: {0}")]
    TaskFailed(String),

    #[error("Formulary error: {0}")]
    Formulary(#[from] FormularyError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),
}
