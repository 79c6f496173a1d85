pub mod types;
pub mod lookup;

pub use types::*;
pub use lookup::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormularyError {
    #[error("Formulary load failed ({0}): {1}")]
    Load(String, String),

    #[error("Formulary parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate generic name in formulary: {0}")]
    DuplicateGeneric(String),

    #[error("Formulary entry has no brands: {0}")]
    NoBrands(String),
}
