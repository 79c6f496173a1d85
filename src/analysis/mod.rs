//! Enrichment, dosage validation, safety reporting and brand comparison.
//!
//! Everything here is a pure function over a read-only `FormularyLookup`.

pub mod compare;
pub mod dosage;
pub mod enrich;
pub mod messages;
pub mod report;
pub mod types;

pub use compare::{compare_brands, ESTABLISHED_MANUFACTURERS};
pub use dosage::{validate_dosage, validate_dosage_with};
pub use enrich::{enrich_medicine, enrich_medicine_data};
pub use messages::MessageTemplates;
pub use report::{generate_safety_report, generate_safety_report_with};
pub use types::*;
