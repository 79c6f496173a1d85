use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::formulary::{BrandRecord, RiskLevel, SafetyProfile};
use crate::parser::ParsedLine;

// ---------------------------------------------------------------------------
// MedicineRecord & EnrichedMedicine
// ---------------------------------------------------------------------------

/// A medicine record before enrichment: parsed from text or supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_line: Option<String>,
}

impl MedicineRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dosage(mut self, dosage: impl Into<String>) -> Self {
        self.dosage = Some(dosage.into());
        self
    }

    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }
}

impl From<ParsedLine> for MedicineRecord {
    fn from(line: ParsedLine) -> Self {
        Self {
            name: line.name,
            dosage: line.dosage,
            frequency: Some(line.frequency),
            duration: line.duration,
            raw_line: Some(line.raw_line),
        }
    }
}

impl From<&EnrichedMedicine> for MedicineRecord {
    fn from(medicine: &EnrichedMedicine) -> Self {
        medicine.record.clone()
    }
}

/// A record with formulary data attached, or flagged as unmatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMedicine {
    #[serde(flatten)]
    pub record: MedicineRecord,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub brands: Vec<BrandRecord>,
    /// Taken from the representative (first) brand.
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default)]
    pub max_daily_dose: Option<String>,
    /// Set only when `found` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl EnrichedMedicine {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn dosage(&self) -> Option<&str> {
        self.record.dosage.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Dosage validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosageValidation {
    pub valid: bool,
    pub warning: Option<String>,
}

impl DosageValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            warning: None,
        }
    }

    pub fn exceeded(warning: String) -> Self {
        Self {
            valid: false,
            warning: Some(warning),
        }
    }
}

// ---------------------------------------------------------------------------
// SafetyReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSummary {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub side_effects: Vec<String>,
    pub interactions: Vec<String>,
    pub max_daily_dose: Option<String>,
}

/// A textual cross-reference between two medicines' interaction lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionFinding {
    /// "A and B", A being the medicine whose interaction list matched.
    pub between: String,
    pub medicines: [String; 2],
    pub interaction: String,
    pub severity: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    Dosage,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub medicine: String,
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub medicines: Vec<MedicineSummary>,
    pub interactions: Vec<InteractionFinding>,
    pub warnings: Vec<Warning>,
    pub recommendations: Vec<String>,
}

impl SafetyReport {
    pub fn is_all_clear(&self) -> bool {
        self.interactions.is_empty() && self.warnings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Brand comparison
// ---------------------------------------------------------------------------

/// A price at a requested strength, or "N/A" when the brand lists none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceLabel {
    Listed(f64),
    NotAvailable,
}

impl PriceLabel {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Listed(p) => Some(*p),
            Self::NotAvailable => None,
        }
    }
}

impl From<Option<f64>> for PriceLabel {
    fn from(price: Option<f64>) -> Self {
        price.map_or(Self::NotAvailable, Self::Listed)
    }
}

impl fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed(p) => write!(f, "{p}"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for PriceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Listed(p) => serializer.serialize_f64(*p),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandChoice {
    #[serde(rename = "Brand 1")]
    Brand1,
    #[serde(rename = "Brand 2")]
    Brand2,
    Similar,
}

impl BrandChoice {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brand1 => "Brand 1",
            Self::Brand2 => "Brand 2",
            Self::Similar => "Similar",
        }
    }
}

/// One side of a comparison: the resolved brand at the caller's dosage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedBrand {
    pub name: String,
    pub manufacturer: String,
    pub dosage: String,
    pub price: PriceLabel,
    pub ingredients: Vec<String>,
    pub side_effects: Vec<String>,
    pub interactions: Vec<String>,
    pub safety: SafetyProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientComparison {
    /// True when every brand-1 ingredient is also in brand 2 (not set equality).
    #[serde(rename = "match")]
    pub is_match: bool,
    pub unique_in_brand1: Vec<String>,
    pub unique_in_brand2: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDifference {
    pub difference: f64,
    /// Relative to the cheaper price, two decimals and a percent sign ("10.00%").
    pub percentage_difference: String,
    pub cheaper: BrandChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyComparison {
    pub brand1_risk: RiskLevel,
    pub brand2_risk: RiskLevel,
    pub safer: BrandChoice,
    pub brand1_warnings: Vec<String>,
    pub brand2_warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// The first supporting factor, or a neutral statement when there is none.
    pub recommendation: String,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBlock {
    pub ingredient_matches: IngredientComparison,
    /// Absent when either brand has no price at the requested dosage.
    pub price_difference: Option<PriceDifference>,
    pub safety_comparison: SafetyComparison,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub generic_name: String,
    pub brand1: ComparedBrand,
    pub brand2: ComparedBrand,
    pub analysis: AnalysisBlock,
}

/// Structured error body, rendered as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("One or both brands not found")]
    BrandsNotFound {
        generic_name: String,
        missing: Vec<String>,
    },
}

impl ComparisonError {
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

impl Serialize for ComparisonError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}
