use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Qualitative risk attached to a brand's safety profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Numeric ranking used when two brands are compared (Low=1 .. High=3).
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Brand data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyProfile {
    /// Quantity and unit as written in the formulary, e.g. "4000mg".
    pub max_daily_dose: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One manufacturer's product for a generic medicine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandRecord {
    pub name: String,
    pub manufacturer: String,
    pub dosage_form: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    /// Free-text labels of interacting substances, not normalized identifiers.
    #[serde(default)]
    pub interactions: Vec<String>,
    /// Strength label -> price.
    #[serde(default)]
    pub pricing: BTreeMap<String, f64>,
    pub safety: SafetyProfile,
}

impl BrandRecord {
    /// Price listed for a strength label. Zero or negative prices count as unlisted.
    pub fn price_for(&self, strength: &str) -> Option<f64> {
        self.pricing.get(strength).copied().filter(|p| *p > 0.0)
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// FormularyEntry
// ---------------------------------------------------------------------------

/// A generic medicine and its marketed brands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormularyEntry {
    /// Lookup key, unique case-insensitively within a formulary ("paracetamol").
    pub key: String,
    /// Display name ("Paracetamol (Acetaminophen)").
    pub generic_name: String,
    pub brands: Vec<BrandRecord>,
}

impl FormularyEntry {
    /// The brand whose data stands in for the whole entry during enrichment.
    pub fn representative_brand(&self) -> Option<&BrandRecord> {
        self.brands.first()
    }

    pub fn find_brand(&self, brand_name: &str) -> Option<&BrandRecord> {
        self.brands.iter().find(|b| b.name_matches(brand_name))
    }
}

/// A substring match produced by `FormularyLookup::search_all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    pub generic_key: &'a str,
    /// Set when the hit came from a brand name rather than the generic key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<&'a str>,
    /// Serialized inline: `{genericKey, key, genericName, brands}`.
    #[serde(flatten)]
    pub entry: &'a FormularyEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_brand(name: &str, pricing: &[(&str, f64)]) -> BrandRecord {
        BrandRecord {
            name: name.into(),
            manufacturer: "Acme".into(),
            dosage_form: "Tablet".into(),
            strengths: pricing.iter().map(|(s, _)| s.to_string()).collect(),
            ingredients: vec![],
            side_effects: vec![],
            interactions: vec![],
            pricing: pricing.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            safety: SafetyProfile {
                max_daily_dose: "1000mg".into(),
                risk_level: RiskLevel::Low,
                warnings: vec![],
            },
        }
    }

    #[test]
    fn risk_level_ordering_matches_rank() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Low.rank(), 1);
        assert_eq!(RiskLevel::High.rank(), 3);
    }

    #[test]
    fn price_for_known_and_unknown_strength() {
        let brand = make_brand("Calpol", &[("500mg", 50.0), ("650mg", 0.0)]);
        assert_eq!(brand.price_for("500mg"), Some(50.0));
        assert_eq!(brand.price_for("650mg"), None);
        assert_eq!(brand.price_for("1g"), None);
    }

    #[test]
    fn find_brand_case_insensitive() {
        let entry = FormularyEntry {
            key: "paracetamol".into(),
            generic_name: "Paracetamol".into(),
            brands: vec![make_brand("Calpol", &[]), make_brand("Dolo", &[])],
        };
        assert_eq!(entry.find_brand("DOLO").map(|b| b.name.as_str()), Some("Dolo"));
        assert!(entry.find_brand("Tylenol").is_none());
        assert_eq!(entry.representative_brand().unwrap().name, "Calpol");
    }

    #[test]
    fn brand_deserializes_from_camel_case() {
        let json = r#"{
            "name": "Brufen",
            "manufacturer": "Abbott",
            "dosageForm": "Tablet",
            "sideEffects": ["Rash"],
            "pricing": {"200mg": 45},
            "safety": {"maxDailyDose": "1200mg", "riskLevel": "Medium"}
        }"#;
        let brand: BrandRecord = serde_json::from_str(json).unwrap();
        assert_eq!(brand.side_effects, vec!["Rash".to_string()]);
        assert_eq!(brand.safety.risk_level, RiskLevel::Medium);
        assert!(brand.safety.warnings.is_empty());
        assert!(brand.interactions.is_empty());
    }
}
