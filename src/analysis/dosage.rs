use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::DosageCheckMode;

use super::messages::MessageTemplates;
use super::types::{DosageValidation, EnrichedMedicine};

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Regex patterns for unit-aware parsing (compiled once via LazyLock).
static RE_MG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)\s*(?:mg|milligrams?)").unwrap());
static RE_G: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)\s*(?:g|grams?)\b").unwrap());
static RE_MCG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)\s*(?:mcg|micrograms?|ug|µg)").unwrap());

/// First run of ASCII digits in a free-text field, leading zeros stripped
/// ("0.5g" -> "0", "0400mg" -> "400").
///
/// Kept as text so arbitrarily long numbers still compare.
pub fn leading_integer(text: &str) -> Option<&str> {
    let digits = RE_DIGITS.find(text)?.as_str();
    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}

/// Numeric ordering of two zero-stripped digit strings.
fn compare_integers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Parse a dose string into milligrams.
/// Handles: "500mg", "1g", "250 mg", "0.5g", "100mcg", "500 milligrams".
/// Count units such as "2 tablets" have no mass and return `None`.
pub fn parse_dose_to_mg(dose: &str) -> Option<f64> {
    let lower = dose.to_lowercase();

    if let Some(caps) = RE_MG.captures(&lower) {
        return caps.get(1)?.as_str().parse::<f64>().ok();
    }
    if let Some(caps) = RE_MCG.captures(&lower) {
        return caps
            .get(1)?
            .as_str()
            .parse::<f64>()
            .ok()
            .map(|v| v / 1000.0);
    }
    if let Some(caps) = RE_G.captures(&lower) {
        return caps.get(1)?.as_str().parse::<f64>().ok().map(|v| v * 1000.0);
    }

    None
}

/// Compare the declared dosage with the formulary's max daily dose.
///
/// Compares the leading integers of both fields without unit conversion, so
/// "2 tablets" against "4000mg" is computed even though it means nothing.
/// Missing or digit-free fields cannot be checked and count as valid.
pub fn validate_dosage(medicine: &EnrichedMedicine) -> DosageValidation {
    validate_dosage_with(medicine, DosageCheckMode::LeadingInteger)
}

pub fn validate_dosage_with(medicine: &EnrichedMedicine, mode: DosageCheckMode) -> DosageValidation {
    let (Some(dosage), Some(max)) = (medicine.dosage(), medicine.max_daily_dose.as_deref()) else {
        return DosageValidation::ok();
    };

    let exceeds = match mode {
        DosageCheckMode::LeadingInteger => match (leading_integer(dosage), leading_integer(max)) {
            (Some(d), Some(m)) => compare_integers(d, m) == Ordering::Greater,
            _ => false,
        },
        DosageCheckMode::UnitAware => match (parse_dose_to_mg(dosage), parse_dose_to_mg(max)) {
            (Some(d), Some(m)) => d > m,
            _ => false,
        },
    };

    if exceeds {
        tracing::debug!(
            medicine = %medicine.name(),
            dosage,
            max_daily_dose = max,
            ?mode,
            "Dosage above max daily dose"
        );
        DosageValidation::exceeded(MessageTemplates::dosage_exceeds(dosage, max))
    } else {
        DosageValidation::ok()
    }
}
