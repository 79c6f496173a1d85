/// Message template builder for warnings, recommendations and comparison factors.
/// Calm framing: observations for the patient to confirm, never instructions.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Inline warning on an enriched record the formulary could not match.
    pub const NOT_FOUND: &'static str = "Medicine not found in database";

    /// Report warning for the same condition.
    pub const VERIFY_MANUALLY: &'static str = "Medicine not found in database - verify manually";

    pub const INTERACTIONS_DETECTED: &'static str =
        "Potential drug interactions detected. Consult healthcare provider.";

    pub const REVIEW_WARNINGS: &'static str = "Review warnings above before taking medicines.";

    pub const ALL_CLEAR: &'static str =
        "No major interactions detected. Proceed as per prescription.";

    pub const BOTH_SUITABLE: &'static str =
        "Both brands are suitable; choose based on availability and preference";

    /// Shown when free text yielded no medicine records.
    pub const NOTHING_PARSED: &'static str =
        "Text extracted but no medicines parsed. Please review text manually.";

    /// DOSAGE message, quoting both values as written.
    pub fn dosage_exceeds(dosage: &str, max_daily_dose: &str) -> String {
        format!(
            "Dosage {} may exceed max daily dose of {}",
            dosage, max_daily_dose,
        )
    }

    /// INTERACTION pair label.
    pub fn interaction_between(medicine: &str, other: &str) -> String {
        format!("{} and {}", medicine, other)
    }

    /// PRICE factor.
    pub fn more_affordable(brand: &str, price: &str, other_price: &str) -> String {
        format!("{} is more affordable ({} vs {})", brand, price, other_price)
    }

    /// RISK factor.
    pub fn lower_risk(brand: &str, risk_level: &str) -> String {
        format!("{} has lower risk profile ({})", brand, risk_level)
    }

    /// MANUFACTURER factor.
    pub fn established_manufacturer(brand: &str, manufacturer: &str) -> String {
        format!(
            "{} is from established manufacturer ({})",
            brand, manufacturer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dosage_message_quotes_both_values() {
        let msg = MessageTemplates::dosage_exceeds("5000mg", "4000mg");
        assert_eq!(msg, "Dosage 5000mg may exceed max daily dose of 4000mg");
    }

    #[test]
    fn factor_messages() {
        assert_eq!(
            MessageTemplates::more_affordable("Brand 1", "50", "55"),
            "Brand 1 is more affordable (50 vs 55)"
        );
        assert_eq!(
            MessageTemplates::lower_risk("Brand 2", "Low"),
            "Brand 2 has lower risk profile (Low)"
        );
        assert_eq!(
            MessageTemplates::established_manufacturer("Brand 1", "GSK"),
            "Brand 1 is from established manufacturer (GSK)"
        );
    }

    #[test]
    fn templates_avoid_alarm_wording() {
        for msg in [
            MessageTemplates::INTERACTIONS_DETECTED,
            MessageTemplates::REVIEW_WARNINGS,
            MessageTemplates::ALL_CLEAR,
        ] {
            let lower = msg.to_lowercase();
            assert!(!lower.contains("immediately"));
            assert!(!lower.contains("urgent"));
        }
    }
}
