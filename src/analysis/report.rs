use crate::config::DosageCheckMode;
use crate::formulary::RiskLevel;

use super::dosage::validate_dosage_with;
use super::messages::MessageTemplates;
use super::types::{
    EnrichedMedicine, InteractionFinding, MedicineSummary, SafetyReport, Warning, WarningKind,
};

/// Build the consolidated safety report with the default dosage check.
pub fn generate_safety_report(medicines: &[EnrichedMedicine]) -> SafetyReport {
    generate_safety_report_with(medicines, DosageCheckMode::default())
}

pub fn generate_safety_report_with(
    medicines: &[EnrichedMedicine],
    mode: DosageCheckMode,
) -> SafetyReport {
    let summaries = summarize_found(medicines);
    let interactions = detect_interactions(medicines);
    let warnings = collect_warnings(medicines, mode);
    let recommendations = build_recommendations(&interactions, &warnings);

    tracing::debug!(
        medicines = medicines.len(),
        interactions = interactions.len(),
        warnings = warnings.len(),
        "Safety report generated"
    );

    SafetyReport {
        medicines: summaries,
        interactions,
        warnings,
        recommendations,
    }
}

fn summarize_found(medicines: &[EnrichedMedicine]) -> Vec<MedicineSummary> {
    medicines
        .iter()
        .filter(|m| m.found)
        .map(|m| MedicineSummary {
            name: m.record.name.clone(),
            dosage: m.record.dosage.clone(),
            frequency: m.record.frequency.clone(),
            duration: m.record.duration.clone(),
            side_effects: m.side_effects.clone(),
            interactions: m.interactions.clone(),
            max_daily_dose: m.max_daily_dose.clone(),
        })
        .collect()
}

/// Pairwise text scan: an interaction label on one medicine that contains
/// another medicine's name (case-insensitive) is a finding.
///
/// Directions are reported independently; A listing B and B listing A give two findings.
pub fn detect_interactions(medicines: &[EnrichedMedicine]) -> Vec<InteractionFinding> {
    let mut findings = Vec::new();

    for (i, med) in medicines.iter().enumerate() {
        for interaction in &med.interactions {
            let interaction_upper = interaction.to_uppercase();

            for (j, other) in medicines.iter().enumerate() {
                if i == j || other.name().trim().is_empty() {
                    continue;
                }
                if interaction_upper.contains(&other.name().to_uppercase()) {
                    findings.push(InteractionFinding {
                        between: MessageTemplates::interaction_between(med.name(), other.name()),
                        medicines: [med.name().to_string(), other.name().to_string()],
                        interaction: interaction.clone(),
                        severity: RiskLevel::High,
                    });
                }
            }
        }
    }

    findings
}

/// Dosage warnings for every medicine, plus a database warning for each unmatched one.
pub fn collect_warnings(medicines: &[EnrichedMedicine], mode: DosageCheckMode) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for med in medicines {
        let validation = validate_dosage_with(med, mode);
        if let (false, Some(message)) = (validation.valid, validation.warning) {
            warnings.push(Warning {
                medicine: med.name().to_string(),
                kind: WarningKind::Dosage,
                message,
            });
        }

        if !med.found {
            warnings.push(Warning {
                medicine: med.name().to_string(),
                kind: WarningKind::Database,
                message: MessageTemplates::VERIFY_MANUALLY.to_string(),
            });
        }
    }

    warnings
}

/// Fixed-order recommendations. "Review warnings" and "all clear" never both appear.
pub fn build_recommendations(
    interactions: &[InteractionFinding],
    warnings: &[Warning],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !interactions.is_empty() {
        recommendations.push(MessageTemplates::INTERACTIONS_DETECTED.to_string());
    }
    if !warnings.is_empty() {
        recommendations.push(MessageTemplates::REVIEW_WARNINGS.to_string());
    }
    if interactions.is_empty() && warnings.is_empty() {
        recommendations.push(MessageTemplates::ALL_CLEAR.to_string());
    }

    recommendations
}
