use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{
    compare_brands, enrich_medicine_data, generate_safety_report_with, validate_dosage_with,
    ComparisonError, ComparisonResult, DosageValidation, EnrichedMedicine, MedicineRecord,
    MessageTemplates, SafetyReport,
};
use crate::config::{self, AnalysisConfig};
use crate::formulary::{Formulary, FormularyLookup};
use crate::parser::{LineParser, Vocabulary};

use super::extractor::TextExtractor;
use super::PipelineError;

/// Identity and time of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisStamp {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisStamp {
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

/// Free text in, enriched medicines and a report out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    #[serde(flatten)]
    pub stamp: AnalysisStamp,
    pub extracted_text: String,
    pub medicines: Vec<EnrichedMedicine>,
    /// Absent when no medicine could be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SafetyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An enriched medicine paired with its dosage check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedMedicine {
    #[serde(flatten)]
    pub medicine: EnrichedMedicine,
    pub dosage_validation: DosageValidation,
}

/// Manually entered records, enriched and validated.
#[derive(Debug, Clone, Serialize)]
pub struct RecordAnalysis {
    #[serde(flatten)]
    pub stamp: AnalysisStamp,
    pub medicines: Vec<ValidatedMedicine>,
    pub report: SafetyReport,
}

/// Compact per-record verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub name: String,
    pub dosage: Option<String>,
    pub found: bool,
    pub dosage_validation: DosageValidation,
    pub interactions: Vec<String>,
    /// The record's inline warning, if any.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    #[serde(flatten)]
    pub stamp: AnalysisStamp,
    pub validations: Vec<ValidationResult>,
    pub report: SafetyReport,
}

/// Cross-check of two or more medicines for interactions.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionCheck {
    #[serde(flatten)]
    pub stamp: AnalysisStamp,
    pub medicines: Vec<EnrichedMedicine>,
    pub report: SafetyReport,
}

/// Runs parse, enrich and report over a shared read-only formulary.
///
/// Cheap to clone; clones share the formulary.
#[derive(Clone)]
pub struct PrescriptionAnalyzer {
    formulary: Arc<dyn FormularyLookup>,
    parser: LineParser,
    config: AnalysisConfig,
}

impl PrescriptionAnalyzer {
    pub fn new(formulary: Arc<dyn FormularyLookup>) -> Self {
        Self {
            formulary,
            parser: LineParser::default(),
            config: AnalysisConfig::default(),
        }
    }

    /// Formulary and vocabulary from the environment or data directory, else the bundled defaults.
    pub fn from_env() -> Result<Self, PipelineError> {
        let formulary = Formulary::load_or_bundled(config::formulary_path().as_deref())?;
        let vocabulary = Vocabulary::load_or_default(config::vocabulary_path().as_deref())?;
        Ok(Self::new(Arc::new(formulary)).with_parser(LineParser::new(vocabulary)))
    }

    pub fn with_parser(mut self, parser: LineParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn formulary(&self) -> &dyn FormularyLookup {
        self.formulary.as_ref()
    }

    pub fn parser(&self) -> &LineParser {
        &self.parser
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Parse free text and analyze whatever medicines it names.
    pub fn analyze_text(&self, text: &str) -> TextAnalysis {
        let start = Instant::now();
        let stamp = AnalysisStamp::now();

        let Some(parsed) = self.parser.parse_text(text) else {
            tracing::info!(
                analysis_id = %stamp.id,
                text_length = text.len(),
                "No medicines parsed from text"
            );
            return TextAnalysis {
                stamp,
                extracted_text: text.to_string(),
                medicines: Vec::new(),
                report: None,
                message: Some(MessageTemplates::NOTHING_PARSED.to_string()),
            };
        };

        let medicines = enrich_medicine_data(parsed, self.formulary.as_ref());
        let report = self.report(&medicines);

        tracing::info!(
            analysis_id = %stamp.id,
            medicines = medicines.len(),
            interactions = report.interactions.len(),
            warnings = report.warnings.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Prescription text analysis complete"
        );

        TextAnalysis {
            stamp,
            extracted_text: text.to_string(),
            medicines,
            report: Some(report),
            message: None,
        }
    }

    /// Extract text from an uploaded payload on the blocking pool, then analyze it.
    pub async fn analyze_document(
        &self,
        extractor: Arc<dyn TextExtractor>,
        bytes: Vec<u8>,
    ) -> Result<TextAnalysis, PipelineError> {
        let extractor_name = extractor.name();
        let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))??;

        if text.trim().is_empty() {
            tracing::warn!(extractor = extractor_name, "Extractor returned no text");
            return Err(PipelineError::NoTextFound);
        }

        Ok(self.analyze_text(&text))
    }

    /// Enrich caller-supplied records and attach a dosage check to each.
    pub fn analyze_records<I, R>(&self, records: I) -> RecordAnalysis
    where
        I: IntoIterator<Item = R>,
        R: Into<MedicineRecord>,
    {
        let stamp = AnalysisStamp::now();
        let enriched = enrich_medicine_data(records, self.formulary.as_ref());
        let report = self.report(&enriched);

        let medicines = enriched
            .into_iter()
            .map(|medicine| ValidatedMedicine {
                dosage_validation: validate_dosage_with(&medicine, self.config.dosage_check),
                medicine,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            analysis_id = %stamp.id,
            medicines = medicines.len(),
            "Manual entry analysis complete"
        );

        RecordAnalysis {
            stamp,
            medicines,
            report,
        }
    }

    pub fn validate_records<I, R>(&self, records: I) -> ValidationOutcome
    where
        I: IntoIterator<Item = R>,
        R: Into<MedicineRecord>,
    {
        let stamp = AnalysisStamp::now();
        let enriched = enrich_medicine_data(records, self.formulary.as_ref());

        let validations = enriched
            .iter()
            .map(|med| ValidationResult {
                name: med.record.name.clone(),
                dosage: med.record.dosage.clone(),
                found: med.found,
                dosage_validation: validate_dosage_with(med, self.config.dosage_check),
                interactions: med.interactions.clone(),
                warnings: med.warning.iter().cloned().collect(),
            })
            .collect();

        ValidationOutcome {
            stamp,
            validations,
            report: self.report(&enriched),
        }
    }

    /// Interaction cross-check. Needs at least two records.
    pub fn check_interactions<I, R>(&self, records: I) -> Result<InteractionCheck, PipelineError>
    where
        I: IntoIterator<Item = R>,
        R: Into<MedicineRecord>,
    {
        let records: Vec<MedicineRecord> = records.into_iter().map(Into::into).collect();
        if records.len() < 2 {
            return Err(PipelineError::TooFewMedicines);
        }

        let stamp = AnalysisStamp::now();
        let medicines = enrich_medicine_data(records, self.formulary.as_ref());
        let report = self.report(&medicines);

        tracing::info!(
            analysis_id = %stamp.id,
            medicines = medicines.len(),
            interactions = report.interactions.len(),
            "Interaction check complete"
        );

        Ok(InteractionCheck {
            stamp,
            medicines,
            report,
        })
    }

    pub fn compare_brands(
        &self,
        generic_name: &str,
        brand1: &str,
        brand2: &str,
        dosage1: &str,
        dosage2: &str,
    ) -> Result<ComparisonResult, ComparisonError> {
        compare_brands(
            self.formulary.as_ref(),
            generic_name,
            brand1,
            brand2,
            dosage1,
            dosage2,
        )
    }

    fn report(&self, medicines: &[EnrichedMedicine]) -> SafetyReport {
        generate_safety_report_with(medicines, self.config.dosage_check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::WarningKind;
    use crate::pipeline::extractor::{ExtractionError, PlainTextExtractor};

    fn analyzer() -> PrescriptionAnalyzer {
        PrescriptionAnalyzer::new(Arc::new(Formulary::bundled().unwrap()))
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            Err(ExtractionError::UnsupportedFormat)
        }
    }

    #[test]
    fn text_with_medicines_produces_report() {
        let analysis = analyzer().analyze_text(
            "Rx\nParacetamol 500mg - 2 tablets twice daily for 5 days\nBrufen 400mg TDS x 3 days",
        );
        // "Rx" parses by leading word and is not in the formulary.
        assert_eq!(analysis.medicines.len(), 3);
        assert!(analysis.message.is_none());

        let report = analysis.report.unwrap();
        assert_eq!(report.medicines.len(), 2);
        // Calpol data lists Warfarin; Brufen lists nothing named here.
        assert!(report.interactions.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Database && w.medicine == "Rx"));
    }

    #[test]
    fn text_without_medicines_reports_nothing_parsed() {
        let analysis = analyzer().analyze_text("500 \n 2-2-2 \n");
        assert!(analysis.medicines.is_empty());
        assert!(analysis.report.is_none());
        assert_eq!(analysis.message.as_deref(), Some(MessageTemplates::NOTHING_PARSED));
    }

    #[test]
    fn analyses_get_distinct_ids() {
        let analyzer = analyzer();
        let a = analyzer.analyze_text("Dolo 650");
        let b = analyzer.analyze_text("Dolo 650");
        assert_ne!(a.stamp.id, b.stamp.id);
    }

    #[tokio::test]
    async fn document_goes_through_extractor() {
        let analysis = analyzer()
            .analyze_document(Arc::new(PlainTextExtractor), b"Amoxil 500mg TDS 5 days".to_vec())
            .await
            .unwrap();
        assert_eq!(analysis.medicines.len(), 1);
        assert_eq!(analysis.medicines[0].name(), "Amoxil");
        assert!(analysis.medicines[0].found);
    }

    #[tokio::test]
    async fn blank_document_is_no_text_found() {
        let err = analyzer()
            .analyze_document(Arc::new(PlainTextExtractor), b"  \n\t\n".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoTextFound));
    }

    #[tokio::test]
    async fn extractor_failure_propagates() {
        let err = analyzer()
            .analyze_document(Arc::new(FailingExtractor), b"anything".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Extraction(ExtractionError::UnsupportedFormat)
        ));
    }

    #[test]
    fn manual_records_carry_dosage_validation() {
        let analysis = analyzer().analyze_records(vec![
            MedicineRecord::named("Paracetamol").with_dosage("5000mg"),
            MedicineRecord::named("Amoxicillin").with_dosage("500mg"),
        ]);
        assert!(!analysis.medicines[0].dosage_validation.valid);
        assert!(analysis.medicines[1].dosage_validation.valid);
        assert_eq!(analysis.report.warnings.len(), 1);

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["id"].is_string());
        assert!(json["timestamp"].is_string());
        assert_eq!(json["medicines"][0]["dosageValidation"]["valid"], false);
        assert_eq!(json["medicines"][0]["name"], "Paracetamol");
    }

    #[test]
    fn validation_results_mirror_records() {
        let outcome = analyzer().validate_records(vec![
            MedicineRecord::named("Calpol").with_dosage("500mg"),
            MedicineRecord::named("Unknownium"),
        ]);
        assert_eq!(outcome.validations.len(), 2);
        assert!(outcome.validations[0].found);
        assert!(outcome.validations[0].warnings.is_empty());
        assert!(!outcome.validations[0].interactions.is_empty());
        assert!(!outcome.validations[1].found);
        assert_eq!(
            outcome.validations[1].warnings,
            vec![MessageTemplates::NOT_FOUND.to_string()]
        );
    }

    #[test]
    fn interaction_check_requires_two_records() {
        let err = analyzer()
            .check_interactions(vec![MedicineRecord::named("Calpol")])
            .unwrap_err();
        assert!(matches!(err, PipelineError::TooFewMedicines));
        assert_eq!(err.to_string(), "At least 2 medicines required for comparison");
    }

    #[test]
    fn interaction_check_flags_pairs() {
        let check = analyzer()
            .check_interactions(vec![
                MedicineRecord::named("Brufen"),
                MedicineRecord::named("Aspirin"),
            ])
            .unwrap();
        assert_eq!(check.report.interactions.len(), 1);
        assert_eq!(check.report.interactions[0].between, "Brufen and Aspirin");
    }

    #[test]
    fn strict_units_config_changes_dosage_verdict() {
        let records = || vec![MedicineRecord::named("Paracetamol").with_dosage("5g")];

        let lenient = analyzer().analyze_records(records());
        assert!(lenient.medicines[0].dosage_validation.valid);

        let strict = analyzer()
            .with_config(AnalysisConfig::strict_units())
            .analyze_records(records());
        assert!(!strict.medicines[0].dosage_validation.valid);
        assert_eq!(strict.report.warnings[0].kind, WarningKind::Dosage);
    }

    #[test]
    fn compare_delegates_to_formulary() {
        let result = analyzer()
            .compare_brands("paracetamol", "Calpol", "Tylenol", "500mg", "500mg")
            .unwrap();
        assert_eq!(result.brand2.name, "Tylenol");
        assert!(analyzer()
            .compare_brands("paracetamol", "Calpol", "Nope", "500mg", "500mg")
            .is_err());
    }
}
