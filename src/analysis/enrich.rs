use crate::formulary::{FormularyEntry, FormularyLookup};

use super::messages::MessageTemplates;
use super::types::{EnrichedMedicine, MedicineRecord};

/// Attach formulary data to each record, one output per input, order kept.
///
/// Resolution: exact generic key, then substring search over keys and brand
/// names (first hit wins), else `found: false`.
pub fn enrich_medicine_data<I, R, F>(records: I, formulary: &F) -> Vec<EnrichedMedicine>
where
    I: IntoIterator<Item = R>,
    R: Into<MedicineRecord>,
    F: FormularyLookup + ?Sized,
{
    records
        .into_iter()
        .map(|record| enrich_medicine(record, formulary))
        .collect()
}

/// Enrich a single record.
pub fn enrich_medicine<R, F>(record: R, formulary: &F) -> EnrichedMedicine
where
    R: Into<MedicineRecord>,
    F: FormularyLookup + ?Sized,
{
    let record = record.into();

    // A blank name would substring-match every entry.
    if record.name.trim().is_empty() {
        return unmatched(record);
    }

    if let Some(entry) = formulary.get_by_generic_name(&record.name) {
        return matched(record, entry);
    }

    // First search hit stands in for the medicine; no brand disambiguation.
    if let Some(hit) = formulary.search_all(&record.name).first() {
        tracing::debug!(
            name = %record.name,
            generic = hit.generic_key,
            "Resolved medicine by substring search"
        );
        return matched(record, hit.entry);
    }

    tracing::debug!(name = %record.name, "Medicine not found in formulary");
    unmatched(record)
}

fn matched(record: MedicineRecord, entry: &FormularyEntry) -> EnrichedMedicine {
    let representative = entry.representative_brand();

    EnrichedMedicine {
        record,
        found: true,
        generic_name: Some(entry.generic_name.clone()),
        brands: entry.brands.clone(),
        side_effects: representative
            .map(|b| b.side_effects.clone())
            .unwrap_or_default(),
        interactions: representative
            .map(|b| b.interactions.clone())
            .unwrap_or_default(),
        max_daily_dose: representative.map(|b| b.safety.max_daily_dose.clone()),
        warning: None,
    }
}

fn unmatched(record: MedicineRecord) -> EnrichedMedicine {
    EnrichedMedicine {
        record,
        found: false,
        generic_name: None,
        brands: Vec::new(),
        side_effects: Vec::new(),
        interactions: Vec::new(),
        max_daily_dose: None,
        warning: Some(MessageTemplates::NOT_FOUND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulary::Formulary;
    use crate::parser::parse_medicine_line;

    fn formulary() -> Formulary {
        Formulary::bundled().unwrap()
    }

    #[test]
    fn exact_generic_match_uses_first_brand() {
        let enriched = enrich_medicine(MedicineRecord::named("paracetamol"), &formulary());
        assert!(enriched.found);
        assert_eq!(enriched.generic_name.as_deref(), Some("Paracetamol (Acetaminophen)"));
        assert_eq!(enriched.brands.len(), 3);
        assert_eq!(enriched.max_daily_dose.as_deref(), Some("4000mg"));
        // Calpol is listed first.
        assert!(enriched
            .interactions
            .contains(&"Other acetaminophen products".to_string()));
        assert!(enriched.warning.is_none());
    }

    #[test]
    fn brand_name_resolves_through_search() {
        let enriched = enrich_medicine(MedicineRecord::named("Brufen"), &formulary());
        assert!(enriched.found);
        assert_eq!(enriched.generic_name.as_deref(), Some("Ibuprofen"));
        assert_eq!(enriched.max_daily_dose.as_deref(), Some("1200mg"));
    }

    #[test]
    fn search_representative_is_first_brand_not_matched_brand() {
        // "Amoxycare" is found via its brand, but Amoxil's data is attached.
        let enriched = enrich_medicine(MedicineRecord::named("Amoxycare"), &formulary());
        assert!(enriched.found);
        assert!(enriched
            .interactions
            .contains(&"Oral contraceptives".to_string()));
    }

    #[test]
    fn unknown_medicine_flagged_not_found() {
        let enriched = enrich_medicine(MedicineRecord::named("Warfarin"), &formulary());
        assert!(!enriched.found);
        assert_eq!(enriched.warning.as_deref(), Some("Medicine not found in database"));
        assert!(enriched.generic_name.is_none());
        assert!(enriched.interactions.is_empty());
        assert!(enriched.max_daily_dose.is_none());
    }

    #[test]
    fn blank_name_is_not_found() {
        let enriched = enrich_medicine(MedicineRecord::named("  "), &formulary());
        assert!(!enriched.found);
    }

    #[test]
    fn one_output_per_input_in_order() {
        let records = vec![
            MedicineRecord::named("Calpol"),
            MedicineRecord::named("Mystery"),
            MedicineRecord::named("ibuprofen"),
        ];
        let enriched = enrich_medicine_data(records, &formulary());
        let found: Vec<bool> = enriched.iter().map(|m| m.found).collect();
        assert_eq!(found, vec![true, false, true]);
        assert_eq!(enriched[1].name(), "Mystery");
    }

    #[test]
    fn parsed_lines_keep_their_fields() {
        let parsed = parse_medicine_line("Paracetamol 500mg - 2 tablets twice daily for 5 days")
            .unwrap();
        let enriched = enrich_medicine_data(vec![parsed], &formulary());
        assert_eq!(enriched[0].dosage(), Some("500mg"));
        assert_eq!(enriched[0].record.frequency.as_deref(), Some("Twice daily"));
        assert_eq!(enriched[0].record.duration.as_deref(), Some("5 days"));
    }

    #[test]
    fn re_enrichment_is_idempotent() {
        let formulary = formulary();
        for name in ["Calpol", "amoxicillin", "Unknown"] {
            let first = enrich_medicine(MedicineRecord::named(name), &formulary);
            let second = enrich_medicine(MedicineRecord::from(&first), &formulary);
            assert_eq!(first.found, second.found);
            assert_eq!(first.generic_name, second.generic_name);
            assert_eq!(first.brands, second.brands);
        }
    }

    #[test]
    fn works_through_trait_object() {
        let formulary = formulary();
        let lookup: &dyn FormularyLookup = &formulary;
        let enriched = enrich_medicine_data([MedicineRecord::named("Dolo")], lookup);
        assert!(enriched[0].found);
    }
}
