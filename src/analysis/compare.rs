use crate::formulary::{BrandRecord, FormularyLookup, SafetyProfile};

use super::messages::MessageTemplates;
use super::types::{
    AnalysisBlock, BrandChoice, ComparedBrand, ComparisonError, ComparisonResult,
    IngredientComparison, PriceDifference, PriceLabel, Recommendation, SafetyComparison,
};

/// Manufacturers that earn a recommendation factor on their own.
pub const ESTABLISHED_MANUFACTURERS: &[&str] = &["GSK", "Johnson & Johnson", "Abbott", "Pfizer"];

/// Side-by-side comparison of two brands of one generic, each at a caller-chosen strength.
///
/// Brand names resolve case-insensitively within the generic's brand list.
/// An unknown generic or brand is returned as an error value, never a panic.
pub fn compare_brands<F: FormularyLookup + ?Sized>(
    formulary: &F,
    generic_name: &str,
    brand1_name: &str,
    brand2_name: &str,
    dosage1: &str,
    dosage2: &str,
) -> Result<ComparisonResult, ComparisonError> {
    let brand1 = formulary.get_brand_details(generic_name, brand1_name);
    let brand2 = formulary.get_brand_details(generic_name, brand2_name);

    let (Some(brand1), Some(brand2)) = (brand1, brand2) else {
        let missing: Vec<String> = [(brand1_name, brand1), (brand2_name, brand2)]
            .into_iter()
            .filter(|(_, resolved)| resolved.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        tracing::debug!(generic = generic_name, ?missing, "Brand comparison unresolved");
        return Err(ComparisonError::BrandsNotFound {
            generic_name: generic_name.to_string(),
            missing,
        });
    };

    let price1 = brand1.price_for(dosage1);
    let price2 = brand2.price_for(dosage2);

    let analysis = AnalysisBlock {
        ingredient_matches: compare_ingredients(&brand1.ingredients, &brand2.ingredients),
        price_difference: calculate_price_difference(price1, price2),
        safety_comparison: compare_safety(&brand1.safety, &brand2.safety),
        recommendation: generate_recommendation(brand1, brand2, price1, price2),
    };

    Ok(ComparisonResult {
        generic_name: generic_name.to_string(),
        brand1: compared(brand1, dosage1, price1),
        brand2: compared(brand2, dosage2, price2),
        analysis,
    })
}

fn compared(brand: &BrandRecord, dosage: &str, price: Option<f64>) -> ComparedBrand {
    ComparedBrand {
        name: brand.name.clone(),
        manufacturer: brand.manufacturer.clone(),
        dosage: dosage.to_string(),
        price: PriceLabel::from(price),
        ingredients: brand.ingredients.clone(),
        side_effects: brand.side_effects.clone(),
        interactions: brand.interactions.clone(),
        safety: brand.safety.clone(),
    }
}

/// `is_match` asks only whether brand 1's ingredients all appear in brand 2.
pub fn compare_ingredients(ingredients1: &[String], ingredients2: &[String]) -> IngredientComparison {
    let unique_in_brand1: Vec<String> = ingredients1
        .iter()
        .filter(|ing| !ingredients2.contains(ing))
        .cloned()
        .collect();
    let unique_in_brand2: Vec<String> = ingredients2
        .iter()
        .filter(|ing| !ingredients1.contains(ing))
        .cloned()
        .collect();

    IngredientComparison {
        is_match: unique_in_brand1.is_empty(),
        unique_in_brand1,
        unique_in_brand2,
    }
}

/// `None` unless both prices are listed. Equal prices name brand 2 as cheaper.
pub fn calculate_price_difference(price1: Option<f64>, price2: Option<f64>) -> Option<PriceDifference> {
    let (p1, p2) = (price1?, price2?);

    let difference = (p1 - p2).abs();
    let percentage = difference / p1.min(p2) * 100.0;

    Some(PriceDifference {
        difference,
        percentage_difference: format!("{percentage:.2}%"),
        cheaper: if p1 < p2 {
            BrandChoice::Brand1
        } else {
            BrandChoice::Brand2
        },
    })
}

pub fn compare_safety(safety1: &SafetyProfile, safety2: &SafetyProfile) -> SafetyComparison {
    let (rank1, rank2) = (safety1.risk_level.rank(), safety2.risk_level.rank());

    let safer = if rank1 < rank2 {
        BrandChoice::Brand1
    } else if rank2 < rank1 {
        BrandChoice::Brand2
    } else {
        BrandChoice::Similar
    };

    SafetyComparison {
        brand1_risk: safety1.risk_level,
        brand2_risk: safety2.risk_level,
        safer,
        brand1_warnings: safety1.warnings.clone(),
        brand2_warnings: safety2.warnings.clone(),
    }
}

/// Factors in order: price, risk, then manufacturer (brand 1 before brand 2).
/// The headline is the first factor found.
pub fn generate_recommendation(
    brand1: &BrandRecord,
    brand2: &BrandRecord,
    price1: Option<f64>,
    price2: Option<f64>,
) -> Recommendation {
    let mut factors = Vec::new();

    // An unlisted price ranks as the most expensive.
    let cost1 = price1.unwrap_or(f64::INFINITY);
    let cost2 = price2.unwrap_or(f64::INFINITY);
    let (label1, label2) = (PriceLabel::from(price1), PriceLabel::from(price2));
    if cost1 < cost2 {
        factors.push(MessageTemplates::more_affordable(
            BrandChoice::Brand1.label(),
            &label1.to_string(),
            &label2.to_string(),
        ));
    } else if cost2 < cost1 {
        factors.push(MessageTemplates::more_affordable(
            BrandChoice::Brand2.label(),
            &label2.to_string(),
            &label1.to_string(),
        ));
    }

    match compare_safety(&brand1.safety, &brand2.safety).safer {
        BrandChoice::Brand1 => factors.push(MessageTemplates::lower_risk(
            BrandChoice::Brand1.label(),
            brand1.safety.risk_level.as_str(),
        )),
        BrandChoice::Brand2 => factors.push(MessageTemplates::lower_risk(
            BrandChoice::Brand2.label(),
            brand2.safety.risk_level.as_str(),
        )),
        BrandChoice::Similar => {}
    }

    for (choice, brand) in [(BrandChoice::Brand1, brand1), (BrandChoice::Brand2, brand2)] {
        if ESTABLISHED_MANUFACTURERS.contains(&brand.manufacturer.as_str()) {
            factors.push(MessageTemplates::established_manufacturer(
                choice.label(),
                &brand.manufacturer,
            ));
        }
    }

    let recommendation = factors
        .first()
        .cloned()
        .unwrap_or_else(|| MessageTemplates::BOTH_SUITABLE.to_string());

    Recommendation {
        recommendation,
        factors,
    }
}
