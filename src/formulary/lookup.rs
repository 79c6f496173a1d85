use std::collections::HashMap;
use std::path::Path;

use super::types::{BrandRecord, FormularyEntry, SearchHit};
use super::FormularyError;

/// Formulary compiled into the binary (resources/formulary.json).
const BUNDLED_FORMULARY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/formulary.json"
));

/// Read-only access to reference medicine data.
///
/// Implementations are loaded once and shared; nothing here mutates.
pub trait FormularyLookup: Send + Sync {
    /// All entries in formulary order.
    fn entries(&self) -> &[FormularyEntry];

    /// Exact, case-insensitive match on the generic key.
    fn get_by_generic_name(&self, name: &str) -> Option<&FormularyEntry> {
        let lower = name.to_lowercase();
        self.entries().iter().find(|e| e.key.to_lowercase() == lower)
    }

    /// Brands of a generic, or an empty slice when the generic is unknown.
    fn get_brands_for_generic(&self, name: &str) -> &[BrandRecord] {
        self.get_by_generic_name(name)
            .map(|e| e.brands.as_slice())
            .unwrap_or(&[])
    }

    fn get_brand_details(&self, generic_name: &str, brand_name: &str) -> Option<&BrandRecord> {
        self.get_by_generic_name(generic_name)?.find_brand(brand_name)
    }

    /// Case-insensitive substring search over generic keys and brand names.
    ///
    /// Per entry: one hit if the key matches, then one hit per matching brand.
    fn search_all(&self, query: &str) -> Vec<SearchHit<'_>> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();

        for entry in self.entries() {
            if entry.key.to_lowercase().contains(&needle) {
                hits.push(SearchHit {
                    generic_key: &entry.key,
                    brand: None,
                    entry,
                });
            }
            for brand in &entry.brands {
                if brand.name.to_lowercase().contains(&needle) {
                    hits.push(SearchHit {
                        generic_key: &entry.key,
                        brand: Some(&brand.name),
                        entry,
                    });
                }
            }
        }

        hits
    }
}

/// In-memory formulary keyed by lowercase generic name.
#[derive(Debug, Clone)]
pub struct Formulary {
    entries: Vec<FormularyEntry>,
    index: HashMap<String, usize>,
}

impl Formulary {
    /// Build a formulary, rejecting duplicate generic keys and brandless entries.
    pub fn new(entries: Vec<FormularyEntry>) -> Result<Self, FormularyError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.brands.is_empty() {
                return Err(FormularyError::NoBrands(entry.key.clone()));
            }
            if index.insert(entry.key.to_lowercase(), i).is_some() {
                return Err(FormularyError::DuplicateGeneric(entry.key.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, FormularyError> {
        let entries: Vec<FormularyEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a formulary JSON file.
    pub fn load(path: &Path) -> Result<Self, FormularyError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| FormularyError::Load(path.display().to_string(), e.to_string()))?;
        let formulary = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            entries = formulary.len(),
            "Formulary loaded"
        );

        Ok(formulary)
    }

    /// The formulary shipped with the crate.
    pub fn bundled() -> Result<Self, FormularyError> {
        Self::from_json(BUNDLED_FORMULARY)
    }

    /// Load from `path` when given, otherwise fall back to the bundled data.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self, FormularyError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::bundled(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FormularyLookup for Formulary {
    fn entries(&self) -> &[FormularyEntry] {
        &self.entries
    }

    fn get_by_generic_name(&self, name: &str) -> Option<&FormularyEntry> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&i| self.entries.get(i))
    }
}
