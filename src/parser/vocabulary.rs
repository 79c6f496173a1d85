use std::path::Path;

use thiserror::Error;

/// Seed list of medicine and brand names recognised anywhere in a line.
/// Order matters: the first listed name found in a line wins.
const DEFAULT_NAMES: &[&str] = &[
    "PARACETAMOL",
    "IBUPROFEN",
    "ASPIRIN",
    "AMOXICILLIN",
    "CALPOL",
    "TYLENOL",
    "BRUFEN",
    "COMBIFLAM",
    "DOLO",
    "AMOXIL",
    "AMOXYCARE",
    "ACETAMINOPHEN",
    "PENICILLIN",
    "METFORMIN",
    "OMEPRAZOLE",
    "ATORVASTATIN",
];

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Vocabulary load failed ({0}): {1}")]
    Load(String, String),
}

/// Swappable word list used for name extraction. Stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    names: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_words(DEFAULT_NAMES.iter().copied())
    }
}

impl Vocabulary {
    /// Build from arbitrary words; blanks are dropped, order is kept.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { names }
    }

    /// Load a newline-separated word list. `#` starts a comment line.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VocabularyError::Load(path.display().to_string(), e.to_string()))?;
        let vocabulary = Self::from_words(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );

        tracing::info!(
            path = %path.display(),
            words = vocabulary.len(),
            "Vocabulary loaded"
        );

        Ok(vocabulary)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, VocabularyError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// First vocabulary word contained in `upper_text` (already upper-cased).
    pub fn find_in(&self, upper_text: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| upper_text.contains(name.as_str()))
            .map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_vocabulary_seeds_sixteen_names() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.len(), 16);
        assert_eq!(vocab.names()[0], "PARACETAMOL");
    }

    #[test]
    fn from_words_uppercases_and_drops_blanks() {
        let vocab = Vocabulary::from_words(["warfarin", "  ", " Digoxin "]);
        assert_eq!(vocab.names(), &["WARFARIN".to_string(), "DIGOXIN".to_string()]);
    }

    #[test]
    fn find_in_prefers_list_order() {
        let vocab = Vocabulary::default();
        // CALPOL appears first in the text, but PARACETAMOL is listed first.
        assert_eq!(vocab.find_in("CALPOL (PARACETAMOL) 500MG"), Some("PARACETAMOL"));
    }

    #[test]
    fn find_in_no_match() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.find_in("VITAMIN D3 1000IU"), None);
    }

    #[test]
    fn load_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# fixture lexicon").unwrap();
        writeln!(file, "warfarin").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "digoxin").unwrap();
        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.names(), &["WARFARIN".to_string(), "DIGOXIN".to_string()]);
    }

    #[test]
    fn load_missing_file_errors() {
        let err = Vocabulary::load(Path::new("/nonexistent/vocab.txt")).unwrap_err();
        assert!(err.to_string().contains("vocab.txt"));
    }
}
