use std::sync::LazyLock;

use regex::Regex;

use super::types::{ParsedLine, DEFAULT_FREQUENCY};
use super::vocabulary::Vocabulary;

/// Abbreviation or phrase -> normalized frequency. First listed match wins.
const FREQUENCY_TABLE: &[(&str, &str)] = &[
    ("OD", "Once daily"),
    ("BD", "Twice daily"),
    ("TDS", "Thrice daily"),
    ("QID", "Four times daily"),
    ("1-1-1", "Thrice daily"),
    ("1-0-1", "Twice daily"),
    ("ONCE", "Once daily"),
    ("TWICE", "Twice daily"),
    ("THRICE", "Thrice daily"),
];

static RE_LEADING_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z]+(?:\s+[a-zA-Z]+)?)").unwrap());
static RE_DOSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(mg|g|ml|tablet|cap)").unwrap());
static RE_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(day|week|month|yr|years?)").unwrap());

static DEFAULT_PARSER: LazyLock<LineParser> = LazyLock::new(LineParser::default);

/// First character upper-case, the rest lower-case.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// First number followed by a dosage unit, concatenated ("500 mg" -> "500mg").
pub fn extract_dosage(text: &str) -> Option<String> {
    let caps = RE_DOSAGE.captures(text)?;
    Some(format!("{}{}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Normalized frequency phrase; falls back to "Daily", then "Once daily".
pub fn extract_frequency(text: &str) -> &'static str {
    let upper = text.to_uppercase();

    if let Some(&(_, normalized)) = FREQUENCY_TABLE
        .iter()
        .find(|(pattern, _)| upper.contains(pattern))
    {
        return normalized;
    }

    if upper.contains("DAILY") {
        return "Daily";
    }

    DEFAULT_FREQUENCY
}

/// First number followed by a time unit, with the unit pluralised ("1 week" -> "1 weeks").
pub fn extract_duration(text: &str) -> Option<String> {
    let caps = RE_DURATION.captures(text)?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    let unit = if unit.ends_with('s') {
        unit
    } else {
        format!("{unit}s")
    };
    Some(format!("{} {}", caps.get(1)?.as_str(), unit))
}

/// Turns free prescription text into candidate medicine records.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    vocabulary: Vocabulary,
}

impl LineParser {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Vocabulary match anywhere in the line (Title Case), else the first one
    /// or two alphabetic words at the start of the line.
    pub fn extract_medicine_name(&self, text: &str) -> Option<String> {
        let upper = text.to_uppercase();
        if let Some(name) = self.vocabulary.find_in(&upper) {
            return Some(title_case(name));
        }

        RE_LEADING_WORDS
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    /// Parse one line; `None` when no medicine name can be found.
    pub fn parse_line(&self, line: &str) -> Option<ParsedLine> {
        let name = self.extract_medicine_name(line)?;

        Some(ParsedLine {
            name,
            dosage: extract_dosage(line),
            frequency: extract_frequency(line).to_string(),
            duration: extract_duration(line),
            raw_line: line.to_string(),
        })
    }

    /// Parse every non-blank line. `None` when no line yields a record.
    pub fn parse_text(&self, text: &str) -> Option<Vec<ParsedLine>> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let medicines: Vec<ParsedLine> = lines.iter().filter_map(|l| self.parse_line(l)).collect();

        let dropped = lines.len() - medicines.len();
        if dropped > 0 {
            tracing::debug!(
                lines = lines.len(),
                dropped,
                "Lines without a recognisable medicine name were skipped"
            );
        }

        if medicines.is_empty() {
            None
        } else {
            Some(medicines)
        }
    }
}

/// `LineParser::extract_medicine_name` with the default vocabulary.
pub fn extract_medicine_name(text: &str) -> Option<String> {
    DEFAULT_PARSER.extract_medicine_name(text)
}

/// `LineParser::parse_line` with the default vocabulary.
pub fn parse_medicine_line(line: &str) -> Option<ParsedLine> {
    DEFAULT_PARSER.parse_line(line)
}

/// `LineParser::parse_text` with the default vocabulary.
pub fn smart_parse_medicine_text(text: &str) -> Option<Vec<ParsedLine>> {
    DEFAULT_PARSER.parse_text(text)
}
