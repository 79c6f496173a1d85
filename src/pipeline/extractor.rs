//! Text extraction seam.
//!
//! OCR and PDF readers live outside this crate; they plug in through
//! `TextExtractor`. `PlainTextExtractor` covers already-textual uploads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,

    #[error("Extraction failed: {0}")]
    Failed(String),
}

/// Turns an uploaded payload into plain text.
///
/// Implementations are synchronous and may block; the analyzer runs them on
/// tokio's blocking pool.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str {
        "extractor"
    }
}

/// UTF-8 payloads, read as-is apart from sanitizing.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text =
            std::str::from_utf8(bytes).map_err(|e| ExtractionError::EncodingError(e.to_string()))?;

        let sanitized = sanitize_extracted_text(text);

        tracing::debug!(
            bytes = bytes.len(),
            text_length = sanitized.len(),
            "PlainTextExtractor: extraction complete"
        );

        Ok(sanitized)
    }

    fn name(&self) -> &'static str {
        "plain_text"
    }
}

/// Strips control characters, trims each line and drops blank lines.
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_text_passes_through() {
        let text = PlainTextExtractor
            .extract("Calpol 500mg BD\nBrufen 400mg TDS".as_bytes())
            .unwrap();
        assert_eq!(text, "Calpol 500mg BD\nBrufen 400mg TDS");
    }

    #[test]
    fn invalid_utf8_is_encoding_error() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractionError::EncodingError(_)));
    }

    #[test]
    fn byte_order_mark_is_dropped() {
        let text = PlainTextExtractor.extract(b"\xEF\xBB\xBFDolo 650mg").unwrap();
        assert_eq!(text, "Dolo 650mg");
    }

    #[test]
    fn sanitize_handles_crlf_and_blank_lines() {
        let cleaned = sanitize_extracted_text("  Calpol 500mg \r\n\r\n\u{0007}Amoxil 250mg\n   \n");
        assert_eq!(cleaned, "Calpol 500mg\nAmoxil 250mg");
    }

    #[test]
    fn sanitize_keeps_medical_punctuation() {
        let cleaned = sanitize_extracted_text("Paracetamol 500mg - 1-0-1 x 5 days (after food)");
        assert_eq!(cleaned, "Paracetamol 500mg - 1-0-1 x 5 days (after food)");
    }
}
