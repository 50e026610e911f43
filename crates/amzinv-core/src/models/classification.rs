//! Invoice layout and language classification results.

use serde::{Deserialize, Serialize};

/// Structural invoice-layout family, independent of language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceFormat {
    /// Plain consumer order summary (single price column).
    ConsumerStandard,
    /// EU consumer invoice with VAT-inclusive pricing and a VAT summary block.
    ConsumerEuVatInclusive,
    /// Business invoice with ex-VAT unit prices and itemized VAT.
    BusinessExVat,
    /// No signature scored above the minimum; generic parsing applies.
    Unknown,
}

impl InvoiceFormat {
    /// Business layouts report ex-VAT prices as the primary price column.
    pub fn is_business(&self) -> bool {
        matches!(self, InvoiceFormat::BusinessExVat)
    }
}

/// Outcome of format classification.
///
/// `confidence` is the winning score normalized to [0, 1]; it is a
/// strength-of-match heuristic, not a probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatClassification {
    pub format: InvoiceFormat,
    pub confidence: f32,
}

/// Supported language + region variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English (US baseline; also the global fallback).
    En,
    /// English (United Kingdom).
    EnGb,
    /// English (Canada).
    EnCa,
    /// English (Australia).
    EnAu,
    /// German (Germany).
    De,
    /// German (Switzerland).
    DeCh,
    /// French.
    Fr,
    /// Spanish.
    Es,
    /// Italian.
    It,
    /// Japanese.
    Ja,
}

impl Language {
    /// BCP-47-style tag for display and logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::EnGb => "en-GB",
            Language::EnCa => "en-CA",
            Language::EnAu => "en-AU",
            Language::De => "de-DE",
            Language::DeCh => "de-CH",
            Language::Fr => "fr-FR",
            Language::Es => "es-ES",
            Language::It => "it-IT",
            Language::Ja => "ja-JP",
        }
    }
}

/// Outcome of language detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetectionResult {
    pub language: Language,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_serialization() {
        let json = serde_json::to_string(&InvoiceFormat::BusinessExVat).unwrap();
        assert_eq!(json, "\"business_ex_vat\"");
    }

    #[test]
    fn test_language_tag() {
        assert_eq!(Language::De.tag(), "de-DE");
        assert_eq!(Language::EnAu.tag(), "en-AU");
    }

    #[test]
    fn test_is_business() {
        assert!(InvoiceFormat::BusinessExVat.is_business());
        assert!(!InvoiceFormat::ConsumerEuVatInclusive.is_business());
    }
}
