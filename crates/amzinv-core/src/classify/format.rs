//! Heuristic invoice-layout classification.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::classification::{FormatClassification, InvoiceFormat};
use crate::models::config::ClassificationConfig;

struct FormatSignature {
    format: InvoiceFormat,
    pattern: Regex,
    weight: f32,
}

fn sig(format: InvoiceFormat, pattern: &str, weight: f32) -> FormatSignature {
    FormatSignature {
        format,
        pattern: Regex::new(pattern).unwrap(),
        weight,
    }
}

lazy_static! {
    /// Keyword/structure signatures per layout family. Strong signatures
    /// (weight 2.0) are phrasings unique to one family, like the dual
    /// ex-VAT/inc-VAT table header of business invoices.
    static ref SIGNATURES: Vec<FormatSignature> = vec![
        sig(
            InvoiceFormat::BusinessExVat,
            r"(?i)ohne\s+(?:USt|MwSt)|hors\s+taxes|prix\s+unitaire\s+HT|excl\.?\s+VAT|unit\s+price\s+\(excl",
            2.0,
        ),
        sig(
            InvoiceFormat::BusinessExVat,
            r"(?i)USt[-\s]?IdNr|VAT\s+registration|num[ée]ro\s+de\s+TVA|partita\s+IVA",
            2.0,
        ),
        sig(
            InvoiceFormat::BusinessExVat,
            r"(?i)Amazon\s+Business|Gesch[äa]ftskunden",
            2.0,
        ),
        sig(
            InvoiceFormat::BusinessExVat,
            r"(?i)\b(?:netto|HT)\b.{0,60}\b(?:brutto|TTC)\b",
            2.0,
        ),
        sig(
            InvoiceFormat::ConsumerEuVatInclusive,
            r"(?i)inkl\.?\s+MwSt|enthaltene\s+MwSt|TVA\s+incluse?|IVA\s+inclu(?:sa|ido)|VAT\s+included|\bTTC\b",
            2.0,
        ),
        sig(
            InvoiceFormat::ConsumerEuVatInclusive,
            r"(?i)MwSt[-\s]?Satz|taux\s+de\s+TVA|aliquota\s+IVA|tipo\s+de\s+IVA",
            1.0,
        ),
        sig(
            InvoiceFormat::ConsumerEuVatInclusive,
            r"(?i)\bRechnung\b|\bFacture\b|\bFattura\b|\bFactura\b",
            1.0,
        ),
        sig(
            InvoiceFormat::ConsumerStandard,
            r"(?i)Grand\s+Total|Order\s+Total|Total\s+for\s+this\s+shipment",
            2.0,
        ),
        sig(
            InvoiceFormat::ConsumerStandard,
            r"(?i)Items?\s+Ordered|Final\s+Details\s+for\s+Order",
            2.0,
        ),
        sig(InvoiceFormat::ConsumerStandard, r"請求書|領収書|注文内容", 2.0),
        sig(
            InvoiceFormat::ConsumerStandard,
            r"(?i)Sales\s+Tax|Estimated\s+Tax",
            1.0,
        ),
    ];

    /// Checked in this order; earlier formats win ties.
    static ref FORMAT_ORDER: [InvoiceFormat; 3] = [
        InvoiceFormat::BusinessExVat,
        InvoiceFormat::ConsumerEuVatInclusive,
        InvoiceFormat::ConsumerStandard,
    ];
}

/// Score the text against each layout family's signatures.
///
/// The highest-scoring format wins; below `format_min_score` the result
/// is `Unknown` and downstream parsing falls back to the generic family.
pub fn classify_format(text: &str, config: &ClassificationConfig) -> FormatClassification {
    let mut best = InvoiceFormat::Unknown;
    let mut best_score = 0.0f32;

    for format in FORMAT_ORDER.iter() {
        let score: f32 = SIGNATURES
            .iter()
            .filter(|s| s.format == *format && s.pattern.is_match(text))
            .map(|s| s.weight)
            .sum();
        if score > best_score {
            best = *format;
            best_score = score;
        }
    }

    if best_score < config.format_min_score {
        debug!("no format signature scored above minimum; classifying as unknown");
        return FormatClassification {
            format: InvoiceFormat::Unknown,
            confidence: 0.0,
        };
    }

    let confidence = (best_score / config.format_reference_score).min(1.0);
    debug!("classified format {:?} with confidence {:.2}", best, confidence);

    FormatClassification {
        format: best,
        confidence,
    }
}
