//! Error recovery: categorization, partial extraction and remediation
//! suggestions.
//!
//! Invoked only when the normal pipeline raises, never for records that
//! merely validate poorly. Partial extraction works directly against
//! lightly normalized text, bypassing format and language dispatch —
//! the dispatch is what just failed.

use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CategorizedError, ErrorKind, Severity};
use crate::models::config::RecoveryConfig;
use crate::models::invoice::{
    ExtractionMetadata, FieldConfidence, FieldFailure, FieldFailureKind, InvoiceRecord,
    RecoveryMode,
};
use crate::parsers::patterns::{ISO_DATE, ORDER_NUMBER_ANY};
use crate::preprocess::normalize;

lazy_static! {
    // Defensive, locale-agnostic patterns for the partial extractor.
    static ref ANY_AMOUNT: Regex = Regex::new(
        r"(\d{1,3}(?:[ .,]\d{3})*[.,]\d{2})"
    ).unwrap();

    static ref ANY_TOTAL_LABEL: Regex = Regex::new(
        r"(?i)grand\s+total|order\s+total|montant\s+total|importe\s+total|gesamtbetrag|\btotal\b|\btotale\b|\bsumme\b|合計"
    ).unwrap();

    static ref ANY_SUBTOTAL_LABEL: Regex = Regex::new(
        r"(?i)subtotal|sous-total|zwischensumme|subtotale|小計"
    ).unwrap();

    static ref ANY_NUMERIC_DATE: Regex = Regex::new(
        r"\b(\d{1,2})[./](\d{1,2})[./](\d{4})\b"
    ).unwrap();

    static ref ANY_CURRENCY: Regex = Regex::new(
        r"€|£|\$|CHF|[¥￥]|円|\bEUR\b|\bGBP\b|\bUSD\b|\bJPY\b"
    ).unwrap();
}

/// A remediation step, ordered by priority (1 = first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverySuggestion {
    pub action: String,
    pub priority: u8,
}

/// Pattern-match an error message into the fixed taxonomy.
pub fn categorize(message: &str, context: &str) -> CategorizedError {
    let lower = message.to_lowercase();

    let (kind, level, recoverable, suggestion) = if lower.contains("no such file")
        || lower.contains("file not found")
        || lower.contains("permission denied")
        || lower.contains("cannot open")
        || lower.contains("access denied")
    {
        (
            ErrorKind::FileAccessError,
            Severity::Critical,
            false,
            "Check that the source file exists and is readable",
        )
    } else if lower.contains("pdf") || lower.contains("encrypted") || lower.contains("damaged") {
        (
            ErrorKind::PdfParsingError,
            Severity::Recoverable,
            true,
            "Re-export the source document and re-run text extraction",
        )
    } else if lower.contains("extract")
        || lower.contains("no invoice data")
        || lower.contains("empty input")
        || lower.contains("parse")
        || lower.contains("field")
    {
        (
            ErrorKind::FieldExtractionError,
            Severity::Recoverable,
            true,
            "Use the partially extracted fields and review the missing ones manually",
        )
    } else if lower.contains("validation") || lower.contains("mismatch") {
        (
            ErrorKind::ValidationWarning,
            Severity::Info,
            true,
            "Review the flagged amounts against the source document",
        )
    } else {
        (
            ErrorKind::UnknownError,
            Severity::Recoverable,
            true,
            "Retry with partial extraction and review the result",
        )
    };

    CategorizedError {
        kind,
        level,
        message: message.to_string(),
        context: context.to_string(),
        recoverable,
        suggestion: suggestion.to_string(),
    }
}

fn partial_order_date(text: &str) -> Option<chrono::NaiveDate> {
    for caps in ISO_DATE.captures_iter(text) {
        let parsed = (|| {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            chrono::NaiveDate::from_ymd_opt(year, month, day)
        })();
        if parsed.is_some() {
            return parsed;
        }
    }

    for caps in ANY_NUMERIC_DATE.captures_iter(text) {
        let parsed = (|| {
            let a: u32 = caps[1].parse().ok()?;
            let b: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;
            // Day-first unless the first group can only be a month.
            if a > 12 {
                chrono::NaiveDate::from_ymd_opt(year, b, a)
            } else if b > 12 {
                chrono::NaiveDate::from_ymd_opt(year, a, b)
            } else {
                chrono::NaiveDate::from_ymd_opt(year, b, a)
            }
        })();
        if parsed.is_some() {
            return parsed;
        }
    }

    None
}

fn parse_flexible_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // The last separator is the decimal one.
        match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            _ => cleaned.replace(',', ""),
        }
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

fn partial_total(text: &str) -> Option<Decimal> {
    for line in text.lines() {
        if ANY_SUBTOTAL_LABEL.is_match(line) || !ANY_TOTAL_LABEL.is_match(line) {
            continue;
        }
        if let Some(m) = ANY_AMOUNT.captures_iter(line).last() {
            if let Some(value) = parse_flexible_amount(&m[1]) {
                return Some(value);
            }
        }
    }
    None
}

/// Best-effort re-extraction of the critical fields after a failure.
///
/// Every found field gets confidence 1.0, every missing one confidence
/// 0.0 plus a failure entry. The record is usable iff both order number
/// and order date cleared the configured threshold.
pub fn extract_partial(
    raw_text: &str,
    original: &CategorizedError,
    config: &RecoveryConfig,
) -> InvoiceRecord {
    let text = normalize(raw_text);

    let mut fields: HashMap<String, f32> = HashMap::new();
    let mut failures: Vec<FieldFailure> = Vec::new();

    let mut found = |name: &str, hit: bool, failures: &mut Vec<FieldFailure>| {
        fields.insert(name.to_string(), if hit { 1.0 } else { 0.0 });
        if !hit {
            failures.push(FieldFailure {
                field: name.to_string(),
                kind: FieldFailureKind::FieldNotFound,
            });
        }
    };

    let order_number = ORDER_NUMBER_ANY
        .captures(&text)
        .map(|caps| caps[1].to_string());
    found("order_number", order_number.is_some(), &mut failures);

    let order_date = partial_order_date(&text);
    found("order_date", order_date.is_some(), &mut failures);

    let total = partial_total(&text);
    found("total", total.is_some(), &mut failures);

    let currency = ANY_CURRENCY
        .find(&text)
        .map(|m| crate::parsers::patterns::currency_code(m.as_str()).to_string());
    found("currency", currency.is_some(), &mut failures);

    let overall = if fields.is_empty() {
        0.0
    } else {
        fields.values().sum::<f32>() / fields.len() as f32
    };

    let usable = fields.get("order_number").copied().unwrap_or(0.0) >= config.usable_threshold
        && fields.get("order_date").copied().unwrap_or(0.0) >= config.usable_threshold;

    debug!(
        "partial recovery after {:?}: overall confidence {:.2}, usable {}",
        original.kind, overall, usable
    );

    let mut record = InvoiceRecord::new();
    record.order_number = order_number;
    record.order_date = order_date;
    record.total = total;
    record.currency = currency.unwrap_or_default();
    record.extraction_metadata = Some(ExtractionMetadata {
        mode: RecoveryMode::PartialRecovery,
        confidence: FieldConfidence { overall, fields },
        errors: failures,
        recovery_attempted: true,
        usable,
    });
    record
}

/// Ordered remediation suggestions for a categorized failure.
///
/// High-confidence partial data leads; unrecoverable categories get
/// infrastructure remediation; unknown kinds always end with the generic
/// use-extracted-data action.
pub fn suggestions(
    error: &CategorizedError,
    partial: Option<&InvoiceRecord>,
) -> Vec<RecoverySuggestion> {
    let mut out: Vec<RecoverySuggestion> = Vec::new();

    let overall = partial
        .and_then(|r| r.extraction_metadata.as_ref())
        .map(|m| m.confidence.overall)
        .unwrap_or(0.0);

    if overall >= 0.5 {
        out.push(RecoverySuggestion {
            action: "use_partial_data".to_string(),
            priority: 1,
        });
    }

    match error.kind {
        ErrorKind::FileAccessError => {
            out.push(RecoverySuggestion {
                action: "check_permissions".to_string(),
                priority: 1,
            });
            out.push(RecoverySuggestion {
                action: "verify_path".to_string(),
                priority: 2,
            });
        }
        ErrorKind::PdfParsingError => {
            out.push(RecoverySuggestion {
                action: "reextract_source_text".to_string(),
                priority: 2,
            });
            out.push(RecoverySuggestion {
                action: "manual_review".to_string(),
                priority: 3,
            });
        }
        ErrorKind::FieldExtractionError => {
            out.push(RecoverySuggestion {
                action: "manual_review".to_string(),
                priority: 2,
            });
        }
        ErrorKind::ValidationWarning => {
            out.push(RecoverySuggestion {
                action: "review_flagged_amounts".to_string(),
                priority: 2,
            });
        }
        ErrorKind::UnknownError => {
            out.push(RecoverySuggestion {
                action: "use_extracted_data".to_string(),
                priority: 2,
            });
            out.push(RecoverySuggestion {
                action: "manual_review".to_string(),
                priority: 3,
            });
        }
    }

    if !error.recoverable && out.iter().all(|s| s.action != "manual_review") {
        warn!("unrecoverable {:?} error: {}", error.kind, error.message);
    }

    out.sort_by_key(|s| s.priority);
    out
}
