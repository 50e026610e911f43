//! Invoice data models produced by the extraction pipeline.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::ValidationResult;

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Marketplace product identifier, when present near the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,

    /// Product description.
    pub description: String,

    /// Quantity ordered (at least 1).
    pub quantity: u32,

    /// Reported unit price. VAT-inclusive for consumer invoices,
    /// ex-VAT for business invoices.
    pub unit_price: Decimal,

    /// VAT-inclusive line total.
    pub total_price: Decimal,

    /// ISO-4217-like currency code.
    pub currency: String,
}

/// A complete extracted invoice.
///
/// Created by a parser's `extract()` call; the validation engine attaches
/// its result afterwards. Nothing here outlives the processing of one
/// invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Marketplace order number (e.g. `302-4563851-9372615`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Order or invoice date, normalized to a canonical date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    /// Issuing vendor.
    pub vendor: String,

    /// Line items in document order. Repeated identical rows are kept
    /// separate so validation can surface subtotal mismatches.
    pub items: Vec<LineItem>,

    /// Declared item subtotal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Shipping and handling charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Decimal>,

    /// Tax amount (VAT, GST, sales tax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Declared grand total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// ISO-4217-like currency code; empty when undetermined.
    pub currency: String,

    /// Attached by the validation engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,

    /// Present only when the record was produced by error recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_metadata: Option<ExtractionMetadata>,
}

impl InvoiceRecord {
    /// Create an empty record for the marketplace vendor.
    pub fn new() -> Self {
        Self {
            order_number: None,
            order_date: None,
            vendor: "Amazon".to_string(),
            items: Vec::new(),
            subtotal: None,
            shipping: None,
            tax: None,
            total: None,
            currency: String::new(),
            validation: None,
            extraction_metadata: None,
        }
    }

    /// Sum of line-item totals.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Whether the record carries any extracted data at all.
    pub fn is_empty(&self) -> bool {
        self.order_number.is_none()
            && self.order_date.is_none()
            && self.items.is_empty()
            && self.subtotal.is_none()
            && self.total.is_none()
    }
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// How a recovered record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    /// Best-effort re-extraction of critical fields after a parser failure.
    PartialRecovery,
}

/// Why a field is absent from a recovered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFailureKind {
    /// No pattern matched the field.
    FieldNotFound,
    /// A pattern matched but the value could not be parsed.
    #[serde(rename = "extraction_error")]
    ExtractionFailed,
}

/// A field the recovery extractor could not produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    pub field: String,
    pub kind: FieldFailureKind,
}

/// Per-field confidence of a recovered record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConfidence {
    /// Mean of the per-field confidences.
    pub overall: f32,

    /// Field name to confidence in [0, 1].
    pub fields: HashMap<String, f32>,
}

/// Metadata attached to records produced by the recovery subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub mode: RecoveryMode,

    /// Field-level confidence scores.
    pub confidence: FieldConfidence,

    /// Fields that could not be extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldFailure>,

    pub recovery_attempted: bool,

    /// True when both critical fields (order number and order date) were
    /// recovered with sufficient confidence.
    pub usable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(total: &str) -> LineItem {
        LineItem {
            asin: Some("B000000000".to_string()),
            description: "Item".to_string(),
            quantity: 1,
            unit_price: Decimal::from_str(total).unwrap(),
            total_price: Decimal::from_str(total).unwrap(),
            currency: "EUR".to_string(),
        }
    }

    #[test]
    fn test_items_total() {
        let mut record = InvoiceRecord::new();
        record.items.push(item("176.46"));
        record.items.push(item("176.46"));
        record.items.push(item("176.46"));
        assert_eq!(record.items_total(), Decimal::from_str("529.38").unwrap());
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = InvoiceRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.vendor, "Amazon");
    }

    #[test]
    fn test_field_failure_kind_serialization() {
        let json = serde_json::to_string(&FieldFailureKind::FieldNotFound).unwrap();
        assert_eq!(json, "\"field_not_found\"");
        let json = serde_json::to_string(&FieldFailureKind::ExtractionFailed).unwrap();
        assert_eq!(json, "\"extraction_error\"");
    }
}
