//! Structural and business-rule validation of extracted invoices.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Severity;
use crate::models::config::ValidationConfig;
use crate::models::invoice::InvoiceRecord;
use crate::models::validation::{IssueDetails, IssueKind, ValidationIssue, ValidationResult};

/// Runs the validation checks and computes the record's score.
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a record, folding in soft warnings from the extraction
    /// stage. The record is invalid iff a critical error is found.
    pub fn validate(&self, record: &InvoiceRecord, extraction_notes: &[String]) -> ValidationResult {
        let mut errors: Vec<ValidationIssue> = Vec::new();
        let mut warnings: Vec<ValidationIssue> = Vec::new();

        // Whole-yen prices run two orders of magnitude above decimal
        // currencies; the bounds scale with them.
        let scale = if record.currency == "JPY" {
            Decimal::from(100)
        } else {
            Decimal::ONE
        };

        self.check_subtotal(record, &mut errors, &mut warnings);
        self.check_prices(record, scale, &mut errors, &mut warnings);
        self.check_line_totals(record, &mut warnings);
        self.check_required_fields(record, &mut warnings);
        self.check_grand_total(record, &mut warnings);

        for note in extraction_notes {
            warnings.push(ValidationIssue::new(
                IssueKind::ExtractionNote,
                Severity::Info,
                note.clone(),
            ));
        }

        let mut score: i32 = 100;
        score -= errors.len() as i32 * self.config.critical_penalty as i32;
        for warning in &warnings {
            score -= match warning.severity {
                Severity::Recoverable => self.config.warning_penalty as i32,
                _ => self.config.info_penalty as i32,
            };
        }

        let is_valid = errors.is_empty();
        debug!(
            "validated invoice {:?}: {} errors, {} warnings, score {}",
            record.order_number,
            errors.len(),
            warnings.len(),
            score.clamp(0, 100)
        );

        ValidationResult {
            errors,
            warnings,
            score: score.clamp(0, 100) as u8,
            is_valid,
        }
    }

    /// Item-to-subtotal consistency, in three tiers: within rounding
    /// tolerance, minor discrepancy, critical mismatch. Digit-merge
    /// corruption that slipped through extraction lands in the critical
    /// tier by magnitude.
    fn check_subtotal(
        &self,
        record: &InvoiceRecord,
        errors: &mut Vec<ValidationIssue>,
        warnings: &mut Vec<ValidationIssue>,
    ) {
        let Some(subtotal) = record.subtotal else { return };
        if record.items.is_empty() {
            return;
        }

        let sum = record.items_total();
        let discrepancy = (sum - subtotal).abs();

        if discrepancy <= self.config.rounding_tolerance {
            return;
        }

        let details = IssueDetails {
            expected: Some(subtotal),
            actual: Some(sum),
            discrepancy: Some(discrepancy),
        };

        if discrepancy <= self.config.minor_discrepancy_bound {
            warnings.push(
                ValidationIssue::new(
                    IssueKind::MinorDiscrepancy,
                    Severity::Recoverable,
                    format!("items sum to {sum} against a declared subtotal of {subtotal}"),
                )
                .with_details(details),
            );
        } else {
            errors.push(
                ValidationIssue::new(
                    IssueKind::ItemSubtotalMismatch,
                    Severity::Critical,
                    format!(
                        "items sum to {sum} against a declared subtotal of {subtotal} (off by {discrepancy})"
                    ),
                )
                .with_details(details),
            );
        }
    }

    fn check_prices(
        &self,
        record: &InvoiceRecord,
        scale: Decimal,
        errors: &mut Vec<ValidationIssue>,
        warnings: &mut Vec<ValidationIssue>,
    ) {
        let suspect = self.config.price_suspect_bound * scale;
        let corrupt = self.config.price_corrupt_bound * scale;

        for item in &record.items {
            if item.unit_price > corrupt {
                errors.push(ValidationIssue::new(
                    IssueKind::PriceCorrupted,
                    Severity::Critical,
                    format!(
                        "unit price {} for '{}' is beyond the corruption bound",
                        item.unit_price, item.description
                    ),
                ));
            } else if item.unit_price > suspect {
                warnings.push(ValidationIssue::new(
                    IssueKind::SuspiciousPrice,
                    Severity::Recoverable,
                    format!(
                        "unit price {} for '{}' is suspiciously high",
                        item.unit_price, item.description
                    ),
                ));
            }
        }
    }

    /// Per-item invariant: total ≈ unit × quantity within tolerance.
    fn check_line_totals(&self, record: &InvoiceRecord, warnings: &mut Vec<ValidationIssue>) {
        for item in &record.items {
            let expected = item.unit_price * Decimal::from(item.quantity);
            if (expected - item.total_price).abs() > self.config.rounding_tolerance {
                warnings.push(ValidationIssue::new(
                    IssueKind::LineTotalMismatch,
                    Severity::Info,
                    format!(
                        "line total {} for '{}' differs from {} x {}",
                        item.total_price, item.description, item.quantity, item.unit_price
                    ),
                ));
            }
        }
    }

    /// Missing order number or date are recoverable signals, not
    /// invalidation by themselves.
    fn check_required_fields(&self, record: &InvoiceRecord, warnings: &mut Vec<ValidationIssue>) {
        if record.order_number.is_none() {
            warnings.push(ValidationIssue::new(
                IssueKind::MissingOrderNumber,
                Severity::Recoverable,
                "order number could not be extracted",
            ));
        }
        if record.order_date.is_none() {
            warnings.push(ValidationIssue::new(
                IssueKind::MissingOrderDate,
                Severity::Recoverable,
                "order date could not be extracted",
            ));
        }
    }

    /// Subtotal + shipping (+ tax, for ex-VAT layouts) should reconcile
    /// with the declared total. Both sums are accepted since the record
    /// does not carry its source layout.
    fn check_grand_total(&self, record: &InvoiceRecord, warnings: &mut Vec<ValidationIssue>) {
        let (Some(subtotal), Some(total)) = (record.subtotal, record.total) else {
            return;
        };

        let shipping = record.shipping.unwrap_or(Decimal::ZERO);
        let tax = record.tax.unwrap_or(Decimal::ZERO);

        let inclusive = subtotal + shipping;
        let exclusive = subtotal + shipping + tax;

        let gap = (inclusive - total)
            .abs()
            .min((exclusive - total).abs());

        if gap > self.config.rounding_tolerance {
            warnings.push(
                ValidationIssue::new(
                    IssueKind::TotalMismatch,
                    Severity::Info,
                    format!("declared total {total} does not reconcile with the summary lines"),
                )
                .with_details(IssueDetails {
                    expected: Some(total),
                    actual: Some(inclusive),
                    discrepancy: Some(gap),
                }),
            );
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::LineItem;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(unit: &str, qty: u32, total: &str) -> LineItem {
        LineItem {
            asin: Some("B07G3TKP2L".to_string()),
            description: "Item".to_string(),
            quantity: qty,
            unit_price: dec(unit),
            total_price: dec(total),
            currency: "EUR".to_string(),
        }
    }

    fn record_with(items: Vec<LineItem>, subtotal: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new();
        record.order_number = Some("302-4563851-9372615".to_string());
        record.order_date = NaiveDate::from_ymd_opt(2023, 12, 15);
        record.currency = "EUR".to_string();
        record.items = items;
        record.subtotal = Some(dec(subtotal));
        record
    }

    #[test]
    fn test_subtotal_mismatch_is_critical() {
        // Three clean items against a subtotal inflated by merged digits.
        let record = record_with(
            vec![
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
            ],
            "891.66",
        );

        let result = ValidationEngine::default().validate(&record, &[]);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.findings_of(IssueKind::ItemSubtotalMismatch).len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.kind, IssueKind::ItemSubtotalMismatch);
        assert_eq!(
            error.details.as_ref().unwrap().discrepancy,
            Some(dec("362.28"))
        );
    }

    #[test]
    fn test_minor_discrepancy_is_a_warning() {
        let record = record_with(
            vec![
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
            ],
            "529.50",
        );

        let result = ValidationEngine::default().validate(&record, &[]);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::MinorDiscrepancy);
    }

    #[test]
    fn test_gap_within_rounding_tolerance_is_silent() {
        let record = record_with(
            vec![
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
                item("176.46", 1, "176.46"),
            ],
            "529.48",
        );

        let result = ValidationEngine::default().validate(&record, &[]);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_suspicious_and_corrupted_prices() {
        let record = record_with(vec![item("1176.46", 1, "1176.46")], "1176.46");
        let result = ValidationEngine::default().validate(&record, &[]);
        assert!(result.is_valid);
        assert_eq!(result.warnings[0].kind, IssueKind::SuspiciousPrice);

        let record = record_with(vec![item("11764.60", 1, "11764.60")], "11764.60");
        let result = ValidationEngine::default().validate(&record, &[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, IssueKind::PriceCorrupted);
    }

    #[test]
    fn test_yen_prices_not_flagged() {
        let mut record = record_with(vec![item("8980", 1, "8980")], "8980");
        record.currency = "JPY".to_string();
        for i in &mut record.items {
            i.currency = "JPY".to_string();
        }

        let result = ValidationEngine::default().validate(&record, &[]);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_critical_fields_are_recoverable_warnings() {
        let mut record = record_with(vec![item("23.99", 1, "23.99")], "23.99");
        record.order_number = None;
        record.order_date = None;

        let result = ValidationEngine::default().validate(&record, &[]);

        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_line_total_mismatch_is_informational() {
        let record = record_with(vec![item("176.46", 3, "176.46")], "176.46");
        let result = ValidationEngine::default().validate(&record, &[]);

        assert!(result.is_valid);
        assert_eq!(result.warnings[0].kind, IssueKind::LineTotalMismatch);
    }

    #[test]
    fn test_grand_total_reconciliation() {
        let mut record = record_with(vec![item("23.99", 1, "23.99")], "23.99");
        record.shipping = Some(dec("5.99"));
        record.tax = Some(dec("2.40"));
        record.total = Some(dec("32.38"));

        let result = ValidationEngine::default().validate(&record, &[]);
        assert!(result.warnings.is_empty());

        record.total = Some(dec("99.99"));
        let result = ValidationEngine::default().validate(&record, &[]);
        assert_eq!(result.warnings[0].kind, IssueKind::TotalMismatch);
    }

    #[test]
    fn test_score_floor() {
        let mut record = InvoiceRecord::new();
        record.currency = "EUR".to_string();
        record.items = vec![
            item("11764.60", 1, "11764.60"),
            item("12764.60", 1, "12764.60"),
            item("13764.60", 1, "13764.60"),
            item("14764.60", 1, "14764.60"),
            item("15764.60", 1, "15764.60"),
        ];
        record.subtotal = Some(dec("1.00"));

        let result = ValidationEngine::default().validate(&record, &[]);
        assert_eq!(result.score, 0);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_extraction_notes_become_info_warnings() {
        let record = record_with(vec![item("23.99", 1, "23.99")], "23.99");
        let notes = vec!["suspected merged digits in price 1176.46".to_string()];

        let result = ValidationEngine::default().validate(&record, &notes);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::ExtractionNote);
        assert_eq!(result.score, 95);
    }
}
