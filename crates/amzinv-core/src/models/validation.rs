//! Validation result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Severity;

/// Kinds of validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Line items and declared subtotal disagree beyond the critical bound.
    ItemSubtotalMismatch,
    /// Line items and declared subtotal disagree within the warning band.
    MinorDiscrepancy,
    /// A single item price exceeds the plausibility bound.
    SuspiciousPrice,
    /// A single item price exceeds the corruption bound.
    PriceCorrupted,
    /// Quantity times unit price disagrees with the line total.
    LineTotalMismatch,
    /// Subtotal, shipping and tax do not reconcile with the grand total.
    TotalMismatch,
    /// Order number could not be extracted.
    MissingOrderNumber,
    /// Order date could not be extracted.
    MissingOrderDate,
    /// Soft note carried over from the extraction stage.
    ExtractionNote,
}

/// Numeric context for a finding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IssueDetails {
    /// Declared value from the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Decimal>,

    /// Value computed from extracted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Decimal>,

    /// Absolute difference between the two.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrepancy: Option<Decimal>,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<IssueDetails>,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: IssueDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Outcome of validating an extracted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Critical findings. Any entry here makes the record invalid.
    pub errors: Vec<ValidationIssue>,

    /// Non-critical findings.
    pub warnings: Vec<ValidationIssue>,

    /// 100 minus fixed penalties per finding, floored at 0.
    pub score: u8,

    /// False iff any critical error is present.
    pub is_valid: bool,
}

impl ValidationResult {
    /// A clean result with no findings.
    pub fn clean() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            score: 100,
            is_valid: true,
        }
    }

    /// Findings of a given kind across errors and warnings.
    pub fn findings_of(&self, kind: IssueKind) -> Vec<&ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(|i| i.kind == kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_serialization() {
        let json = serde_json::to_string(&IssueKind::ItemSubtotalMismatch).unwrap();
        assert_eq!(json, "\"item_subtotal_mismatch\"");
    }

    #[test]
    fn test_clean_result() {
        let result = ValidationResult::clean();
        assert!(result.is_valid);
        assert_eq!(result.score, 100);
    }
}
