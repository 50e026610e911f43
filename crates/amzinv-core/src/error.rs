//! Error types for the amzinv-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by whole-invoice extraction.
///
/// Individual field extractors never fail; they return `None` on absence.
/// Only the orchestrating `extract()` call surfaces one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The input text was empty after normalization.
    #[error("empty input text")]
    EmptyInput,

    /// No invoice data could be extracted (no items and no totals).
    #[error("no invoice data found")]
    NoData,
}

/// Severity of a categorized error or validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Processing cannot produce a usable result; no retry.
    Critical,
    /// Partial extraction or manual review can salvage the invoice.
    Recoverable,
    /// Informational; never blocks producing a result.
    Info,
}

/// Fixed error taxonomy used by the recovery subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller's access layer failed (file missing, unreadable).
    FileAccessError,
    /// Upstream text extraction produced unusable output.
    PdfParsingError,
    /// The parser could not extract required fields.
    FieldExtractionError,
    /// A validation check flagged the data.
    ValidationWarning,
    /// Anything not matched by the taxonomy.
    UnknownError,
}

/// An error classified into the recovery taxonomy, with a canned
/// remediation suggestion for downstream tooling.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct CategorizedError {
    /// Taxonomy bucket.
    pub kind: ErrorKind,

    /// Severity level; `Critical` means no invoice record is produced.
    pub level: Severity,

    /// Original error message.
    pub message: String,

    /// Caller-supplied context (source identifier, pipeline stage).
    pub context: String,

    /// Whether partial extraction should be attempted.
    pub recoverable: bool,

    /// Canned remediation hint.
    pub suggestion: String,
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
