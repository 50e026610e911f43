//! Core library for Amazon invoice extraction.
//!
//! This crate provides:
//! - Text normalization for raw PDF-extractor output
//! - Invoice format and language classification across a dozen
//!   language/region variants
//! - Locale-aware field extraction (order number, dates, line items,
//!   totals) with containment of OCR digit-merge corruption
//! - A confidence-scored validation engine
//! - Error recovery with partial extraction and remediation suggestions
//!
//! The pipeline consumes one UTF-8 string per invoice and produces one
//! [`InvoiceRecord`]; it performs no I/O and holds no state across
//! invoices, so batches parallelize trivially.

pub mod classify;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod preprocess;
pub mod recovery;
pub mod validation;

pub use error::{CategorizedError, ErrorKind, ExtractionError, Result, Severity};
pub use models::classification::{
    FormatClassification, InvoiceFormat, Language, LanguageDetectionResult,
};
pub use models::config::PipelineConfig;
pub use models::invoice::{
    ExtractionMetadata, FieldConfidence, FieldFailure, FieldFailureKind, InvoiceRecord, LineItem,
    RecoveryMode,
};
pub use models::validation::{IssueDetails, IssueKind, ValidationIssue, ValidationResult};
pub use parsers::{ExtractionOutcome, LocaleParser, ParserFactory};
pub use pipeline::InvoicePipeline;
pub use preprocess::normalize;
pub use recovery::RecoverySuggestion;
pub use validation::ValidationEngine;
