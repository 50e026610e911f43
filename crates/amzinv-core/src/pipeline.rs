//! End-to-end invoice processing pipeline.
//!
//! Normalize → classify format → detect language → format-specific
//! cleanup → parse → validate, with the recovery subsystem folded in on
//! recoverable failures. Processing one invoice is pure, synchronous and
//! CPU-bound; the pipeline shares nothing mutable between invoices, so a
//! single instance can serve concurrent batch workers.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::classify::{classify_format, detect_language};
use crate::error::CategorizedError;
use crate::models::classification::Language;
use crate::models::config::PipelineConfig;
use crate::models::invoice::InvoiceRecord;
use crate::parsers::ParserFactory;
use crate::preprocess::{format_specific, normalize};
use crate::recovery;
use crate::validation::ValidationEngine;

/// The extraction and validation pipeline for a single marketplace's
/// invoices.
pub struct InvoicePipeline {
    config: PipelineConfig,
    validator: ValidationEngine,
}

impl InvoicePipeline {
    /// Pipeline with default policy constants.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let validator = ValidationEngine::new(config.validation.clone());
        Self { config, validator }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one invoice's raw text.
    ///
    /// Returns a record for every recoverable outcome, including invalid
    /// ones (`validation.is_valid == false`) and partial recoveries
    /// (`extraction_metadata.usable` flags their quality). Only critical,
    /// unrecoverable failures surface as an error.
    pub fn process(&self, raw: &str) -> Result<InvoiceRecord, CategorizedError> {
        let start = Instant::now();

        let text = normalize(raw);

        let format = classify_format(&text, &self.config.classification);
        let detected = detect_language(&text, &self.config.classification);

        // Documented fallback: weak language signal selects the English
        // baseline parser rather than failing.
        let language = if detected.confidence < self.config.classification.language_fallback_threshold
        {
            debug!(
                "language confidence {:.2} below threshold; using English baseline",
                detected.confidence
            );
            Language::En
        } else {
            detected.language
        };

        let cleaned = format_specific::apply(&text, format.format);
        let parser = ParserFactory::select(format.format, language);

        match parser.extract(&cleaned, &self.config.extraction) {
            Ok(outcome) => {
                let mut record = outcome.record;
                record.validation = Some(self.validator.validate(&record, &outcome.warnings));
                info!(
                    "processed invoice {:?} in {}ms (score {})",
                    record.order_number,
                    start.elapsed().as_millis(),
                    record.validation.as_ref().map(|v| v.score).unwrap_or(0)
                );
                Ok(record)
            }
            Err(parse_error) => {
                let categorized = recovery::categorize(
                    &parse_error.to_string(),
                    &format!(
                        "parser {:?}/{:?}",
                        parser.format(),
                        parser.language()
                    ),
                );
                self.recover(&text, categorized)
            }
        }
    }

    /// Fold a categorized failure into the pipeline's result contract:
    /// recoverable errors yield a partial record with recovery metadata,
    /// critical ones propagate. Callers with access-layer failures (e.g.
    /// an unreadable upload) can invoke this directly with their error
    /// message.
    pub fn recover(
        &self,
        raw_text: &str,
        error: CategorizedError,
    ) -> Result<InvoiceRecord, CategorizedError> {
        if !error.recoverable {
            warn!("unrecoverable failure: {}", error.message);
            return Err(error);
        }

        debug!("attempting partial recovery after: {}", error.message);
        let mut record = recovery::extract_partial(raw_text, &error, &self.config.recovery);
        record.validation = Some(self.validator.validate(&record, &[]));
        Ok(record)
    }

    /// Categorize an externally raised error without processing text.
    /// Exposed for callers that own file and job lifecycles.
    pub fn categorize_failure(&self, message: &str, context: &str) -> CategorizedError {
        recovery::categorize(message, context)
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classification::InvoiceFormat;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const GERMAN_CONSUMER: &str = "Amazon.de\nRechnung\n\nBestellnummer: 302-4563851-9372615\nRechnungsdatum: 15. Dezember 2023\n\n1 x Logitech MX Master 3S Kabellose Maus\nASIN: B09HM94VDS\n155,32 €\n20%\n66,38 €66,38 €\n\nZwischensumme: 66,38 €\nVerpackung & Versand: 0,00 €\nEnthaltene MwSt.: 11,06 €\nGesamtbetrag: 66,38 €";

    #[test]
    fn test_end_to_end_german_consumer() {
        let pipeline = InvoicePipeline::new();
        let record = pipeline.process(GERMAN_CONSUMER).unwrap();

        assert_eq!(record.order_number.as_deref(), Some("302-4563851-9372615"));
        assert_eq!(record.items.len(), 1);
        assert_eq!(
            record.items[0].unit_price,
            Decimal::from_str("66.38").unwrap()
        );
        assert_eq!(record.currency, "EUR");

        let validation = record.validation.unwrap();
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_end_to_end_with_mojibake() {
        let raw = GERMAN_CONSUMER.replace('€', "â‚¬").replace('ä', "Ã¤");
        let pipeline = InvoicePipeline::new();
        let record = pipeline.process(&raw).unwrap();
        assert_eq!(
            record.items[0].unit_price,
            Decimal::from_str("66.38").unwrap()
        );
    }

    #[test]
    fn test_ocr_merged_quantities_are_contained() {
        // Three rows for one product, each with a quantity digit merged
        // into the price column.
        let text = "Rechnung\nBestellnummer: 302-4563851-9372615\nRechnungsdatum: 15.12.2023\n\nExterne Festplatte 2TB\nASIN: B07G3TKP2L\n1176,46 €176,46 €\nASIN: B07G3TKP2L\n176,46 €\n20%\n3176,46 €529,38 €\nASIN: B07G3TKP2L\n1176,46 €176,46 €\n\nZwischensumme: 891,66 €\nGesamtbetrag: 891,66 €";
        let pipeline = InvoicePipeline::new();
        let record = pipeline.process(text).unwrap();

        assert_eq!(record.items.len(), 3);
        for item in &record.items {
            assert_eq!(item.unit_price, Decimal::from_str("176.46").unwrap());
            assert!(item.unit_price < Decimal::new(1000, 0));
        }

        // Items sum to 529.38 + 2x176.46 = 882.30 against 891.66: the
        // mismatch surfaces instead of the inflated prices.
        let validation = record.validation.unwrap();
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 1);
    }

    #[test]
    fn test_recoverable_failure_yields_partial_record() {
        // No items and no totals, but the critical fields are present.
        let text = "Bestellnummer: 302-4563851-9372615\nRechnungsdatum: 15.12.2023\nkeine weiteren Angaben";
        let pipeline = InvoicePipeline::new();
        let record = pipeline.process(text).unwrap();

        let meta = record.extraction_metadata.expect("recovery metadata");
        assert!(meta.recovery_attempted);
        assert!(meta.usable);
        assert_eq!(record.order_number.as_deref(), Some("302-4563851-9372615"));
    }

    #[test]
    fn test_unusable_partial_record_is_flagged() {
        let pipeline = InvoicePipeline::new();
        let record = pipeline.process("complete garbage with no fields").unwrap();

        let meta = record.extraction_metadata.expect("recovery metadata");
        assert!(!meta.usable);
    }

    #[test]
    fn test_critical_failure_propagates() {
        let pipeline = InvoicePipeline::new();
        let error = pipeline.categorize_failure("file not found: upload.pdf", "upload");
        let result = pipeline.recover("", error);

        let propagated = result.unwrap_err();
        assert_eq!(propagated.level, crate::error::Severity::Critical);
        assert!(!propagated.recoverable);
    }

    #[test]
    fn test_language_fallback_never_raises() {
        // Amounts but no recognizable language signal.
        let text = "ASIN: B0B2QN9NQ1\n$23.99\n\nweird trailing content 17.00";
        let pipeline = InvoicePipeline::new();
        let result = pipeline.process(text);
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_format_still_parses() {
        let text = "Bestellnummer: 302-4563851-9372615\n15.12.2023\nASIN: B09HM94VDS\n66,38 €66,38 €";
        let config = PipelineConfig::default();
        let classification =
            classify_format(text, &config.classification);
        assert_eq!(classification.format, InvoiceFormat::Unknown);

        let record = InvoicePipeline::new().process(text).unwrap();
        assert_eq!(record.items.len(), 1);
    }

    #[test]
    fn test_pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InvoicePipeline>();
    }
}
