//! Locale parsers and the factory that selects them.
//!
//! One parser exists per supported (format, language) pair, all built on
//! the shared machinery in [`base`]. Selection is a pure function over a
//! static registry, so a parser always exists for any classification
//! outcome.

pub mod base;
pub mod english;
pub mod french;
pub mod german;
pub mod italian;
pub mod japanese;
pub mod patterns;
pub mod profile;
pub mod spanish;

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::models::classification::{InvoiceFormat, Language, LanguageDetectionResult};
use crate::models::config::{ClassificationConfig, ExtractionConfig};
use crate::models::invoice::{InvoiceRecord, LineItem};

use profile::LocaleProfile;

/// Result of a parser's `extract()` call, before validation.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Extracted invoice data.
    pub record: InvoiceRecord,
    /// Soft extraction warnings (fallbacks taken, fields not found).
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Contract shared by every locale parser.
///
/// Field extractors return `None` or an empty vec on absence and never
/// fail; only [`LocaleParser::extract`] may return an error.
pub trait LocaleParser: Send + Sync {
    /// Layout family this parser is registered for.
    fn format(&self) -> InvoiceFormat;

    /// Language/region variant this parser is registered for.
    fn language(&self) -> Language;

    /// Compiled pattern set driving the shared extraction machinery.
    fn profile(&self) -> &'static LocaleProfile;

    fn extract_order_number(&self, text: &str) -> Option<String> {
        base::order_number(self.profile(), text)
    }

    fn extract_order_date(&self, text: &str) -> Option<NaiveDate> {
        base::order_date(self.profile(), text)
    }

    fn extract_items(&self, text: &str, config: &ExtractionConfig) -> Vec<LineItem> {
        base::scan_items(self.profile(), self.format().is_business(), text, config).0
    }

    fn extract_subtotal(&self, text: &str) -> Option<Decimal> {
        base::labeled_totals(self.profile(), text).subtotal
    }

    fn extract_shipping(&self, text: &str) -> Option<Decimal> {
        base::labeled_totals(self.profile(), text).shipping
    }

    fn extract_tax(&self, text: &str) -> Option<Decimal> {
        base::labeled_totals(self.profile(), text).tax
    }

    fn extract_total(&self, text: &str) -> Option<Decimal> {
        base::labeled_totals(self.profile(), text).total
    }

    /// How strongly the text matches any supported language; parsers can
    /// re-check after selection when a caller bypasses the factory.
    fn detect_language(&self, text: &str) -> LanguageDetectionResult {
        crate::classify::detect_language(text, &ClassificationConfig::default())
    }

    /// Run every field extractor and assemble an [`InvoiceRecord`].
    ///
    /// Fails only on empty input or when nothing extractable was found;
    /// partially filled records are returned normally and scored down by
    /// validation instead.
    fn extract(&self, text: &str, config: &ExtractionConfig) -> Result<ExtractionOutcome> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        // Missing scalar fields are scored structurally by validation;
        // warnings here carry only extraction-level fallbacks.
        let order_number = self.extract_order_number(text);
        let order_date = self.extract_order_date(text);

        let (items, warnings) =
            base::scan_items(self.profile(), self.format().is_business(), text, config);

        let subtotal = self.extract_subtotal(text);
        let shipping = self.extract_shipping(text);
        let tax = self.extract_tax(text);
        let total = self.extract_total(text);

        if items.is_empty() && subtotal.is_none() && total.is_none() {
            return Err(ExtractionError::NoData);
        }

        let currency = items
            .first()
            .map(|i| i.currency.clone())
            .or_else(|| base::detect_currency(self.profile(), text).map(str::to_string))
            .unwrap_or_else(|| self.profile().default_currency.to_string());

        let mut record = InvoiceRecord::new();
        record.order_number = order_number;
        record.order_date = order_date;
        record.items = items;
        record.subtotal = subtotal;
        record.shipping = shipping;
        record.tax = tax;
        record.total = total;
        record.currency = currency;

        debug!(
            "parsed invoice {:?} with {} items in {:?}/{:?}",
            record.order_number,
            record.items.len(),
            self.format(),
            self.language()
        );

        Ok(ExtractionOutcome {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Every registered parser variant.
static PARSERS: &[&'static dyn LocaleParser] = &[
    &english::EnglishConsumer,
    &english::BritishConsumer,
    &english::CanadianConsumer,
    &english::AustralianConsumer,
    &german::GermanConsumer,
    &german::GermanStandard,
    &german::GermanBusiness,
    &german::SwissConsumer,
    &french::FrenchConsumer,
    &french::FrenchBusiness,
    &spanish::SpanishConsumer,
    &italian::ItalianConsumer,
    &japanese::JapaneseConsumer,
];

/// Selects the parser for a (format, language) pair.
pub struct ParserFactory;

impl ParserFactory {
    /// Pure selection over the static registry.
    ///
    /// Unknown formats map to the consumer-standard family. A pair with
    /// no registered parser falls back to the closest parser for the
    /// language, then to the English generic parser, so selection always
    /// succeeds.
    pub fn select(format: InvoiceFormat, language: Language) -> &'static dyn LocaleParser {
        let format = if format == InvoiceFormat::Unknown {
            InvoiceFormat::ConsumerStandard
        } else {
            format
        };

        let selected = PARSERS
            .iter()
            .copied()
            .find(|p| p.format() == format && p.language() == language)
            .or_else(|| {
                PARSERS
                    .iter()
                    .copied()
                    .find(|p| p.language() == language)
            })
            .unwrap_or(&english::EnglishConsumer);

        debug!(
            "selected parser {:?}/{:?} for {:?}/{:?}",
            selected.format(),
            selected.language(),
            format,
            language
        );
        selected
    }
}
