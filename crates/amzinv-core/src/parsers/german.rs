//! German-language parsers: Germany (consumer, business) and Switzerland.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::{CH_AMOUNT, EU_AMOUNT};
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

pub static GERMAN_MONTHS: &[(&str, u32)] = &[
    ("januar", 1),
    ("februar", 2),
    ("märz", 3),
    ("april", 4),
    ("mai", 5),
    ("juni", 6),
    ("juli", 7),
    ("august", 8),
    ("september", 9),
    ("oktober", 10),
    ("november", 11),
    ("dezember", 12),
];

lazy_static! {
    pub static ref DE_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::De,
        decimal: DecimalStyle::Comma,
        default_currency: "EUR",
        months: GERMAN_MONTHS,
        order_number_label: Regex::new(
            r"(?i)Bestellnummer\s*[:#]?\s*(\d{3}-\d{7}-\d{7})"
        ).unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Bestelldatum|Rechnungsdatum|Lieferdatum)\s*:?\s*([^\n]+)"
        ).unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4}|\d{2})\b").unwrap(),
        date_order: DateOrder::DayMonthYear,
        long_date: Regex::new(
            r"(?i)\b(\d{1,2})\.?\s+(Januar|Februar|März|April|Mai|Juni|Juli|August|September|Oktober|November|Dezember)\s+(\d{4})"
        ).unwrap(),
        long_date_order: DateOrder::DayMonthYear,
        amount: &EU_AMOUNT,
        quantity: Regex::new(r"(?i)(?:Menge|Anzahl)\s*:?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)\bZwischensumme\b").unwrap(),
        shipping_label: Regex::new(
            r"(?i)Verpackung\s*(?:&|und)\s*Versand|\bVersandkosten\b|\bVersand\b"
        ).unwrap(),
        tax_label: Regex::new(r"(?i)\bMwSt\b\.?|\bUSt\b\.?|\bUmsatzsteuer\b").unwrap(),
        total_label: Regex::new(
            r"(?i)\bGesamtbetrag\b|\bGesamtsumme\b|\bBestellsumme\b|\bSumme\b"
        ).unwrap(),
    };

    pub static ref CH_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::DeCh,
        decimal: DecimalStyle::Apostrophe,
        default_currency: "CHF",
        months: GERMAN_MONTHS,
        order_number_label: Regex::new(
            r"(?i)Bestellnummer\s*[:#]?\s*(\d{3}-\d{7}-\d{7})"
        ).unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Bestelldatum|Rechnungsdatum|Lieferdatum)\s*:?\s*([^\n]+)"
        ).unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4}|\d{2})\b").unwrap(),
        date_order: DateOrder::DayMonthYear,
        long_date: Regex::new(
            r"(?i)\b(\d{1,2})\.?\s+(Januar|Februar|März|April|Mai|Juni|Juli|August|September|Oktober|November|Dezember)\s+(\d{4})"
        ).unwrap(),
        long_date_order: DateOrder::DayMonthYear,
        amount: &CH_AMOUNT,
        quantity: Regex::new(r"(?i)(?:Menge|Anzahl)\s*:?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)\bZwischensumme\b").unwrap(),
        shipping_label: Regex::new(
            r"(?i)Verpackung\s*(?:&|und)\s*Versand|\bVersandkosten\b|\bVersand\b"
        ).unwrap(),
        tax_label: Regex::new(r"(?i)\bMwSt\b\.?|\bUSt\b\.?|\bUmsatzsteuer\b").unwrap(),
        total_label: Regex::new(
            r"(?i)\bGesamtbetrag\b|\bGesamtsumme\b|\bBestellsumme\b|\bSumme\b"
        ).unwrap(),
    };
}

/// German consumer invoice, VAT-inclusive pricing.
pub struct GermanConsumer;

impl LocaleParser for GermanConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerEuVatInclusive
    }
    fn language(&self) -> Language {
        Language::De
    }
    fn profile(&self) -> &'static LocaleProfile {
        &DE_PROFILE
    }
}

/// German consumer order summary without a VAT block.
pub struct GermanStandard;

impl LocaleParser for GermanStandard {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::De
    }
    fn profile(&self) -> &'static LocaleProfile {
        &DE_PROFILE
    }
}

/// German business invoice, ex-VAT unit prices.
pub struct GermanBusiness;

impl LocaleParser for GermanBusiness {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::BusinessExVat
    }
    fn language(&self) -> Language {
        Language::De
    }
    fn profile(&self) -> &'static LocaleProfile {
        &DE_PROFILE
    }
}

/// Swiss consumer invoice, CHF amounts with apostrophe thousands.
pub struct SwissConsumer;

impl LocaleParser for SwissConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerEuVatInclusive
    }
    fn language(&self) -> Language {
        Language::DeCh
    }
    fn profile(&self) -> &'static LocaleProfile {
        &CH_PROFILE
    }
}
