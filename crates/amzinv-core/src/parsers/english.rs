//! English-language parsers: US baseline plus GB, CA and AU regions.
//!
//! The US parser doubles as the global safety net: classification
//! failures of any kind end up here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::EN_AMOUNT;
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

pub static ENGLISH_MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const MONTH_ALTERNATION: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

fn en_profile(
    language: Language,
    default_currency: &'static str,
    date_order: DateOrder,
    long_date: Regex,
    long_date_order: DateOrder,
    tax_label: Regex,
    shipping_label: Regex,
) -> LocaleProfile {
    LocaleProfile {
        language,
        decimal: DecimalStyle::Dot,
        default_currency,
        months: ENGLISH_MONTHS,
        order_number_label: Regex::new(r"(?i)Order\s*(?:Number|No\.?)?\s*[#:]*\s*(\d{3}-\d{7}-\d{7})")
            .unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Order\s+Placed|Order\s+Date|Invoice\s+Date|Date\s+of\s+Order)\s*:?\s*([^\n]+)",
        )
        .unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap(),
        date_order,
        long_date,
        long_date_order,
        amount: &EN_AMOUNT,
        quantity: Regex::new(r"(?i)(?:Qty|Quantity)\s*[:.]?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)Item\(s\)?\s+Subtotal|\bSubtotal\b").unwrap(),
        shipping_label,
        tax_label,
        total_label: Regex::new(r"(?i)Grand\s+Total|Order\s+Total|\bTotal\b").unwrap(),
    }
}

lazy_static! {
    pub static ref EN_US_PROFILE: LocaleProfile = en_profile(
        Language::En,
        "USD",
        DateOrder::MonthDayYear,
        Regex::new(&format!(r"(?i)\b({MONTH_ALTERNATION})\s+(\d{{1,2}}),?\s+(\d{{4}})")).unwrap(),
        DateOrder::MonthDayYear,
        Regex::new(r"(?i)Sales\s+Tax|Estimated\s+Tax|\bTax\b|\bVAT\b").unwrap(),
        Regex::new(r"(?i)Shipping\s*(?:&|and)\s*Handling|\bShipping\b|\bDelivery\b").unwrap(),
    );

    pub static ref EN_GB_PROFILE: LocaleProfile = en_profile(
        Language::EnGb,
        "GBP",
        DateOrder::DayMonthYear,
        Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+({MONTH_ALTERNATION})\s+(\d{{4}})")).unwrap(),
        DateOrder::DayMonthYear,
        Regex::new(r"(?i)\bVAT\b").unwrap(),
        Regex::new(r"(?i)Postage\s*(?:&|and)\s*Packing|\bPostage\b|\bShipping\b|\bDelivery\b")
            .unwrap(),
    );

    pub static ref EN_CA_PROFILE: LocaleProfile = en_profile(
        Language::EnCa,
        "CAD",
        DateOrder::MonthDayYear,
        Regex::new(&format!(r"(?i)\b({MONTH_ALTERNATION})\s+(\d{{1,2}}),?\s+(\d{{4}})")).unwrap(),
        DateOrder::MonthDayYear,
        Regex::new(r"(?i)\bGST\b|\bHST\b|\bPST\b|\bQST\b|\bTax\b").unwrap(),
        Regex::new(r"(?i)Shipping\s*(?:&|and)\s*Handling|\bShipping\b|\bDelivery\b").unwrap(),
    );

    pub static ref EN_AU_PROFILE: LocaleProfile = en_profile(
        Language::EnAu,
        "AUD",
        DateOrder::DayMonthYear,
        Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+({MONTH_ALTERNATION})\s+(\d{{4}})")).unwrap(),
        DateOrder::DayMonthYear,
        Regex::new(r"(?i)\bGST\b|\bTax\b").unwrap(),
        Regex::new(r"(?i)\bShipping\b|\bDelivery\b|\bPostage\b").unwrap(),
    );
}

/// US consumer order summary; also the global fallback parser.
pub struct EnglishConsumer;

impl LocaleParser for EnglishConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::En
    }
    fn profile(&self) -> &'static LocaleProfile {
        &EN_US_PROFILE
    }
}

/// UK consumer VAT invoice.
pub struct BritishConsumer;

impl LocaleParser for BritishConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::EnGb
    }
    fn profile(&self) -> &'static LocaleProfile {
        &EN_GB_PROFILE
    }
}

/// Canadian consumer order summary.
pub struct CanadianConsumer;

impl LocaleParser for CanadianConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::EnCa
    }
    fn profile(&self) -> &'static LocaleProfile {
        &EN_CA_PROFILE
    }
}

/// Australian consumer tax invoice.
pub struct AustralianConsumer;

impl LocaleParser for AustralianConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::EnAu
    }
    fn profile(&self) -> &'static LocaleProfile {
        &EN_AU_PROFILE
    }
}
