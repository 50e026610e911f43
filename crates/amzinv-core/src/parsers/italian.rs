//! Italian consumer parser.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::EU_AMOUNT;
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

pub static ITALIAN_MONTHS: &[(&str, u32)] = &[
    ("gennaio", 1),
    ("febbraio", 2),
    ("marzo", 3),
    ("aprile", 4),
    ("maggio", 5),
    ("giugno", 6),
    ("luglio", 7),
    ("agosto", 8),
    ("settembre", 9),
    ("ottobre", 10),
    ("novembre", 11),
    ("dicembre", 12),
];

lazy_static! {
    pub static ref IT_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::It,
        decimal: DecimalStyle::Comma,
        default_currency: "EUR",
        months: ITALIAN_MONTHS,
        order_number_label: Regex::new(
            r"(?i)(?:Numero\s+(?:dell')?ordine|Ordine\s+n\.?)\s*[:#]?\s*(\d{3}-\d{7}-\d{7})"
        ).unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Data\s+(?:dell')?ordine|Data\s+fattura|Effettuato\s+il)\s*:?\s*([^\n]+)"
        ).unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap(),
        date_order: DateOrder::DayMonthYear,
        long_date: Regex::new(
            r"(?i)\b(\d{1,2})\s+(gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre)\s+(\d{4})"
        ).unwrap(),
        long_date_order: DateOrder::DayMonthYear,
        amount: &EU_AMOUNT,
        quantity: Regex::new(r"(?i)Quantit[àa]\s*:?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)\bSubtotale\b").unwrap(),
        shipping_label: Regex::new(r"(?i)(?:Costi\s+di\s+)?Spedizione").unwrap(),
        tax_label: Regex::new(r"(?i)\bIVA\b").unwrap(),
        total_label: Regex::new(r"(?i)Totale\s+(?:ordine|fattura)|\bTotale\b").unwrap(),
    };
}

/// Italian consumer invoice, IVA-inclusive pricing.
pub struct ItalianConsumer;

impl LocaleParser for ItalianConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerEuVatInclusive
    }
    fn language(&self) -> Language {
        Language::It
    }
    fn profile(&self) -> &'static LocaleProfile {
        &IT_PROFILE
    }
}
