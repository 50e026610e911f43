//! Spanish consumer parser.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::EU_AMOUNT;
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

pub static SPANISH_MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

lazy_static! {
    pub static ref ES_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::Es,
        decimal: DecimalStyle::Comma,
        default_currency: "EUR",
        months: SPANISH_MONTHS,
        order_number_label: Regex::new(
            r"(?i)(?:N[úu]mero\s+de(?:l)?\s+pedido|Pedido\s+n[º°o]\.?)\s*[:#]?\s*(\d{3}-\d{7}-\d{7})"
        ).unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Fecha\s+de(?:l)?\s+(?:pedido|la\s+factura|factura)|Realizado\s+el)\s*:?\s*([^\n]+)"
        ).unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap(),
        date_order: DateOrder::DayMonthYear,
        long_date: Regex::new(
            r"(?i)\b(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre)\s+de\s+(\d{4})"
        ).unwrap(),
        long_date_order: DateOrder::DayMonthYear,
        amount: &EU_AMOUNT,
        quantity: Regex::new(r"(?i)Cantidad\s*:?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)\bSubtotal\b").unwrap(),
        shipping_label: Regex::new(r"(?i)(?:Gastos\s+de\s+)?Env[íi]o").unwrap(),
        tax_label: Regex::new(r"(?i)\bIVA\b").unwrap(),
        total_label: Regex::new(r"(?i)Importe\s+total|\bTotal\b").unwrap(),
    };
}

/// Spanish consumer invoice, IVA-inclusive pricing.
pub struct SpanishConsumer;

impl LocaleParser for SpanishConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerEuVatInclusive
    }
    fn language(&self) -> Language {
        Language::Es
    }
    fn profile(&self) -> &'static LocaleProfile {
        &ES_PROFILE
    }
}
