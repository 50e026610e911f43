//! Locale profiles: the compiled pattern set a parser extracts with.

use regex::Regex;

use crate::models::classification::Language;

/// Decimal convention for money amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// `1.234,56` or `1 234,56` (DE, FR, ES, IT).
    Comma,
    /// `1,234.56` (EN regions).
    Dot,
    /// `1'234.56` (CH).
    Apostrophe,
    /// Whole currency units, `¥3,980` (JP).
    Integer,
}

/// Field order of a date representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

/// Compiled pattern set for one language/region variant.
///
/// Built once at startup into an immutable shared table; parsers hold
/// `&'static` references and never mutate it.
pub struct LocaleProfile {
    pub language: Language,
    pub decimal: DecimalStyle,
    pub default_currency: &'static str,

    /// Lowercase month names, full forms; abbreviations are matched by
    /// prefix.
    pub months: &'static [(&'static str, u32)],

    /// Labeled order number, capture 1 = the number.
    pub order_number_label: Regex,

    /// Labeled order/invoice date, capture 1 = rest of line.
    pub order_date_label: Regex,

    /// Numeric date, three captures interpreted per `date_order`.
    pub numeric_date: Regex,
    pub date_order: DateOrder,

    /// Long-form date with month name, three captures interpreted per
    /// `long_date_order`.
    pub long_date: Regex,
    pub long_date_order: DateOrder,

    /// Money amount in this locale's decimal style.
    pub amount: &'static Regex,

    /// Labeled quantity, capture 1 = count.
    pub quantity: Regex,

    // Totals-section labels. Matching is line-classified in this order,
    // so `total` may be a substring of `subtotal` labels.
    pub subtotal_label: Regex,
    pub shipping_label: Regex,
    pub tax_label: Regex,
    pub total_label: Regex,
}

impl LocaleProfile {
    /// Resolve a month name (or prefix abbreviation) to its number.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        let needle = name.trim().trim_end_matches('.').to_lowercase();
        if needle.len() < 3 {
            return None;
        }
        self.months
            .iter()
            .find(|(full, _)| *full == needle || full.starts_with(&needle))
            .map(|(_, n)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::german::DE_PROFILE;

    #[test]
    fn test_month_number_full_and_abbreviated() {
        assert_eq!(DE_PROFILE.month_number("Dezember"), Some(12));
        assert_eq!(DE_PROFILE.month_number("Dez."), Some(12));
        assert_eq!(DE_PROFILE.month_number("Foo"), None);
    }
}
