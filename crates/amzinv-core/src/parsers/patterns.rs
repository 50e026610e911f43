//! Shared regex patterns for invoice field extraction.
//!
//! Compiled once and shared read-only across parsers; locale-specific
//! patterns live in the per-language profiles.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Item identifier patterns. The labeled form anchors item windows;
    // the bare form covers layouts that omit the label.
    pub static ref ASIN_LABELED: Regex = Regex::new(
        r"(?i)ASIN\s*[:：]?\s*(B0[0-9A-Z]{8})"
    ).unwrap();

    pub static ref ASIN_ANY: Regex = Regex::new(
        r"\b(B0[0-9A-Z]{8})\b"
    ).unwrap();

    // Marketplace order number: 3-7-7 digit groups.
    pub static ref ORDER_NUMBER_ANY: Regex = Regex::new(
        r"\b(\d{3}-\d{7}-\d{7})\b"
    ).unwrap();

    // VAT rate token, e.g. "19%" or "20 %".
    pub static ref VAT_RATE: Regex = Regex::new(
        r"\b(\d{1,2})\s?%"
    ).unwrap();

    // Quantity prefix on a description line: "2 x Widget", "1 of: Widget".
    pub static ref LEADING_QTY: Regex = Regex::new(
        r"(?i)^\s*(\d{1,3})\s*(?:of\s*:|[x×])\s*(\S.*)$"
    ).unwrap();

    // ISO date, used as a locale-independent fallback.
    pub static ref ISO_DATE: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    // Amount shapes by decimal style. Group layout for the first three:
    // (1) leading currency, (2) integer part, (3) fraction, (4) trailing
    // currency. The Japanese pattern is handled separately because the
    // amounts carry no fraction.
    pub static ref EU_AMOUNT: Regex = Regex::new(
        r"(?:(€|EUR)\s?)?(\d{1,3}(?:[ .]\d{3})*|\d+),(\d{2})(?:\s?(€|EUR))?"
    ).unwrap();

    pub static ref EN_AMOUNT: Regex = Regex::new(
        r"(?:(US\$|C\$|CA\$|A\$|AU\$|\$|£)\s?)?(\d{1,3}(?:,\d{3})*|\d+)\.(\d{2})(?:\s?(USD|GBP|CAD|AUD))?"
    ).unwrap();

    pub static ref CH_AMOUNT: Regex = Regex::new(
        r"(?:(CHF|Fr\.)\s?)?(\d{1,3}(?:['’]\d{3})*|\d+)\.(\d{2})(?:\s?(CHF|Fr\.))?"
    ).unwrap();

    pub static ref JP_AMOUNT: Regex = Regex::new(
        r"(?:([¥￥])\s?(\d{1,3}(?:,\d{3})*|\d+))|(?:(\d{1,3}(?:,\d{3})*|\d+)\s?(円))"
    ).unwrap();

    // Lines carrying tax IDs must not be mistaken for tax amounts.
    pub static ref TAX_ID_EXCLUDE: Regex = Regex::new(
        r"(?i)Id\s?Nr|identification|registration|intracommunautaire|partita\s+IVA"
    ).unwrap();

    // Currency and unit tokens stripped before deciding whether a line is
    // purely numeric.
    static ref CURRENCY_TOKENS: Regex = Regex::new(
        r"(?i)CHF|EUR|USD|GBP|CAD|AUD|JPY|Fr\.|円|€|\$|£|¥|￥|%"
    ).unwrap();
}

/// True when the line holds only amounts, VAT rates and separators —
/// a table fragment rather than descriptive text.
pub fn is_numeric_line(line: &str) -> bool {
    let stripped = CURRENCY_TOKENS.replace_all(line, "");
    stripped.chars().any(|c| c.is_ascii_digit())
        && !stripped.chars().any(|c| c.is_alphabetic())
}

/// Map a matched currency token to an ISO-4217-like code.
pub fn currency_code(token: &str) -> &'static str {
    match token {
        "€" | "EUR" => "EUR",
        "£" | "GBP" => "GBP",
        "C$" | "CA$" | "CAD" => "CAD",
        "A$" | "AU$" | "AUD" => "AUD",
        "US$" | "$" | "USD" => "USD",
        "CHF" | "Fr." => "CHF",
        "¥" | "￥" | "円" | "JPY" => "JPY",
        _ => "EUR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asin_patterns() {
        let caps = ASIN_LABELED.captures("ASIN: B08N5WRWNW").unwrap();
        assert_eq!(&caps[1], "B08N5WRWNW");
        assert!(ASIN_ANY.is_match("Artikel B09HM94VDS gekauft"));
        assert!(!ASIN_ANY.is_match("BX9HM94VDS"));
    }

    #[test]
    fn test_order_number() {
        let caps = ORDER_NUMBER_ANY.captures("Order #302-4563851-9372615").unwrap();
        assert_eq!(&caps[1], "302-4563851-9372615");
        assert!(!ORDER_NUMBER_ANY.is_match("30-4563851-9372615"));
    }

    #[test]
    fn test_eu_amount_merged_pair() {
        let matches: Vec<&str> = EU_AMOUNT
            .find_iter("66,38 €66,38 €")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_eu_amount_thousands() {
        let caps = EU_AMOUNT.captures("1 234,56 €").unwrap();
        assert_eq!(&caps[2], "1 234");
        assert_eq!(&caps[3], "56");
    }

    #[test]
    fn test_eu_amount_ignores_dotted_dates() {
        assert!(!EU_AMOUNT.is_match("03.11.2023"));
    }

    #[test]
    fn test_en_amount() {
        let caps = EN_AMOUNT.captures("$1,023.45").unwrap();
        assert_eq!(&caps[1], "$");
        assert_eq!(&caps[2], "1,023");
    }

    #[test]
    fn test_leading_qty() {
        let caps = LEADING_QTY.captures("2 x Echo Dot").unwrap();
        assert_eq!(&caps[1], "2");
        assert_eq!(&caps[2], "Echo Dot");

        let caps = LEADING_QTY.captures("1 of: Anker USB C Charger").unwrap();
        assert_eq!(&caps[2], "Anker USB C Charger");
    }

    #[test]
    fn test_numeric_line() {
        assert!(is_numeric_line("12,50 €25,00 €"));
        assert!(is_numeric_line("19%"));
        assert!(is_numeric_line("CHF 12.30"));
        assert!(!is_numeric_line("Stückpreis (ohne USt.) 10,50 €"));
        assert!(!is_numeric_line(""));
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(currency_code("€"), "EUR");
        assert_eq!(currency_code("A$"), "AUD");
        assert_eq!(currency_code("円"), "JPY");
    }
}
