//! Shared extraction machinery for all locale parsers.
//!
//! Locale parsers supply a [`LocaleProfile`]; everything here is driven by
//! the profile so the per-locale code stays declarative.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::LineItem;

use super::patterns::{
    ASIN_ANY, ASIN_LABELED, ISO_DATE, JP_AMOUNT, LEADING_QTY, ORDER_NUMBER_ANY, TAX_ID_EXCLUDE,
    currency_code,
};
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

/// One money token matched in an item window or totals line.
#[derive(Debug, Clone)]
pub struct AmountToken {
    /// Parsed value.
    pub value: Decimal,
    /// Digits of the token with separators removed, for suffix checks
    /// against digit-merge corruption.
    pub digits: String,
    /// ISO code when the token carried a currency marker.
    pub currency: Option<&'static str>,
    /// Window-relative row the token was found on.
    pub row: usize,
    /// Ordinal across the window, in reading order.
    pub pos: usize,
}

/// Collect all money tokens on a single line.
pub fn collect_amounts(profile: &LocaleProfile, line: &str) -> Vec<AmountToken> {
    let mut out = Vec::new();

    match profile.decimal {
        DecimalStyle::Integer => {
            for caps in JP_AMOUNT.captures_iter(line) {
                let int = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
                let Some(int) = int else { continue };
                let digits: String = int.chars().filter(|c| c.is_ascii_digit()).collect();
                let Ok(value) = Decimal::from_str(&digits) else { continue };
                let currency = caps
                    .get(1)
                    .or_else(|| caps.get(4))
                    .map(|m| currency_code(m.as_str()));
                out.push(AmountToken {
                    value,
                    digits,
                    currency,
                    row: 0,
                    pos: 0,
                });
            }
        }
        _ => {
            for caps in profile.amount.captures_iter(line) {
                let int: String = caps[2].chars().filter(|c| c.is_ascii_digit()).collect();
                let frac = &caps[3];
                let Ok(value) = Decimal::from_str(&format!("{int}.{frac}")) else {
                    continue;
                };
                let currency = caps
                    .get(1)
                    .or_else(|| caps.get(4))
                    .map(|m| currency_code(m.as_str()));
                out.push(AmountToken {
                    value,
                    digits: format!("{int}{frac}"),
                    currency,
                    row: 0,
                    pos: 0,
                });
            }
        }
    }

    out
}

fn full_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    (1990..=2100).contains(&date.year()).then_some(date)
}

fn build_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, day, month))
        .and_then(plausible)
}

/// Parse the first date in `text` using the locale's long form, then its
/// numeric form, then ISO as a locale-independent fallback.
pub fn parse_date(profile: &LocaleProfile, text: &str) -> Option<NaiveDate> {
    for caps in profile.long_date.captures_iter(text) {
        let parsed = (|| match profile.long_date_order {
            DateOrder::DayMonthYear => {
                let day: u32 = caps[1].parse().ok()?;
                let month = profile.month_number(&caps[2])?;
                build_date(full_year(&caps[3]), month, day)
            }
            DateOrder::MonthDayYear => {
                let month = profile.month_number(&caps[1])?;
                let day: u32 = caps[2].parse().ok()?;
                build_date(full_year(&caps[3]), month, day)
            }
            DateOrder::YearMonthDay => {
                let year: i32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                let day: u32 = caps[3].parse().ok()?;
                build_date(year, month, day)
            }
        })();
        if parsed.is_some() {
            return parsed;
        }
    }

    for caps in profile.numeric_date.captures_iter(text) {
        let parsed = (|| match profile.date_order {
            DateOrder::DayMonthYear => {
                let day: u32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                build_date(full_year(&caps[3]), month, day)
            }
            DateOrder::MonthDayYear => {
                let month: u32 = caps[1].parse().ok()?;
                let day: u32 = caps[2].parse().ok()?;
                build_date(full_year(&caps[3]), month, day)
            }
            DateOrder::YearMonthDay => {
                let year: i32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                let day: u32 = caps[3].parse().ok()?;
                build_date(year, month, day)
            }
        })();
        if parsed.is_some() {
            return parsed;
        }
    }

    for caps in ISO_DATE.captures_iter(text) {
        let parsed = (|| {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day).and_then(plausible)
        })();
        if parsed.is_some() {
            return parsed;
        }
    }

    None
}

/// Extract the order number, preferring the labeled form.
pub fn order_number(profile: &LocaleProfile, text: &str) -> Option<String> {
    if let Some(caps) = profile.order_number_label.captures(text) {
        return Some(caps[1].to_string());
    }
    ORDER_NUMBER_ANY
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Extract the order date, preferring the labeled line.
pub fn order_date(profile: &LocaleProfile, text: &str) -> Option<NaiveDate> {
    if let Some(caps) = profile.order_date_label.captures(text) {
        if let Some(date) = parse_date(profile, &caps[1]) {
            return Some(date);
        }
    }
    parse_date(profile, text)
}

/// Labeled totals extracted from the summary section.
#[derive(Debug, Clone, Default)]
pub struct LabeledTotals {
    pub subtotal: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

/// True when the line belongs to the totals section.
pub fn is_totals_line(profile: &LocaleProfile, line: &str) -> bool {
    profile.subtotal_label.is_match(line)
        || profile.shipping_label.is_match(line)
        || profile.tax_label.is_match(line)
        || profile.total_label.is_match(line)
}

/// Classify each line against the totals labels and pull the rightmost
/// amount. Labels are checked subtotal-first so `Total` cannot shadow
/// `Subtotal`. A label line without an amount takes the first amount from
/// a purely numeric following line.
pub fn labeled_totals(profile: &LocaleProfile, text: &str) -> LabeledTotals {
    let mut totals = LabeledTotals::default();
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let slot = if profile.subtotal_label.is_match(line) {
            0
        } else if profile.shipping_label.is_match(line) {
            1
        } else if profile.tax_label.is_match(line) {
            if TAX_ID_EXCLUDE.is_match(line) {
                continue;
            }
            2
        } else if profile.total_label.is_match(line) {
            3
        } else {
            continue;
        };

        let target = match slot {
            0 => &mut totals.subtotal,
            1 => &mut totals.shipping,
            2 => &mut totals.tax,
            _ => &mut totals.total,
        };
        if target.is_some() {
            continue;
        }

        let mut amounts = collect_amounts(profile, line);
        if amounts.is_empty() {
            if let Some(next) = lines.get(i + 1) {
                if super::patterns::is_numeric_line(next) {
                    amounts = collect_amounts(profile, next);
                }
            }
        }
        *target = amounts.last().map(|t| t.value);
    }

    totals
}

/// First currency marker seen anywhere in the text.
pub fn detect_currency(profile: &LocaleProfile, text: &str) -> Option<&'static str> {
    for line in text.lines() {
        if let Some(code) = collect_amounts(profile, line)
            .into_iter()
            .find_map(|t| t.currency)
        {
            return Some(code);
        }
    }
    None
}

/// A price above the merge threshold is digit-merge corruption, not
/// ground truth. The replacement must come from another price column:
/// a sub-threshold token whose digits are a proper suffix of the corrupted
/// token (same row preferred, then the window), else the first
/// sub-threshold token on the same row. The result never exceeds the
/// corrupted value.
fn merge_fallback(
    target: &AmountToken,
    window: &[AmountToken],
    threshold: Decimal,
) -> Option<Decimal> {
    let mut same_row_suffix: Option<Decimal> = None;
    let mut any_suffix: Option<Decimal> = None;
    let mut same_row: Option<Decimal> = None;

    for token in window {
        if token.pos == target.pos || token.value > threshold {
            continue;
        }
        let suffix = token.digits.len() < target.digits.len()
            && target.digits.ends_with(&token.digits);
        let on_row = token.row == target.row;

        if suffix && on_row && same_row_suffix.is_none() {
            same_row_suffix = Some(token.value);
        } else if suffix && any_suffix.is_none() {
            any_suffix = Some(token.value);
        } else if on_row && same_row.is_none() {
            same_row = Some(token.value);
        }
    }

    same_row_suffix.or(any_suffix).or(same_row)
}

fn checked_price(
    target: &AmountToken,
    window: &[AmountToken],
    threshold: Decimal,
    asin: &str,
    warnings: &mut Vec<String>,
) -> Decimal {
    if target.value <= threshold {
        return target.value;
    }
    match merge_fallback(target, window, threshold) {
        Some(value) => {
            warnings.push(format!(
                "suspected merged digits in price {} for {}; used {} from a secondary column",
                target.value, asin, value
            ));
            value
        }
        None => {
            warnings.push(format!(
                "implausible price {} for {} with no secondary column to fall back to",
                target.value, asin
            ));
            target.value
        }
    }
}

fn item_description(profile: &LocaleProfile, lines: &[&str], anchor: usize) -> (String, Option<u32>) {
    // Text on the anchor line besides the identifier itself.
    let line = lines[anchor];
    if let Some(m) = ASIN_LABELED.find(line).or_else(|| ASIN_ANY.find(line)) {
        let remainder = format!("{} {}", &line[..m.start()], &line[m.end()..]);
        let remainder = remainder.trim().trim_matches(|c| c == ':' || c == '-').trim();
        if remainder.chars().any(|c| c.is_alphabetic()) {
            return split_leading_qty(remainder);
        }
    }

    // Otherwise the description is usually just above the identifier.
    let start = anchor.saturating_sub(3);
    for j in (start..anchor).rev() {
        let candidate = lines[j].trim();
        if candidate.is_empty()
            || super::patterns::is_numeric_line(candidate)
            || ASIN_ANY.is_match(candidate)
            || profile.quantity.is_match(candidate)
            || is_totals_line(profile, candidate)
        {
            continue;
        }
        if candidate.chars().any(|c| c.is_alphabetic()) {
            return split_leading_qty(candidate);
        }
    }

    ("Item".to_string(), None)
}

fn split_leading_qty(line: &str) -> (String, Option<u32>) {
    if let Some(caps) = LEADING_QTY.captures(line) {
        let qty = caps[1].parse().ok().filter(|&q| q >= 1);
        return (caps[2].trim().to_string(), qty);
    }
    (line.to_string(), None)
}

/// Scan the text for item windows and extract one [`LineItem`] per
/// identifier anchor.
///
/// Repeated identical rows are kept as separate items; collapsing them
/// would hide extraction defects from the subtotal check.
pub fn scan_items(
    profile: &LocaleProfile,
    business: bool,
    text: &str,
    config: &ExtractionConfig,
) -> (Vec<LineItem>, Vec<String>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut warnings = Vec::new();

    let anchors: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            ASIN_LABELED
                .captures(line)
                .or_else(|| ASIN_ANY.captures(line))
                .map(|caps| (i, caps[1].to_string()))
        })
        .collect();

    let mut items = Vec::new();

    for (k, (anchor, asin)) in anchors.iter().enumerate() {
        let hard_end = anchors
            .get(k + 1)
            .map(|(next, _)| *next)
            .unwrap_or(lines.len());
        let mut end = (anchor + 1 + config.item_window).min(hard_end);

        for (j, line) in lines.iter().enumerate().take(end).skip(anchor + 1) {
            if line.trim().is_empty() || is_totals_line(profile, line) {
                end = j;
                break;
            }
        }

        // Flatten the window's money tokens, keeping row positions for
        // the column choice and the merge guard.
        let mut window: Vec<AmountToken> = Vec::new();
        for (row, line) in lines[*anchor..end].iter().enumerate() {
            for mut token in collect_amounts(profile, line) {
                token.row = row;
                token.pos = window.len();
                window.push(token);
            }
        }

        if window.is_empty() {
            warnings.push(format!("no prices found near {asin}"));
            continue;
        }

        let (description, desc_qty) = item_description(profile, &lines, *anchor);

        let quantity = lines[*anchor..end]
            .iter()
            .find_map(|line| {
                profile
                    .quantity
                    .captures(line)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
            })
            .or(desc_qty)
            .filter(|&q| q >= 1)
            .unwrap_or(1);

        // Column selection. Consumer invoices report VAT-inclusive prices:
        // the last row holding at least two amounts is the inc-VAT
        // unit/line-total pair. Business invoices report the ex-VAT unit
        // price (first column) with the VAT-inclusive line total last.
        let (unit_token, total_token) = if business {
            (&window[0], &window[window.len() - 1])
        } else {
            let pair_row = window
                .iter()
                .rev()
                .map(|t| t.row)
                .find(|r| window.iter().filter(|t| t.row == *r).count() >= 2);
            match pair_row {
                Some(row) => {
                    let pair: Vec<&AmountToken> =
                        window.iter().filter(|t| t.row == row).collect();
                    (pair[pair.len() - 2], pair[pair.len() - 1])
                }
                None => {
                    let last = &window[window.len() - 1];
                    (last, last)
                }
            }
        };

        // Whole-yen locales price two orders of magnitude higher than
        // decimal currencies; scale the plausibility bound accordingly.
        let threshold = match profile.decimal {
            DecimalStyle::Integer => config.ocr_merge_threshold * Decimal::from(100),
            _ => config.ocr_merge_threshold,
        };
        let unit_price = checked_price(unit_token, &window, threshold, asin, &mut warnings);
        let total_price = checked_price(total_token, &window, threshold, asin, &mut warnings);

        let currency = window
            .iter()
            .find_map(|t| t.currency)
            .unwrap_or(profile.default_currency)
            .to_string();

        items.push(LineItem {
            asin: Some(asin.clone()),
            description,
            quantity,
            unit_price,
            total_price,
            currency,
        });
    }

    debug!(
        "extracted {} items from {} anchors",
        items.len(),
        anchors.len()
    );

    (items, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::german::DE_PROFILE;
    use crate::parsers::english::EN_US_PROFILE;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_collect_amounts_merged_pair() {
        let tokens = collect_amounts(&DE_PROFILE, "66,38 €66,38 €");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, Decimal::from_str("66.38").unwrap());
        assert_eq!(tokens[0].currency, Some("EUR"));
    }

    #[test]
    fn test_collect_amounts_merged_digits() {
        let tokens = collect_amounts(&DE_PROFILE, "1176,46 €");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, Decimal::from_str("1176.46").unwrap());
        assert_eq!(tokens[0].digits, "117646");
    }

    #[test]
    fn test_consumer_column_selection() {
        // The inc-VAT pair on the last row wins over the earlier column.
        let text = "ASIN: B08N5WRWNW\n155,32 €\n20%\n66,38 €66,38 €";
        let (items, warnings) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::from_str("66.38").unwrap());
        assert_eq!(items[0].total_price, Decimal::from_str("66.38").unwrap());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_business_column_selection() {
        let text = "ASIN: B08XYZQW12\n10,50 €\n19%\n12,50 €25,00 €";
        let (items, _) = scan_items(&DE_PROFILE, true, text, &config());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::from_str("10.50").unwrap());
        assert_eq!(items[0].total_price, Decimal::from_str("25.00").unwrap());
    }

    #[test]
    fn test_merge_guard_same_row() {
        // Quantity digit merged into the inc-VAT unit price.
        let text = "ASIN: B07G3TKP2L\n20%\n1176,46 €176,46 €";
        let (items, warnings) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::from_str("176.46").unwrap());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_merge_guard_window_suffix() {
        // Merged quantity 3; the clean unit price sits on an earlier row.
        let text = "ASIN: B07G3TKP2L\n176,46 €\n20%\n3176,46 €529,38 €";
        let (items, _) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, Decimal::from_str("176.46").unwrap());
        assert_eq!(items[0].total_price, Decimal::from_str("529.38").unwrap());
    }

    #[test]
    fn test_merge_guard_never_raises() {
        let threshold = Decimal::new(1000, 0);
        let corrupted = AmountToken {
            value: Decimal::from_str("3176.46").unwrap(),
            digits: "317646".to_string(),
            currency: None,
            row: 0,
            pos: 0,
        };
        let clean = AmountToken {
            value: Decimal::from_str("176.46").unwrap(),
            digits: "17646".to_string(),
            currency: None,
            row: 0,
            pos: 1,
        };
        let window = vec![corrupted.clone(), clean];
        let fallback = merge_fallback(&corrupted, &window, threshold).unwrap();
        assert!(fallback < corrupted.value);
    }

    #[test]
    fn test_duplicate_rows_kept() {
        let text = "ASIN: B01ABCDE23\n66,38 €66,38 €\nASIN: B01ABCDE23\n66,38 €66,38 €";
        let (items, _) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_description_and_quantity_from_previous_line() {
        let text = "2 x Echo Dot (5. Gen)\nASIN: B09B8V1LZ3\n59,98 €59,98 €";
        let (items, _) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items[0].description, "Echo Dot (5. Gen)");
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_window_stops_at_totals() {
        let text = "ASIN: B09B8V1LZ3\n59,98 €59,98 €\nZwischensumme: 120,00 €";
        let (items, _) = scan_items(&DE_PROFILE, false, text, &config());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total_price, Decimal::from_str("59.98").unwrap());
    }

    #[test]
    fn test_labeled_totals_de() {
        let text = "Zwischensumme: 66,38 €\nVerpackung & Versand: 0,00 €\nEnthaltene MwSt.: 11,06 €\nGesamtbetrag: 66,38 €";
        let totals = labeled_totals(&DE_PROFILE, text);
        assert_eq!(totals.subtotal, Some(Decimal::from_str("66.38").unwrap()));
        assert_eq!(totals.shipping, Some(Decimal::from_str("0.00").unwrap()));
        assert_eq!(totals.tax, Some(Decimal::from_str("11.06").unwrap()));
        assert_eq!(totals.total, Some(Decimal::from_str("66.38").unwrap()));
    }

    #[test]
    fn test_tax_id_line_not_mistaken_for_tax() {
        let text = "USt-IdNr. DE814584193\nEnthaltene MwSt.: 11,06 €";
        let totals = labeled_totals(&DE_PROFILE, text);
        assert_eq!(totals.tax, Some(Decimal::from_str("11.06").unwrap()));
    }

    #[test]
    fn test_order_number_labeled_and_bare() {
        assert_eq!(
            order_number(&DE_PROFILE, "Bestellnummer: 302-4563851-9372615"),
            Some("302-4563851-9372615".to_string())
        );
        assert_eq!(
            order_number(&EN_US_PROFILE, "ref 111-2223334-5556667 in footer"),
            Some("111-2223334-5556667".to_string())
        );
    }

    #[test]
    fn test_parse_date_long_german() {
        let date = parse_date(&DE_PROFILE, "15. Dezember 2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_parse_date_numeric_german() {
        let date = parse_date(&DE_PROFILE, "03.11.2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 11, 3).unwrap());
    }

    #[test]
    fn test_parse_date_iso_fallback() {
        let date = parse_date(&DE_PROFILE, "2023-12-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_parse_date_us_long() {
        let date = parse_date(&EN_US_PROFILE, "December 15, 2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 15).unwrap());
    }
}
