//! Layout-specific cleanup applied once the invoice format is known.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::InvoiceFormat;
use crate::parsers::patterns::is_numeric_line;

lazy_static! {
    /// Currency symbol placed before the amount, as in `€ 66,38`.
    static ref SYMBOL_FIRST: Regex =
        Regex::new(r"€\s?(\d{1,3}(?:[ .]\d{3})*,\d{2}|\d+,\d{2})").unwrap();
}

/// Apply format-specific cleanup.
///
/// Business layouts often split one logical price-table row across several
/// physical lines; those are rejoined so the column scan sees one row.
/// EU consumer layouts sometimes place the currency symbol before the
/// amount; those are reordered to the amount-first form the locale
/// patterns expect. Unknown formats pass through untouched.
pub fn apply(text: &str, format: InvoiceFormat) -> String {
    match format {
        InvoiceFormat::BusinessExVat => rejoin_split_rows(text),
        InvoiceFormat::ConsumerEuVatInclusive => SYMBOL_FIRST.replace_all(text, "$1 €").into_owned(),
        _ => text.to_string(),
    }
}

/// Fold lines consisting only of amounts and VAT-rate tokens into the
/// preceding line. Blank lines end a row; nothing is folded across them.
fn rejoin_split_rows(text: &str) -> String {
    let mut rows: Vec<String> = Vec::new();

    for line in text.lines() {
        let can_fold = !line.is_empty()
            && is_numeric_line(line)
            && rows
                .last()
                .is_some_and(|prev: &String| !prev.is_empty() && !is_numeric_line(prev));

        if can_fold {
            let prev = rows.last_mut().unwrap();
            prev.push(' ');
            prev.push_str(line.trim());
        } else {
            rows.push(line.to_string());
        }
    }

    rows.join("\n")
}
