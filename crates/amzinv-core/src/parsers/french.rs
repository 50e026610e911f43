//! French parsers: consumer (TTC pricing) and business (HT pricing).

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::EU_AMOUNT;
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

pub static FRENCH_MONTHS: &[(&str, u32)] = &[
    ("janvier", 1),
    ("février", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("août", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("décembre", 12),
];

lazy_static! {
    pub static ref FR_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::Fr,
        decimal: DecimalStyle::Comma,
        default_currency: "EUR",
        months: FRENCH_MONTHS,
        order_number_label: Regex::new(
            r"(?i)(?:Num[ée]ro\s+de\s+(?:la\s+)?commande|Commande\s+n[°o]|N[°o]\s+de\s+commande)\s*[:#]?\s*(\d{3}-\d{7}-\d{7})"
        ).unwrap(),
        order_date_label: Regex::new(
            r"(?i)(?:Date\s+de\s+(?:la\s+)?(?:commande|facture)|Command[ée]\s+le|Date\s+facture)\s*:?\s*([^\n]+)"
        ).unwrap(),
        numeric_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap(),
        date_order: DateOrder::DayMonthYear,
        long_date: Regex::new(
            r"(?i)\b(\d{1,2})(?:er)?\s+(janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)\s+(\d{4})"
        ).unwrap(),
        long_date_order: DateOrder::DayMonthYear,
        amount: &EU_AMOUNT,
        quantity: Regex::new(r"(?i)(?:Quantit[ée]|Qt[ée])\s*:?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"(?i)Sous-total").unwrap(),
        shipping_label: Regex::new(
            r"(?i)\bLivraison\b|Frais\s+(?:d'exp[ée]dition|de\s+port)|Exp[ée]dition"
        ).unwrap(),
        tax_label: Regex::new(r"(?i)\bTVA\b").unwrap(),
        total_label: Regex::new(r"(?i)Montant\s+total|Total\s+TTC|\bTotal\b").unwrap(),
    };
}

/// French consumer invoice, TTC pricing.
pub struct FrenchConsumer;

impl LocaleParser for FrenchConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerEuVatInclusive
    }
    fn language(&self) -> Language {
        Language::Fr
    }
    fn profile(&self) -> &'static LocaleProfile {
        &FR_PROFILE
    }
}

/// French business invoice, HT unit prices with itemized TVA.
pub struct FrenchBusiness;

impl LocaleParser for FrenchBusiness {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::BusinessExVat
    }
    fn language(&self) -> Language {
        Language::Fr
    }
    fn profile(&self) -> &'static LocaleProfile {
        &FR_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ExtractionConfig;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_consumer_invoice() {
        let text = "Amazon.fr\nFacture\n\nNuméro de la commande : 171-4563851-0011223\nDate de la commande : 15 décembre 2023\n\n1 x Casque Bluetooth Sony WH-CH520\nASIN: B0BTJGLJ9L\n49,90 €49,90 €\n\nSous-total : 49,90 €\nLivraison : 0,00 €\nTVA incluse : 8,32 €\nMontant total : 49,90 €";
        let outcome = FrenchConsumer
            .extract(text, &ExtractionConfig::default())
            .unwrap();
        let record = outcome.record;

        assert_eq!(record.order_number.as_deref(), Some("171-4563851-0011223"));
        assert_eq!(
            record.order_date,
            Some(NaiveDate::from_ymd_opt(2023, 12, 15).unwrap())
        );
        assert_eq!(
            record.items[0].unit_price,
            Decimal::from_str("49.90").unwrap()
        );
        assert_eq!(record.tax, Some(Decimal::from_str("8.32").unwrap()));
        assert_eq!(record.total, Some(Decimal::from_str("49.90").unwrap()));
    }

    #[test]
    fn test_total_label_does_not_shadow_subtotal() {
        let text = "Sous-total : 100,00 €\nMontant total : 120,00 €";
        assert_eq!(
            FrenchConsumer.extract_subtotal(text),
            Some(Decimal::from_str("100.00").unwrap())
        );
        assert_eq!(
            FrenchConsumer.extract_total(text),
            Some(Decimal::from_str("120.00").unwrap())
        );
    }

    #[test]
    fn test_business_ht_unit_price() {
        let text = "Commande n° 403-9988776-5544332\nDate de la facture : 03/11/2023\n\n3 x Papier A4 500 feuilles\nASIN: B01FGHIJ45\n4,12 € 20% 4,94 €14,82 €\n\nSous-total : 14,82 €\nTotal TTC : 14,82 €";
        let outcome = FrenchBusiness
            .extract(text, &ExtractionConfig::default())
            .unwrap();
        let record = outcome.record;

        assert_eq!(
            record.items[0].unit_price,
            Decimal::from_str("4.12").unwrap()
        );
        assert_eq!(
            record.items[0].total_price,
            Decimal::from_str("14.82").unwrap()
        );
        assert_eq!(record.items[0].quantity, 3);
    }
}
