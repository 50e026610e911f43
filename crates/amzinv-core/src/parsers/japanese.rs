//! Japanese consumer parser. Amounts are whole yen.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::classification::{InvoiceFormat, Language};

use super::LocaleParser;
use super::patterns::JP_AMOUNT;
use super::profile::{DateOrder, DecimalStyle, LocaleProfile};

lazy_static! {
    pub static ref JA_PROFILE: LocaleProfile = LocaleProfile {
        language: Language::Ja,
        decimal: DecimalStyle::Integer,
        default_currency: "JPY",
        months: &[],
        order_number_label: Regex::new(r"注文番号\s*[:：]?\s*(\d{3}-\d{7}-\d{7})").unwrap(),
        order_date_label: Regex::new(r"(?:注文日|領収日|発行日)\s*[:：]?\s*([^\n]+)").unwrap(),
        numeric_date: Regex::new(r"\b(\d{4})[/.](\d{1,2})[/.](\d{1,2})\b").unwrap(),
        date_order: DateOrder::YearMonthDay,
        long_date: Regex::new(r"(\d{4})年\s*(\d{1,2})月\s*(\d{1,2})日").unwrap(),
        long_date_order: DateOrder::YearMonthDay,
        amount: &JP_AMOUNT,
        quantity: Regex::new(r"数量\s*[:：]?\s*(\d{1,4})").unwrap(),
        subtotal_label: Regex::new(r"商品の小計|小計").unwrap(),
        shipping_label: Regex::new(r"配送料|送料").unwrap(),
        tax_label: Regex::new(r"消費税").unwrap(),
        total_label: Regex::new(r"注文合計|合計|請求額").unwrap(),
    };
}

/// Japanese consumer order summary.
pub struct JapaneseConsumer;

impl LocaleParser for JapaneseConsumer {
    fn format(&self) -> InvoiceFormat {
        InvoiceFormat::ConsumerStandard
    }
    fn language(&self) -> Language {
        Language::Ja
    }
    fn profile(&self) -> &'static LocaleProfile {
        &JA_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ExtractionConfig;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_consumer_invoice() {
        let text = "Amazon.co.jp\n請求書\n\n注文番号: 503-1234567-7654321\n注文日: 2023年12月15日\n\nEcho Show 5 第3世代\nASIN: B09B2SF8PX\n数量: 1\n¥8,980\n\n小計: ¥8,980\n配送料: ¥0\n注文合計: ¥8,980";
        let outcome = JapaneseConsumer
            .extract(text, &ExtractionConfig::default())
            .unwrap();
        let record = outcome.record;

        assert_eq!(record.order_number.as_deref(), Some("503-1234567-7654321"));
        assert_eq!(
            record.order_date,
            Some(NaiveDate::from_ymd_opt(2023, 12, 15).unwrap())
        );
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].unit_price, Decimal::from(8980));
        assert_eq!(record.items[0].description, "Echo Show 5 第3世代");
        assert_eq!(record.subtotal, Some(Decimal::from(8980)));
        assert_eq!(record.shipping, Some(Decimal::ZERO));
        assert_eq!(record.total, Some(Decimal::from(8980)));
        assert_eq!(record.currency, "JPY");
    }

    #[test]
    fn test_trailing_yen_marker() {
        let date = JapaneseConsumer.extract_order_date("2024/01/03").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        let total = JapaneseConsumer.extract_total("合計 3,980円");
        assert_eq!(total, Some(Decimal::from(3980)));
    }
}
