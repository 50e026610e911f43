//! Weighted keyword/pattern language detection.
//!
//! Four independent signal classes per language with fixed weights: core
//! invoice terminology (15 points per matched term), supporting phrases
//! (8), currency-symbol/format patterns (15) and localized date formats
//! (10). Core commercial terms out-weigh boilerplate, so a legal footer
//! in another language cannot flip the winner.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::classification::{Language, LanguageDetectionResult};
use crate::models::config::ClassificationConfig;

const CORE_WEIGHT: f32 = 15.0;
const SUPPORT_WEIGHT: f32 = 8.0;
const CURRENCY_WEIGHT: f32 = 15.0;
const DATE_WEIGHT: f32 = 10.0;

struct LanguageSignals {
    language: Language,
    core: &'static [&'static str],
    support: &'static [&'static str],
    currency: Vec<Regex>,
    dates: Vec<Regex>,
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().map(|s| Regex::new(s).unwrap()).collect()
}

lazy_static! {
    /// Declaration order breaks ties: region variants that need distinctive
    /// markers (CH) come before their base language; the English baseline
    /// comes before its regions so generic text falls back to it.
    static ref SIGNALS: Vec<LanguageSignals> = vec![
        LanguageSignals {
            language: Language::En,
            core: &["invoice", "order number", "grand total", "order total", "subtotal"],
            support: &[
                "shipping",
                "sales tax",
                "estimated tax",
                "payment method",
                "sold by",
                "items ordered",
            ],
            currency: patterns(&[r"\$\s?\d", r"\bUSD\b"]),
            dates: patterns(&[
                r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},\s+\d{4}",
                r"\b\d{1,2}/\d{1,2}/\d{4}\b",
            ]),
        },
        LanguageSignals {
            language: Language::EnGb,
            core: &["vat invoice", "invoice", "order number", "dispatched"],
            support: &["postage & packing", "postage and packing", "vat rate", "delivery charge"],
            currency: patterns(&[r"£\s?\d", r"\bGBP\b"]),
            dates: patterns(&[
                r"(?i)\b\d{1,2}\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::EnCa,
            core: &["invoice", "order number", "order total"],
            support: &["gst", "hst", "pst", "shipping"],
            currency: patterns(&[r"\bCAD\b", r"C\$\s?\d", r"CA\$\s?\d"]),
            dates: patterns(&[
                r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},\s+\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::EnAu,
            core: &["tax invoice", "order number", "order total"],
            support: &["gst", "delivery", "dispatched"],
            currency: patterns(&[r"\bAUD\b", r"A\$\s?\d", r"AU\$\s?\d"]),
            dates: patterns(&[
                r"(?i)\b\d{1,2}\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::DeCh,
            core: &["rechnung", "bestellnummer"],
            support: &["mwst", "versandkosten", "schweiz"],
            currency: patterns(&[r"\bCHF\b", r"\bFr\.\s?\d"]),
            dates: patterns(&[r"\b\d{1,2}\.\d{1,2}\.\d{4}\b"]),
        },
        LanguageSignals {
            language: Language::De,
            core: &["rechnung", "bestellnummer", "zwischensumme", "gesamtbetrag"],
            support: &[
                "mwst",
                "umsatzsteuer",
                "versandkosten",
                "rechnungsdatum",
                "verkauft von",
                "verpackung",
            ],
            currency: patterns(&[r"\d,\d{2}\s?€", r"\bEUR\b"]),
            dates: patterns(&[
                r"\b\d{1,2}\.\d{1,2}\.\d{4}\b",
                r"(?i)\b\d{1,2}\.?\s(?:januar|februar|märz|april|mai|juni|juli|august|september|oktober|november|dezember)\s\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::Fr,
            core: &["facture", "numéro de la commande", "numéro de commande", "sous-total", "montant total"],
            support: &["tva", "livraison", "expédié par", "vendu par", "commande"],
            currency: patterns(&[r"\d,\d{2}\s?€"]),
            dates: patterns(&[
                r"(?i)\b\d{1,2}(?:er)?\s+(?:janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)\s+\d{4}",
                r"\b\d{1,2}/\d{1,2}/\d{4}\b",
            ]),
        },
        LanguageSignals {
            language: Language::Es,
            core: &["factura", "número del pedido", "número de pedido", "importe total", "pedido"],
            support: &["iva", "envío", "vendido por", "cantidad"],
            currency: patterns(&[r"\d,\d{2}\s?€"]),
            dates: patterns(&[
                r"(?i)\b\d{1,2}\s+de\s+(?:enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre)\s+de\s+\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::It,
            core: &["fattura", "numero dell'ordine", "numero ordine", "totale ordine", "subtotale"],
            support: &["iva", "spedizione", "venduto da", "ordine"],
            currency: patterns(&[r"\d,\d{2}\s?€"]),
            dates: patterns(&[
                r"(?i)\b\d{1,2}\s+(?:gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre)\s+\d{4}",
            ]),
        },
        LanguageSignals {
            language: Language::Ja,
            core: &["請求書", "注文番号", "小計", "合計"],
            support: &["消費税", "配送料", "注文日", "領収書"],
            currency: patterns(&[r"[¥￥]\s?\d", r"円"]),
            dates: patterns(&[r"\d{4}年\d{1,2}月\d{1,2}日"]),
        },
    ];
}

fn score(signals: &LanguageSignals, lower: &str, original: &str) -> f32 {
    let core: f32 = signals
        .core
        .iter()
        .filter(|term| lower.contains(*term))
        .count() as f32
        * CORE_WEIGHT;

    let support: f32 = signals
        .support
        .iter()
        .filter(|term| lower.contains(*term))
        .count() as f32
        * SUPPORT_WEIGHT;

    let currency: f32 = signals
        .currency
        .iter()
        .filter(|p| p.is_match(original))
        .count() as f32
        * CURRENCY_WEIGHT;

    let dates: f32 = signals
        .dates
        .iter()
        .filter(|p| p.is_match(original))
        .count() as f32
        * DATE_WEIGHT;

    core + support + currency + dates
}

/// Detect the language/region variant of the invoice text.
///
/// Confidence is `min(1.0, total / language_reference_score)`. Callers
/// fall back to the English baseline parser below
/// `language_fallback_threshold`; detection itself never fails.
pub fn detect_language(text: &str, config: &ClassificationConfig) -> LanguageDetectionResult {
    let lower = text.to_lowercase();

    let mut best = Language::En;
    let mut best_score = 0.0f32;

    for signals in SIGNALS.iter() {
        let total = score(signals, &lower, text);
        if total > best_score {
            best = signals.language;
            best_score = total;
        }
    }

    let confidence = (best_score / config.language_reference_score).min(1.0);
    debug!(
        "detected language {:?} with confidence {:.2}",
        best, confidence
    );

    LanguageDetectionResult {
        language: best,
        confidence,
    }
}
