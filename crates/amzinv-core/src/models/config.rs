//! Configuration for the extraction pipeline.
//!
//! The discrepancy cutoffs and plausibility bounds are empirically tuned
//! policy constants; they live here rather than in the checking code so
//! deployments can adjust them without touching the rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration for the amzinv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Format and language classification thresholds.
    pub classification: ClassificationConfig,

    /// Field extraction settings.
    pub extraction: ExtractionConfig,

    /// Validation thresholds and penalties.
    pub validation: ValidationConfig,

    /// Error recovery settings.
    pub recovery: RecoveryConfig,
}

/// Classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Minimum format signature score; below it the format is Unknown.
    pub format_min_score: f32,

    /// Score at which format confidence saturates at 1.0.
    pub format_reference_score: f32,

    /// Language score at which detection confidence saturates at 1.0.
    pub language_reference_score: f32,

    /// Below this confidence the English baseline parser is selected.
    pub language_fallback_threshold: f32,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            format_min_score: 2.0,
            format_reference_score: 6.0,
            language_reference_score: 60.0,
            language_fallback_threshold: 0.5,
        }
    }
}

/// Field extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// A matched price above this is treated as digit-merge corruption,
    /// not ground truth.
    pub ocr_merge_threshold: Decimal,

    /// Maximum lines scanned after an item anchor.
    pub item_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_merge_threshold: Decimal::new(1000, 0),
            item_window: 8,
        }
    }
}

/// Validation thresholds and score penalties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Item/subtotal gaps up to this pass silently.
    pub rounding_tolerance: Decimal,

    /// Gaps up to this produce a minor-discrepancy warning; anything
    /// larger is a critical mismatch.
    pub minor_discrepancy_bound: Decimal,

    /// Single item price above this draws a warning.
    pub price_suspect_bound: Decimal,

    /// Single item price above this is a critical error.
    pub price_corrupt_bound: Decimal,

    /// Score deduction per critical error.
    pub critical_penalty: u8,

    /// Score deduction per recoverable warning.
    pub warning_penalty: u8,

    /// Score deduction per informational warning.
    pub info_penalty: u8,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rounding_tolerance: Decimal::new(10, 2),
            minor_discrepancy_bound: Decimal::new(100, 2),
            price_suspect_bound: Decimal::new(1000, 0),
            price_corrupt_bound: Decimal::new(10000, 0),
            critical_penalty: 25,
            warning_penalty: 10,
            info_penalty: 5,
        }
    }
}

/// Error recovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Minimum confidence for the critical fields (order number and order
    /// date) for a recovered record to count as usable.
    pub usable_threshold: f32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            usable_threshold: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
