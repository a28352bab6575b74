//! Moving-average trend classification for a single parameter series.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::threshold_validation::{validate_min_count, validate_positive};

/// Default moving-average window.
pub const DEFAULT_TREND_WINDOW: usize = 5;
/// Absolute slope under which a series is considered stable.
pub const DEFAULT_STABLE_SLOPE: f64 = 0.01;

/// Qualitative direction of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Stable,
    Increasing,
    Decreasing,
    InsufficientData,
}

/// Outcome of [`analyze_trend`]. Only `trend` is set when data is insufficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: TrendDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_value: Option<f64>,
}

impl TrendResult {
    pub fn insufficient_data() -> Self {
        Self {
            trend: TrendDirection::InsufficientData,
            slope: None,
            last_value: None,
            avg_value: None,
        }
    }
}

/// Trend analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub window: usize,
    pub stable_slope: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
            stable_slope: DEFAULT_STABLE_SLOPE,
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_min_count(self.window, 1, "trend window")?;
        validate_positive(self.stable_slope, "stable_slope")?;
        Ok(())
    }
}

/// Classify the direction of `values` (oldest first) with the default
/// stable-slope tolerance.
pub fn analyze_trend(values: &[f64], window: usize) -> TrendResult {
    analyze_trend_with(
        values,
        &TrendConfig {
            window,
            ..TrendConfig::default()
        },
    )
}

/// Classify the direction of `values` (oldest first).
///
/// The slope is the change between the first and last simple-moving-average
/// points divided by the number of moving-average points. At least two
/// moving-average points (`window + 1` values) are needed.
pub fn analyze_trend_with(values: &[f64], config: &TrendConfig) -> TrendResult {
    let window = config.window;
    if window == 0 || values.len() < window {
        return TrendResult::insufficient_data();
    }

    let moving_average: Vec<f64> = values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect();

    let (Some(first), Some(last)) = (moving_average.first(), moving_average.last()) else {
        return TrendResult::insufficient_data();
    };
    if moving_average.len() < 2 {
        return TrendResult::insufficient_data();
    }

    let slope = (last - first) / moving_average.len() as f64;
    let trend = if slope.abs() < config.stable_slope {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    TrendResult {
        trend,
        slope: Some(slope),
        last_value: values.last().copied(),
        avg_value: Some(values.iter().sum::<f64>() / values.len() as f64),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
