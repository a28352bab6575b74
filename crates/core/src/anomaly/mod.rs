//! Statistical anomaly detection over a window of measurement records.
//!
//! Each requested parameter is run through two independent methods
//! ([`zscore`] and [`iqr`]). A value can be reported once per method; the
//! results are not deduplicated. Detection is pure logic. The caller bounds
//! how much history it loads before calling in.

pub mod iqr;
pub mod stats;
pub mod zscore;

use serde::{Deserialize, Serialize};

use crate::alert::Severity;
use crate::error::CoreError;
use crate::measurement::MeasurementRecord;
use crate::threshold_validation::{validate_min_count, validate_positive};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Z-score above which a value is anomalous.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
/// Multiple of the z-score threshold above which an anomaly is critical.
pub const DEFAULT_ZSCORE_CRITICAL_FACTOR: f64 = 1.5;
/// Half-width of the reported z-score expected range, in standard deviations.
pub const DEFAULT_ZSCORE_DISPLAY_SIGMAS: f64 = 2.0;
/// Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
/// Distance from the median, in IQRs, above which an IQR anomaly is critical.
pub const DEFAULT_IQR_CRITICAL_FACTOR: f64 = 3.0;
/// Minimum records in the window and non-null values per parameter.
pub const DEFAULT_MIN_SAMPLES: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Detection method that produced an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionMethod {
    #[serde(rename = "z-score")]
    ZScore,
    #[serde(rename = "iqr")]
    Iqr,
}

impl DetectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZScore => "z-score",
            Self::Iqr => "iqr",
        }
    }
}

/// A value that deviates from the rest of its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub parameter: String,
    pub value: f64,
    /// `(low, high)` as computed by the detecting method.
    pub expected_range: (f64, f64),
    pub severity: Severity,
    pub message: String,
    pub method: DetectionMethod,
}

/// Tunable detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub zscore_threshold: f64,
    pub zscore_critical_factor: f64,
    pub zscore_display_sigmas: f64,
    pub iqr_multiplier: f64,
    pub iqr_critical_factor: f64,
    pub min_samples: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            zscore_critical_factor: DEFAULT_ZSCORE_CRITICAL_FACTOR,
            zscore_display_sigmas: DEFAULT_ZSCORE_DISPLAY_SIGMAS,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            iqr_critical_factor: DEFAULT_IQR_CRITICAL_FACTOR,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl DetectionConfig {
    /// Validate every threshold. `min_samples` must be at least 2 so that a
    /// spread can be computed.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_positive(self.zscore_threshold, "zscore_threshold")?;
        validate_positive(self.zscore_critical_factor, "zscore_critical_factor")?;
        validate_positive(self.zscore_display_sigmas, "zscore_display_sigmas")?;
        validate_positive(self.iqr_multiplier, "iqr_multiplier")?;
        validate_positive(self.iqr_critical_factor, "iqr_critical_factor")?;
        validate_min_count(self.min_samples, 2, "min_samples")?;
        Ok(())
    }
}

/// Why a parameter's detection could not be computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectionError {
    #[error("series is empty")]
    EmptySeries,

    #[error("non-finite value {value} at position {index}")]
    NonFiniteValue { index: usize, value: f64 },
}

/// Per-parameter result of a detection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParameterOutcome {
    /// Both methods ran. `anomalies` lists z-score findings before IQR ones.
    Evaluated {
        parameter: String,
        anomalies: Vec<Anomaly>,
    },
    /// Fewer non-null observations than the minimum sample size.
    InsufficientData {
        parameter: String,
        observed: usize,
        required: usize,
    },
    /// The series could not be evaluated; other parameters are unaffected.
    Failed {
        parameter: String,
        #[serde(serialize_with = "serialize_display")]
        error: DetectionError,
    },
}

impl ParameterOutcome {
    pub fn parameter(&self) -> &str {
        match self {
            Self::Evaluated { parameter, .. }
            | Self::InsufficientData { parameter, .. }
            | Self::Failed { parameter, .. } => parameter,
        }
    }

    /// Anomalies found, empty unless [`ParameterOutcome::Evaluated`].
    pub fn anomalies(&self) -> &[Anomaly] {
        match self {
            Self::Evaluated { anomalies, .. } => anomalies,
            _ => &[],
        }
    }
}

fn serialize_display<S: serde::Serializer>(
    error: &DetectionError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Run both detectors for every parameter and report per-parameter outcomes.
///
/// A window shorter than `config.min_samples` records yields no outcomes at
/// all. Records are expected oldest first; anomalies keep record order.
pub fn detect_by_parameter(
    records: &[MeasurementRecord],
    parameters: &[&str],
    config: &DetectionConfig,
) -> Vec<ParameterOutcome> {
    if records.len() < config.min_samples {
        tracing::debug!(
            records = records.len(),
            required = config.min_samples,
            "Window too short for anomaly detection",
        );
        return Vec::new();
    }

    parameters
        .iter()
        .map(|&parameter| detect_parameter(records, parameter, config))
        .collect()
}

/// Flattened anomalies of [`detect_by_parameter`], in parameter order.
pub fn detect_anomalies(
    records: &[MeasurementRecord],
    parameters: &[&str],
    config: &DetectionConfig,
) -> Vec<Anomaly> {
    detect_by_parameter(records, parameters, config)
        .into_iter()
        .flat_map(|outcome| match outcome {
            ParameterOutcome::Evaluated { anomalies, .. } => anomalies,
            _ => Vec::new(),
        })
        .collect()
}

fn detect_parameter(
    records: &[MeasurementRecord],
    parameter: &str,
    config: &DetectionConfig,
) -> ParameterOutcome {
    let values: Vec<f64> = records.iter().filter_map(|r| r.get(parameter)).collect();

    if values.len() < config.min_samples {
        tracing::debug!(
            parameter,
            observed = values.len(),
            required = config.min_samples,
            "Skipping parameter with insufficient data",
        );
        return ParameterOutcome::InsufficientData {
            parameter: parameter.to_string(),
            observed: values.len(),
            required: config.min_samples,
        };
    }

    match run_methods(parameter, &values, config) {
        Ok(anomalies) => ParameterOutcome::Evaluated {
            parameter: parameter.to_string(),
            anomalies,
        },
        Err(error) => {
            tracing::warn!(parameter, error = %error, "Anomaly detection failed for parameter");
            ParameterOutcome::Failed {
                parameter: parameter.to_string(),
                error,
            }
        }
    }
}

fn run_methods(
    parameter: &str,
    values: &[f64],
    config: &DetectionConfig,
) -> Result<Vec<Anomaly>, DetectionError> {
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DetectionError::NonFiniteValue { index, value });
    }

    let mut anomalies = zscore::detect(parameter, values, config)?;
    anomalies.extend(iqr::detect(parameter, values, config)?);
    Ok(anomalies)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::measurement::{PARAM_OD, PARAM_PH, PARAM_SST};

    fn window(parameter: &str, values: &[f64]) -> Vec<MeasurementRecord> {
        values
            .iter()
            .map(|&v| MeasurementRecord::new().with(parameter, v))
            .collect()
    }

    fn one_to_nine_and_hundred() -> Vec<f64> {
        (1..=9).map(f64::from).chain([100.0]).collect()
    }

    #[test]
    fn short_window_yields_nothing() {
        let records = window(PARAM_SST, &[1.0, 2.0, 3.0, 4.0, 500.0]);
        let outcomes = detect_by_parameter(&records, &[PARAM_SST], &DetectionConfig::default());
        assert!(outcomes.is_empty());
    }

    #[test]
    fn sparse_parameter_is_insufficient() {
        let mut records = window(PARAM_SST, &one_to_nine_and_hundred());
        for record in records.iter_mut().take(4) {
            record.set(PARAM_PH, Some(7.0));
        }
        let outcomes = detect_by_parameter(&records, &[PARAM_PH], &DetectionConfig::default());
        assert_matches!(
            &outcomes[0],
            ParameterOutcome::InsufficientData { observed: 4, required: 10, .. }
        );
    }

    #[test]
    fn iqr_catches_what_zscore_misses() {
        let records = window(PARAM_SST, &one_to_nine_and_hundred());
        let anomalies = detect_anomalies(&records, &[PARAM_SST], &DetectionConfig::default());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].value, 100.0);
        assert_eq!(anomalies[0].method, DetectionMethod::Iqr);
    }

    #[test]
    fn zero_variance_has_no_zscore_anomalies() {
        let records = window(PARAM_PH, &[7.2; 12]);
        let anomalies = detect_anomalies(&records, &[PARAM_PH], &DetectionConfig::default());
        assert!(anomalies
            .iter()
            .all(|a| a.method != DetectionMethod::ZScore));
    }

    #[test]
    fn same_value_reported_once_per_method() {
        let mut values: Vec<f64> = (0..29).map(|i| if i % 2 == 0 { 10.1 } else { 9.9 }).collect();
        values.push(50.0);
        let records = window(PARAM_SST, &values);
        let anomalies = detect_anomalies(&records, &[PARAM_SST], &DetectionConfig::default());

        let methods: Vec<_> = anomalies.iter().map(|a| a.method).collect();
        assert_eq!(methods, vec![DetectionMethod::ZScore, DetectionMethod::Iqr]);
        assert!(anomalies.iter().all(|a| a.value == 50.0));
    }

    #[test]
    fn non_finite_value_fails_only_that_parameter() {
        let mut records = window(PARAM_SST, &one_to_nine_and_hundred());
        for (i, record) in records.iter_mut().enumerate() {
            let od = if i == 3 { f64::NAN } else { 4.0 + i as f64 * 0.1 };
            record.set(PARAM_OD, Some(od));
        }

        let outcomes = detect_by_parameter(
            &records,
            &[PARAM_OD, PARAM_SST],
            &DetectionConfig::default(),
        );

        assert_matches!(
            &outcomes[0],
            ParameterOutcome::Failed {
                error: DetectionError::NonFiniteValue { index: 3, .. },
                ..
            }
        );
        assert_matches!(
            &outcomes[1],
            ParameterOutcome::Evaluated { anomalies, .. } if anomalies.len() == 1
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ParameterOutcome::InsufficientData {
            parameter: "od".into(),
            observed: 3,
            required: 10,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["parameter"], "od");
    }

    #[test]
    fn failed_outcome_serializes_error_text() {
        let outcome = ParameterOutcome::Failed {
            parameter: "od".into(),
            error: DetectionError::EmptySeries,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"], "series is empty");
    }

    #[test]
    fn method_tags_serialize_as_wire_names() {
        assert_eq!(serde_json::to_value(DetectionMethod::ZScore).unwrap(), "z-score");
        assert_eq!(serde_json::to_value(DetectionMethod::Iqr).unwrap(), "iqr");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = DetectionConfig {
            iqr_multiplier: 0.0,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectionConfig {
            min_samples: 1,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
