//! Z-score detection: distance from the window mean in population standard
//! deviations.

use super::stats::{mean, population_std_dev};
use super::{Anomaly, DetectionConfig, DetectionError, DetectionMethod};
use crate::alert::Severity;

/// Flag values whose z-score exceeds `config.zscore_threshold`.
///
/// A window with zero spread cannot distinguish outliers and yields no
/// anomalies. The reported expected range is
/// `mean ± zscore_display_sigmas · σ`, independent of the trigger threshold.
pub fn detect(
    parameter: &str,
    values: &[f64],
    config: &DetectionConfig,
) -> Result<Vec<Anomaly>, DetectionError> {
    let mean = mean(values).ok_or(DetectionError::EmptySeries)?;
    let std_dev = population_std_dev(values).ok_or(DetectionError::EmptySeries)?;

    if std_dev == 0.0 {
        return Ok(Vec::new());
    }

    let critical_score = config.zscore_threshold * config.zscore_critical_factor;
    let half_width = config.zscore_display_sigmas * std_dev;
    let expected_range = (mean - half_width, mean + half_width);

    let anomalies = values
        .iter()
        .filter_map(|&value| {
            let z = (value - mean).abs() / std_dev;
            if z <= config.zscore_threshold {
                return None;
            }
            let severity = if z > critical_score {
                Severity::Critical
            } else {
                Severity::Warning
            };
            Some(Anomaly {
                parameter: parameter.to_string(),
                value,
                expected_range,
                severity,
                message: format!(
                    "{parameter} presenta desviación estadísticamente significativa (z={z:.2})"
                ),
                method: DetectionMethod::ZScore,
            })
        })
        .collect();

    Ok(anomalies)
}
