//! Interquartile-range detection (Tukey fences).

use super::stats::{median, percentile, sorted};
use super::{Anomaly, DetectionConfig, DetectionError, DetectionMethod};
use crate::alert::Severity;

/// Flag values outside `[Q1 - k·IQR, Q3 + k·IQR]` with `k = iqr_multiplier`.
///
/// Quartiles are linearly interpolated. A flagged value is critical when its
/// distance from the median exceeds `iqr_critical_factor · IQR`.
pub fn detect(
    parameter: &str,
    values: &[f64],
    config: &DetectionConfig,
) -> Result<Vec<Anomaly>, DetectionError> {
    let ordered = sorted(values);
    let q1 = percentile(&ordered, 25.0).ok_or(DetectionError::EmptySeries)?;
    let q3 = percentile(&ordered, 75.0).ok_or(DetectionError::EmptySeries)?;
    let median = median(&ordered).ok_or(DetectionError::EmptySeries)?;
    let iqr = q3 - q1;

    let lower = q1 - config.iqr_multiplier * iqr;
    let upper = q3 + config.iqr_multiplier * iqr;
    let critical_distance = config.iqr_critical_factor * iqr;

    let anomalies = values
        .iter()
        .filter(|&&value| value < lower || value > upper)
        .map(|&value| {
            let severity = if (value - median).abs() > critical_distance {
                Severity::Critical
            } else {
                Severity::Warning
            };
            Anomaly {
                parameter: parameter.to_string(),
                value,
                expected_range: (lower, upper),
                severity,
                message: format!("{parameter} está fuera del rango esperado (IQR)"),
                method: DetectionMethod::Iqr,
            }
        })
        .collect();

    Ok(anomalies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_nine_and_hundred() -> Vec<f64> {
        (1..=9).map(f64::from).chain([100.0]).collect()
    }

    #[test]
    fn flags_only_the_far_value() {
        let anomalies = detect("sst", &one_to_nine_and_hundred(), &DetectionConfig::default())
            .unwrap();

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].value, 100.0);
        assert_eq!(anomalies[0].method, DetectionMethod::Iqr);
    }

    #[test]
    fn fences_use_interpolated_quartiles() {
        let anomalies = detect("sst", &one_to_nine_and_hundred(), &DetectionConfig::default())
            .unwrap();
        // Q1 = 3.25, Q3 = 7.75, IQR = 4.5.
        let (low, high) = anomalies[0].expected_range;
        assert!((low - -3.5).abs() < 1e-9);
        assert!((high - 14.5).abs() < 1e-9);
    }

    #[test]
    fn far_from_median_is_critical() {
        let anomalies = detect("sst", &one_to_nine_and_hundred(), &DetectionConfig::default())
            .unwrap();
        assert_eq!(anomalies[0].severity, Severity::Critical);
    }

    #[test]
    fn just_outside_fence_is_warning() {
        // Q1 = 3.25, Q3 = 7.75, upper fence 14.5, median 5.5; 15 is 9.5 from
        // the median, under the 13.5 critical distance.
        let values: Vec<f64> = (1..=9).map(f64::from).chain([15.0]).collect();
        let anomalies = detect("sst", &values, &DetectionConfig::default()).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, Severity::Warning);
    }

    #[test]
    fn low_outliers_are_flagged() {
        let values: Vec<f64> = [-40.0].into_iter().chain((1..=9).map(f64::from)).collect();
        let anomalies = detect("od", &values, &DetectionConfig::default()).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].value, -40.0);
    }

    #[test]
    fn reports_in_input_order() {
        let values = vec![100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, -90.0];
        let anomalies = detect("ph", &values, &DetectionConfig::default()).unwrap();
        let flagged: Vec<f64> = anomalies.iter().map(|a| a.value).collect();
        assert_eq!(flagged, vec![100.0, -90.0]);
    }

    #[test]
    fn message_names_parameter() {
        let anomalies = detect("dqo", &one_to_nine_and_hundred(), &DetectionConfig::default())
            .unwrap();
        assert_eq!(anomalies[0].message, "dqo está fuera del rango esperado (IQR)");
    }
}
