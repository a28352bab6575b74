//! Dashboard statistics: measurement KPIs, alert and equipment counts, and
//! trend series extraction.
//!
//! Pure aggregation over rows the caller already fetched.

use serde::{Deserialize, Serialize};

use crate::alert::AlertSeverity;
use crate::error::CoreError;
use crate::measurement::{
    MeasurementSample, Phase, ValidationState, PARAM_CAUDAL_EFFLUENT, PARAM_CHLORINE_FREE,
    PARAM_DBO5, PARAM_OD, PARAM_PH, PARAM_SST, PARAM_TEMPERATURE,
};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Measurement KPIs
// ---------------------------------------------------------------------------

/// Averages and validation rate over a set of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementKpis {
    pub total_measurements: usize,
    /// Percentage of validated samples, rounded to two decimals.
    pub compliance_rate: f64,
    pub avg_ph: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub avg_sst: Option<f64>,
    pub avg_dbo5: Option<f64>,
    pub avg_caudal: Option<f64>,
    pub avg_chlorine: Option<f64>,
}

/// Compute KPIs over every sample.
pub fn measurement_kpis(samples: &[MeasurementSample]) -> MeasurementKpis {
    kpis_over(samples.iter())
}

/// Compute KPIs over the final disinfection stage only.
pub fn disinfection_kpis(samples: &[MeasurementSample]) -> MeasurementKpis {
    kpis_over(samples.iter().filter(|s| s.phase == Phase::Desinfeccion))
}

fn kpis_over<'a>(samples: impl Iterator<Item = &'a MeasurementSample>) -> MeasurementKpis {
    let samples: Vec<&MeasurementSample> = samples.collect();
    let total = samples.len();
    let validated = samples
        .iter()
        .filter(|s| s.validated == ValidationState::Validated)
        .count();
    let compliance_rate = if total == 0 {
        0.0
    } else {
        round2(validated as f64 / total as f64 * 100.0)
    };

    let average = |parameter: &str| {
        let values: Vec<f64> = samples.iter().filter_map(|s| s.values.get(parameter)).collect();
        if values.is_empty() {
            None
        } else {
            Some(round2(values.iter().sum::<f64>() / values.len() as f64))
        }
    };

    MeasurementKpis {
        total_measurements: total,
        compliance_rate,
        avg_ph: average(PARAM_PH),
        avg_temperature: average(PARAM_TEMPERATURE),
        avg_sst: average(PARAM_SST),
        avg_dbo5: average(PARAM_DBO5),
        avg_caudal: average(PARAM_CAUDAL_EFFLUENT),
        avg_chlorine: average(PARAM_CHLORINE_FREE),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Alert statistics
// ---------------------------------------------------------------------------

/// The fields of a stored alert that the statistics need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRow {
    pub severity: AlertSeverity,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub ds90_violation: bool,
    #[serde(default)]
    pub ds609_violation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    /// Active alerts with critical severity.
    pub critical: usize,
    /// Active alerts with medium severity.
    pub warning: usize,
    pub ds90_violations: usize,
    pub ds609_violations: usize,
}

/// Count alerts by resolution, severity and norm.
///
/// Medium-severity alerts are what the dashboard shows as warnings.
pub fn alert_stats(alerts: &[AlertRow]) -> AlertStats {
    alerts.iter().fold(AlertStats::default(), |mut stats, alert| {
        stats.total += 1;
        if alert.is_resolved {
            stats.resolved += 1;
        } else {
            stats.active += 1;
            match alert.severity {
                AlertSeverity::Critical => stats.critical += 1,
                AlertSeverity::Medium => stats.warning += 1,
                _ => {}
            }
        }
        if alert.ds90_violation {
            stats.ds90_violations += 1;
        }
        if alert.ds609_violation {
            stats.ds609_violations += 1;
        }
        stats
    })
}

// ---------------------------------------------------------------------------
// Equipment statistics
// ---------------------------------------------------------------------------

/// Operational state of a piece of equipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Broken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EquipmentStats {
    pub total: usize,
    pub active: usize,
    pub maintenance: usize,
    pub broken: usize,
}

pub fn equipment_stats(statuses: &[EquipmentStatus]) -> EquipmentStats {
    let count = |wanted: EquipmentStatus| statuses.iter().filter(|&&s| s == wanted).count();
    EquipmentStats {
        total: statuses.len(),
        active: count(EquipmentStatus::Active),
        maintenance: count(EquipmentStatus::Maintenance),
        broken: count(EquipmentStatus::Broken),
    }
}

// ---------------------------------------------------------------------------
// Trend series
// ---------------------------------------------------------------------------

/// Parameters selectable for a trend chart, with their short aliases.
const TREND_ALIASES: &[(&str, &str)] = &[
    ("ph", PARAM_PH),
    ("temperature", PARAM_TEMPERATURE),
    ("caudal", PARAM_CAUDAL_EFFLUENT),
    ("sst", PARAM_SST),
    ("dbo5", PARAM_DBO5),
    ("od", PARAM_OD),
    ("chlorine", PARAM_CHLORINE_FREE),
];

/// Resolve a trend alias (`caudal`, `chlorine`, ...) to its record field.
///
/// Full field names of chartable parameters are accepted as well.
pub fn resolve_trend_parameter(name: &str) -> Result<&'static str, CoreError> {
    TREND_ALIASES
        .iter()
        .find(|(alias, field)| *alias == name || *field == name)
        .map(|(_, field)| *field)
        .ok_or_else(|| {
            let valid: Vec<&str> = TREND_ALIASES.iter().map(|(alias, _)| *alias).collect();
            CoreError::Validation(format!(
                "Unknown trend parameter: '{name}'. Valid parameters: {}",
                valid.join(", ")
            ))
        })
}

/// A timestamped value of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Extract the series of `parameter` from samples, in input order, skipping
/// samples where it was not measured.
pub fn trend_series(
    samples: &[MeasurementSample],
    parameter: &str,
) -> Result<Vec<TrendPoint>, CoreError> {
    let field = resolve_trend_parameter(parameter)?;
    Ok(samples
        .iter()
        .filter_map(|s| {
            s.values.get(field).map(|value| TrendPoint {
                timestamp: s.timestamp,
                value,
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::measurement::MeasurementRecord;

    fn sample(
        hour: u32,
        phase: Phase,
        validated: ValidationState,
        values: MeasurementRecord,
    ) -> MeasurementSample {
        MeasurementSample {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
            phase,
            validated,
            values,
        }
    }

    fn samples() -> Vec<MeasurementSample> {
        vec![
            sample(
                8,
                Phase::Desinfeccion,
                ValidationState::Validated,
                MeasurementRecord::new().with(PARAM_PH, 7.0).with(PARAM_CHLORINE_FREE, 1.0),
            ),
            sample(
                9,
                Phase::Desinfeccion,
                ValidationState::Pending,
                MeasurementRecord::new().with(PARAM_PH, 7.5),
            ),
            sample(
                10,
                Phase::Reactor,
                ValidationState::Validated,
                MeasurementRecord::new().with(PARAM_OD, 2.5).with(PARAM_PH, 6.0),
            ),
        ]
    }

    // -- KPIs -----------------------------------------------------------------

    #[test]
    fn kpis_of_empty_set() {
        let kpis = measurement_kpis(&[]);
        assert_eq!(kpis.total_measurements, 0);
        assert_eq!(kpis.compliance_rate, 0.0);
        assert_eq!(kpis.avg_ph, None);
    }

    #[test]
    fn kpis_over_all_phases() {
        let kpis = measurement_kpis(&samples());
        assert_eq!(kpis.total_measurements, 3);
        assert_eq!(kpis.compliance_rate, 66.67);
        assert_eq!(kpis.avg_ph, Some(6.83));
        assert_eq!(kpis.avg_sst, None);
    }

    #[test]
    fn disinfection_kpis_filter_phase() {
        let kpis = disinfection_kpis(&samples());
        assert_eq!(kpis.total_measurements, 2);
        assert_eq!(kpis.compliance_rate, 50.0);
        assert_eq!(kpis.avg_ph, Some(7.25));
        assert_eq!(kpis.avg_chlorine, Some(1.0));
    }

    // -- Alert stats ----------------------------------------------------------

    #[test]
    fn alert_stats_count_only_active_severities() {
        let row = |severity, is_resolved, ds90| AlertRow {
            severity,
            is_resolved,
            ds90_violation: ds90,
            ds609_violation: false,
        };
        let stats = alert_stats(&[
            row(AlertSeverity::Critical, false, true),
            row(AlertSeverity::Critical, true, true),
            row(AlertSeverity::Medium, false, false),
            row(AlertSeverity::Low, false, false),
        ]);
        assert_eq!(
            stats,
            AlertStats {
                total: 4,
                active: 3,
                resolved: 1,
                critical: 1,
                warning: 1,
                ds90_violations: 2,
                ds609_violations: 0,
            }
        );
    }

    // -- Equipment stats ------------------------------------------------------

    #[test]
    fn equipment_stats_by_status() {
        let stats = equipment_stats(&[
            EquipmentStatus::Active,
            EquipmentStatus::Active,
            EquipmentStatus::Broken,
            EquipmentStatus::Inactive,
        ]);
        assert_eq!(
            stats,
            EquipmentStats {
                total: 4,
                active: 2,
                maintenance: 0,
                broken: 1,
            }
        );
    }

    // -- Trend series ---------------------------------------------------------

    #[test]
    fn aliases_resolve_to_fields() {
        assert_eq!(resolve_trend_parameter("caudal").unwrap(), PARAM_CAUDAL_EFFLUENT);
        assert_eq!(resolve_trend_parameter("chlorine").unwrap(), PARAM_CHLORINE_FREE);
        assert_eq!(resolve_trend_parameter("chlorine_free").unwrap(), PARAM_CHLORINE_FREE);
    }

    #[test]
    fn unknown_trend_parameter_rejected() {
        assert!(resolve_trend_parameter("nitrogen").is_err());
    }

    #[test]
    fn series_skips_missing_values() {
        let points = trend_series(&samples(), "chlorine").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 1.0);

        let ph = trend_series(&samples(), "ph").unwrap();
        let values: Vec<f64> = ph.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![7.0, 7.5, 6.0]);
    }
}
