//! Run-hour based maintenance prediction for plant equipment.
//!
//! Sums the recorded operating hours of one piece of equipment and places
//! the remaining hours before the service interval in an urgency band.

use serde::{Deserialize, Serialize};

use crate::alert::AlertSeverity;
use crate::error::CoreError;
use crate::threshold_validation::{validate_ascending, validate_positive};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Operating hours between services.
pub const DEFAULT_MAX_HOURS: f64 = 10_000.0;
/// Remaining hours below which maintenance is imminent.
pub const DEFAULT_IMMINENT_BELOW: f64 = 500.0;
/// Remaining hours below which maintenance is upcoming.
pub const DEFAULT_UPCOMING_BELOW: f64 = 2_000.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One daily run-hour entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursRecord {
    /// Missing entries count as zero hours.
    #[serde(default)]
    pub hours_run: f64,
    #[serde(default)]
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub energy_kwh: Option<f64>,
}

impl HoursRecord {
    pub fn new(hours_run: f64) -> Self {
        Self {
            hours_run,
            date: None,
            energy_kwh: None,
        }
    }
}

/// Urgency bands, all in operating hours. Band boundaries are half-open:
/// a remaining value equal to a boundary belongs to the less urgent band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceBands {
    pub max_hours: f64,
    pub imminent_below: f64,
    pub upcoming_below: f64,
}

impl Default for MaintenanceBands {
    fn default() -> Self {
        Self {
            max_hours: DEFAULT_MAX_HOURS,
            imminent_below: DEFAULT_IMMINENT_BELOW,
            upcoming_below: DEFAULT_UPCOMING_BELOW,
        }
    }
}

impl MaintenanceBands {
    /// Same bands with a different service interval.
    pub fn with_max_hours(&self, max_hours: f64) -> Self {
        Self {
            max_hours,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_positive(self.max_hours, "max_hours")?;
        validate_positive(self.imminent_below, "imminent_below")?;
        validate_ascending(
            self.imminent_below,
            self.upcoming_below,
            "imminent_below",
            "upcoming_below",
        )?;
        Ok(())
    }
}

/// Maintenance urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Ok,
    Upcoming,
    Imminent,
    Overdue,
    NoData,
}

impl MaintenanceStatus {
    /// Spanish label used in alert titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "al día",
            Self::Upcoming => "próximo",
            Self::Imminent => "inminente",
            Self::Overdue => "vencido",
            Self::NoData => "sin datos",
        }
    }
}

/// Prediction for one piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenancePrediction {
    pub status: MaintenanceStatus,
    pub message: String,
    /// `None` only for [`MaintenanceStatus::NoData`].
    pub priority: Option<AlertSeverity>,
    pub total_hours: Option<f64>,
    pub hours_remaining: Option<f64>,
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Predict maintenance urgency from run-hour history.
///
/// | Remaining hours                     | Status     | Priority |
/// |-------------------------------------|------------|----------|
/// | `< 0`                               | `overdue`  | critical |
/// | `[0, imminent_below)`               | `imminent` | high     |
/// | `[imminent_below, upcoming_below)`  | `upcoming` | medium   |
/// | `>= upcoming_below`                 | `ok`       | low      |
pub fn predict_maintenance(
    records: &[HoursRecord],
    bands: &MaintenanceBands,
) -> MaintenancePrediction {
    if records.is_empty() {
        return MaintenancePrediction {
            status: MaintenanceStatus::NoData,
            message: "Sin registros de horas de operación.".to_string(),
            priority: None,
            total_hours: None,
            hours_remaining: None,
        };
    }

    let total_hours: f64 = records.iter().map(|r| r.hours_run).sum();
    let remaining = bands.max_hours - total_hours;

    let (status, priority, message) = if remaining < 0.0 {
        (
            MaintenanceStatus::Overdue,
            AlertSeverity::Critical,
            format!("Mantenimiento overdue. Excedido por {} horas.", remaining.abs()),
        )
    } else if remaining < bands.imminent_below {
        (
            MaintenanceStatus::Imminent,
            AlertSeverity::High,
            format!("Mantenimiento recomendado en {remaining} horas."),
        )
    } else if remaining < bands.upcoming_below {
        (
            MaintenanceStatus::Upcoming,
            AlertSeverity::Medium,
            format!("Próximo mantenimiento en {remaining} horas."),
        )
    } else {
        (
            MaintenanceStatus::Ok,
            AlertSeverity::Low,
            format!("Equipo en buen estado. {remaining} horas restantes."),
        )
    };

    MaintenancePrediction {
        status,
        message,
        priority: Some(priority),
        total_hours: Some(total_hours),
        hours_remaining: Some(remaining),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn predict(hours: &[f64]) -> MaintenancePrediction {
        let records: Vec<HoursRecord> = hours.iter().copied().map(HoursRecord::new).collect();
        predict_maintenance(&records, &MaintenanceBands::default())
    }

    #[test]
    fn no_records_is_no_data() {
        let p = predict(&[]);
        assert_eq!(p.status, MaintenanceStatus::NoData);
        assert_eq!(p.priority, None);
        assert_eq!(p.hours_remaining, None);
    }

    #[test]
    fn exactly_at_interval_is_imminent() {
        let p = predict(&[4000.0, 6000.0]);
        assert_eq!(p.hours_remaining, Some(0.0));
        assert_eq!(p.status, MaintenanceStatus::Imminent);
        assert_eq!(p.priority, Some(AlertSeverity::High));
        assert_eq!(p.message, "Mantenimiento recomendado en 0 horas.");
    }

    #[test]
    fn fractional_hours_keep_their_decimals() {
        let p = predict(&[8_499.5]);
        assert_eq!(p.message, "Próximo mantenimiento en 1500.5 horas.");
    }

    #[test]
    fn past_interval_is_overdue() {
        let p = predict(&[10_250.0]);
        assert_eq!(p.status, MaintenanceStatus::Overdue);
        assert_eq!(p.priority, Some(AlertSeverity::Critical));
        assert_eq!(p.message, "Mantenimiento overdue. Excedido por 250 horas.");
    }

    #[test]
    fn band_boundaries_belong_to_less_urgent_band() {
        assert_eq!(predict(&[9_500.0]).status, MaintenanceStatus::Upcoming);
        assert_eq!(predict(&[8_000.0]).status, MaintenanceStatus::Ok);
        assert_eq!(predict(&[9_500.5]).status, MaintenanceStatus::Imminent);
        assert_eq!(predict(&[8_000.5]).status, MaintenanceStatus::Upcoming);
    }

    #[test]
    fn fresh_equipment_is_ok() {
        let p = predict(&[8.0, 12.0, 24.0]);
        assert_eq!(p.status, MaintenanceStatus::Ok);
        assert_eq!(p.priority, Some(AlertSeverity::Low));
        assert_eq!(p.total_hours, Some(44.0));
        assert_eq!(p.message, "Equipo en buen estado. 9956 horas restantes.");
    }

    #[test]
    fn missing_hours_count_as_zero() {
        let records: Vec<HoursRecord> =
            serde_json::from_str(r#"[{"hours_run": 9800.0}, {"energy_kwh": 12.5}]"#).unwrap();
        let p = predict_maintenance(&records, &MaintenanceBands::default());
        assert_eq!(p.total_hours, Some(9800.0));
        assert_eq!(p.status, MaintenanceStatus::Imminent);
    }

    #[test]
    fn custom_interval() {
        let bands = MaintenanceBands::default().with_max_hours(3_000.0);
        let p = predict_maintenance(&[HoursRecord::new(1_200.0)], &bands);
        assert_eq!(p.status, MaintenanceStatus::Upcoming);
    }

    #[test]
    fn bands_validation() {
        assert!(MaintenanceBands::default().validate().is_ok());
        let inverted = MaintenanceBands {
            imminent_below: 2_500.0,
            ..MaintenanceBands::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(MaintenanceStatus::NoData).unwrap();
        assert_eq!(json, "no_data");
    }
}
