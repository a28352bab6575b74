//! Evaluation request: everything the upstream service loaded for one plant.

use serde::Deserialize;

use ptas_core::maintenance::HoursRecord;
use ptas_core::measurement::{MeasurementSample, MEASURED_PARAMETERS};
use ptas_core::plant_stats::{AlertRow, EquipmentStatus};
use ptas_core::types::DbId;

fn enabled() -> bool {
    true
}

/// Plant identity and norm applicability.
#[derive(Debug, Clone, Deserialize)]
pub struct PlantInfo {
    pub id: DbId,
    pub name: String,
    pub code: String,
    #[serde(default = "enabled")]
    pub ds90_enabled: bool,
    #[serde(default = "enabled")]
    pub ds609_enabled: bool,
}

/// One piece of equipment with its run-hour history.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentHistory {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub status: EquipmentStatus,
    /// Overrides the configured service interval for this equipment.
    #[serde(default)]
    pub max_hours: Option<f64>,
    #[serde(default)]
    pub hours: Vec<HoursRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantEvaluationRequest {
    pub plant: PlantInfo,
    /// Measurement history. Sorted by timestamp before evaluation.
    #[serde(default)]
    pub measurements: Vec<MeasurementSample>,
    /// Parameters for anomaly detection and trends; defaults to
    /// [`MEASURED_PARAMETERS`].
    #[serde(default)]
    pub monitored_parameters: Option<Vec<String>>,
    #[serde(default)]
    pub equipment: Vec<EquipmentHistory>,
    /// Alerts already stored for the plant, for the statistics section.
    #[serde(default)]
    pub alerts: Vec<AlertRow>,
}

impl PlantEvaluationRequest {
    /// Monitored parameter names, falling back to the measured vocabulary.
    pub fn parameters(&self) -> Vec<&str> {
        match &self.monitored_parameters {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => MEASURED_PARAMETERS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_uses_defaults() {
        let request: PlantEvaluationRequest = serde_json::from_str(
            r#"{"plant": {"id": 3, "name": "PTAS Lonquimay", "code": "LNQ"}}"#,
        )
        .unwrap();
        assert!(request.plant.ds90_enabled);
        assert!(request.plant.ds609_enabled);
        assert!(request.measurements.is_empty());
        assert_eq!(request.parameters(), MEASURED_PARAMETERS.to_vec());
    }

    #[test]
    fn explicit_parameters_win() {
        let request: PlantEvaluationRequest = serde_json::from_str(
            r#"{
                "plant": {"id": 3, "name": "PTAS Lonquimay", "code": "LNQ", "ds609_enabled": false},
                "monitored_parameters": ["ph", "od"],
                "equipment": [{"id": 1, "name": "Soplador 1", "status": "maintenance"}]
            }"#,
        )
        .unwrap();
        assert!(!request.plant.ds609_enabled);
        assert_eq!(request.parameters(), vec!["ph", "od"]);
        assert_eq!(request.equipment[0].status, EquipmentStatus::Maintenance);
        assert!(request.equipment[0].hours.is_empty());
    }
}
