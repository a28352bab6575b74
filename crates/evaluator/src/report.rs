//! Plant report written by the evaluator.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use ptas_core::alert::AlertDraft;
use ptas_core::anomaly::{Anomaly, ParameterOutcome};
use ptas_core::maintenance::MaintenancePrediction;
use ptas_core::measurement::{MeasurementRecord, Phase};
use ptas_core::normativity::{ComplianceReport, ComplianceSummary};
use ptas_core::plant_stats::{AlertStats, EquipmentStats, MeasurementKpis};
use ptas_core::trend::TrendResult;
use ptas_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, Serialize)]
pub struct PlantRef {
    pub id: DbId,
    pub name: String,
    pub code: String,
}

/// The most recent compliance-phase sample, which the compliance section
/// evaluates.
#[derive(Debug, Clone, Serialize)]
pub struct LastMeasurement {
    pub timestamp: Timestamp,
    pub phase: Phase,
    pub values: MeasurementRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentMaintenance {
    pub equipment_id: DbId,
    pub name: String,
    pub prediction: MaintenancePrediction,
}

/// Equipment left out of the maintenance section because its own settings
/// are unusable.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidEquipment {
    pub equipment_id: DbId,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantReport {
    pub evaluation_id: Uuid,
    pub generated_at: Timestamp,
    pub plant: PlantRef,
    /// Phase whose samples drive compliance, detection and trends.
    pub compliance_phase: Phase,
    /// Latest sample of the compliance phase.
    pub last_measurement: Option<LastMeasurement>,
    /// `None` when the compliance phase has no samples.
    pub compliance: Option<ComplianceReport>,
    pub compliance_summary: ComplianceSummary,
    pub detection: Vec<ParameterOutcome>,
    pub anomalies: Vec<Anomaly>,
    pub trends: BTreeMap<String, TrendResult>,
    pub recommendations: Vec<String>,
    pub maintenance: Vec<EquipmentMaintenance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_equipment: Vec<InvalidEquipment>,
    /// Drafts for violations, anomalies and due maintenance, in that order.
    pub alerts: Vec<AlertDraft>,
    pub kpis: MeasurementKpis,
    pub disinfection_kpis: MeasurementKpis,
    pub alert_stats: AlertStats,
    pub equipment_stats: EquipmentStats,
}
