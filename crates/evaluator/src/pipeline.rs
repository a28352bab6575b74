//! Plant evaluation pipeline: runs every core evaluator over one request.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use ptas_core::alert::AlertDraft;
use ptas_core::anomaly::{detect_by_parameter, ParameterOutcome};
use ptas_core::config::EngineConfig;
use ptas_core::maintenance::predict_maintenance;
use ptas_core::measurement::{MeasurementRecord, MeasurementSample};
use ptas_core::normativity::{check_all, ComplianceSummary};
use ptas_core::plant_stats::{alert_stats, disinfection_kpis, equipment_stats, measurement_kpis};
use ptas_core::recommendations::generate_recommendations;
use ptas_core::trend::analyze_trend_with;

use crate::error::{EvaluatorError, EvaluatorResult};
use crate::report::{
    EquipmentMaintenance, InvalidEquipment, LastMeasurement, PlantRef, PlantReport,
};
use crate::request::PlantEvaluationRequest;

/// Read a request file and evaluate it.
pub async fn evaluate_file(path: &Path, config: &EngineConfig) -> EvaluatorResult<PlantReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| EvaluatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let request: PlantEvaluationRequest = serde_json::from_str(&raw)?;
    tracing::info!(
        path = %path.display(),
        plant_id = request.plant.id,
        measurements = request.measurements.len(),
        equipment = request.equipment.len(),
        "Loaded evaluation request",
    );
    Ok(evaluate_plant(&request, config))
}

/// Evaluate one plant.
///
/// Only samples of `config.compliance_phase` are evaluated: compliance is
/// checked on the most recent one, detection and trends run over all of
/// them, oldest first. KPIs cover every phase.
#[tracing::instrument(skip_all, fields(plant_id = request.plant.id))]
pub fn evaluate_plant(request: &PlantEvaluationRequest, config: &EngineConfig) -> PlantReport {
    let phase = config.compliance_phase;
    let mut samples: Vec<&MeasurementSample> = request
        .measurements
        .iter()
        .filter(|s| s.phase == phase)
        .collect();
    let other_phases = request.measurements.len() - samples.len();
    if other_phases > 0 {
        tracing::debug!(%phase, other_phases, "Ignoring samples from other phases");
    }
    samples.sort_by_key(|s| s.timestamp);
    let records: Vec<MeasurementRecord> = samples.iter().map(|s| s.values.clone()).collect();
    let latest = samples.last().copied();

    // Compliance on the latest sample.
    let compliance = latest.map(|s| {
        check_all(&s.values, request.plant.ds90_enabled, request.plant.ds609_enabled)
    });
    let compliance_summary = compliance
        .as_ref()
        .map(ComplianceSummary::from_report)
        .unwrap_or(ComplianceSummary {
            ds90_compliant: true,
            ds609_compliant: true,
            last_violation: None,
        });
    if let Some(report) = compliance.as_ref().filter(|r| !r.compliant) {
        tracing::info!(
            violations = report.violations.len(),
            "Latest measurement is not compliant",
        );
    }

    // Detection and trends over the history.
    let parameters = request.parameters();
    let detection = detect_by_parameter(&records, &parameters, &config.detection);
    let anomalies: Vec<_> = detection
        .iter()
        .flat_map(|outcome| outcome.anomalies().iter().cloned())
        .collect();
    let failed = detection
        .iter()
        .filter(|o| matches!(o, ParameterOutcome::Failed { .. }))
        .count();
    tracing::info!(
        parameters = parameters.len(),
        anomalies = anomalies.len(),
        failed,
        "Anomaly detection complete",
    );

    let trends = parameters
        .iter()
        .map(|&parameter| {
            let series: Vec<f64> = records.iter().filter_map(|r| r.get(parameter)).collect();
            (parameter.to_string(), analyze_trend_with(&series, &config.trend))
        })
        .collect::<BTreeMap<_, _>>();

    let empty = MeasurementRecord::new();
    let recommendations =
        generate_recommendations(&anomalies, latest.map(|s| &s.values).unwrap_or(&empty));

    // Equipment. An unusable service-interval override is reported, not
    // predicted against.
    let mut maintenance = Vec::with_capacity(request.equipment.len());
    let mut invalid_equipment = Vec::new();
    for equipment in &request.equipment {
        let bands = match equipment.max_hours {
            Some(max_hours) => config.maintenance.with_max_hours(max_hours),
            None => config.maintenance.clone(),
        };
        if let Err(e) = bands.validate() {
            tracing::warn!(
                equipment_id = equipment.id,
                error = %e,
                "Skipping maintenance prediction for equipment",
            );
            invalid_equipment.push(InvalidEquipment {
                equipment_id: equipment.id,
                name: equipment.name.clone(),
                error: e.to_string(),
            });
            continue;
        }
        maintenance.push(EquipmentMaintenance {
            equipment_id: equipment.id,
            name: equipment.name.clone(),
            prediction: predict_maintenance(&equipment.hours, &bands),
        });
    }

    // Alert drafts.
    let mut alerts: Vec<AlertDraft> = compliance
        .iter()
        .flat_map(|report| report.violations.iter().map(AlertDraft::from_violation))
        .collect();
    alerts.extend(anomalies.iter().map(AlertDraft::from_anomaly));
    alerts.extend(maintenance.iter().filter_map(|m| {
        AlertDraft::from_maintenance(m.equipment_id, &m.name, &m.prediction)
    }));

    let statuses: Vec<_> = request.equipment.iter().map(|e| e.status).collect();

    PlantReport {
        evaluation_id: Uuid::now_v7(),
        generated_at: Utc::now(),
        plant: PlantRef {
            id: request.plant.id,
            name: request.plant.name.clone(),
            code: request.plant.code.clone(),
        },
        compliance_phase: phase,
        last_measurement: latest.map(|s| LastMeasurement {
            timestamp: s.timestamp,
            phase: s.phase,
            values: s.values.clone(),
        }),
        compliance,
        compliance_summary,
        detection,
        anomalies,
        trends,
        recommendations,
        maintenance,
        invalid_equipment,
        alerts,
        kpis: measurement_kpis(&request.measurements),
        disinfection_kpis: disinfection_kpis(&request.measurements),
        alert_stats: alert_stats(&request.alerts),
        equipment_stats: equipment_stats(&statuses),
    }
}
