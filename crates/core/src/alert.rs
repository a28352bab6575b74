//! Severity levels and alert drafts for compliance, anomaly and equipment
//! notifications.
//!
//! Drafts are never persisted here. The caller decides whether to store them
//! as alert rows.

use serde::{Deserialize, Serialize};

use crate::anomaly::Anomaly;
use crate::maintenance::{MaintenancePrediction, MaintenanceStatus};
use crate::normativity::{Norm, Violation};
use crate::types::DbId;

/// Severity attached to limit rules and detected anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Out of the expected range but not immediately hazardous.
    Warning,
    /// Regulatory breach or extreme deviation.
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Four-level severity used on alert rows and maintenance priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Origin of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Ds90Violation,
    Ds609Violation,
    Anomaly,
    Equipment,
}

/// An alert ready to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub ds90_violation: bool,
    pub ds609_violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<DbId>,
}

impl AlertDraft {
    /// Draft a compliance alert for a limit breach.
    ///
    /// Critical rules map to a critical alert, warning rules to medium.
    pub fn from_violation(violation: &Violation) -> Self {
        let alert_type = match violation.norm {
            Norm::Ds90 => AlertType::Ds90Violation,
            Norm::Ds609 => AlertType::Ds609Violation,
        };
        let severity = match violation.severity {
            Severity::Critical => AlertSeverity::Critical,
            Severity::Warning => AlertSeverity::Medium,
        };
        Self {
            alert_type,
            severity,
            title: format!("Violación {}: {}", violation.norm.label(), violation.parameter),
            message: violation.message.clone(),
            ds90_violation: violation.norm == Norm::Ds90,
            ds609_violation: violation.norm == Norm::Ds609,
            norm_reference: Some(violation.reference.clone()),
            parameter: Some(violation.parameter.clone()),
            equipment_id: None,
        }
    }

    /// Draft an alert for a statistical anomaly.
    ///
    /// Anomalies are operational signals, not breaches: critical maps to
    /// high and warning to medium.
    pub fn from_anomaly(anomaly: &Anomaly) -> Self {
        let severity = match anomaly.severity {
            Severity::Critical => AlertSeverity::High,
            Severity::Warning => AlertSeverity::Medium,
        };
        Self {
            alert_type: AlertType::Anomaly,
            severity,
            title: format!("Anomalía detectada: {}", anomaly.parameter),
            message: anomaly.message.clone(),
            ds90_violation: false,
            ds609_violation: false,
            norm_reference: None,
            parameter: Some(anomaly.parameter.clone()),
            equipment_id: None,
        }
    }

    /// Draft an equipment alert when maintenance is overdue or imminent.
    ///
    /// Returns `None` for every other status.
    pub fn from_maintenance(
        equipment_id: DbId,
        equipment_name: &str,
        prediction: &MaintenancePrediction,
    ) -> Option<Self> {
        if !matches!(
            prediction.status,
            MaintenanceStatus::Overdue | MaintenanceStatus::Imminent
        ) {
            return None;
        }
        Some(Self {
            alert_type: AlertType::Equipment,
            severity: prediction.priority?,
            title: format!("Mantenimiento {}: {equipment_name}", prediction.status.label()),
            message: prediction.message.clone(),
            ds90_violation: false,
            ds609_violation: false,
            norm_reference: None,
            parameter: None,
            equipment_id: Some(equipment_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
