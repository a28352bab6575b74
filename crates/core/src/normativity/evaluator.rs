//! Limit evaluator: pure logic over a measurement record and the static
//! limit tables.

use serde::{Deserialize, Serialize};

use super::limits::{limit_table, reference_for, LimitRule, Norm};
use crate::alert::Severity;
use crate::measurement::MeasurementRecord;

/// One breached bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub norm: Norm,
    pub parameter: String,
    /// The observed value.
    pub value: f64,
    /// The bound that was crossed.
    pub limit: f64,
    pub severity: Severity,
    pub message: String,
    /// Decree article, e.g. `DS 90, Art. 3.a`.
    pub reference: String,
}

/// Combined result of evaluating the enabled norms against one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub compliant: bool,
    pub violations: Vec<Violation>,
}

/// Which bound of a rule was crossed.
#[derive(Clone, Copy)]
enum Bound {
    Min,
    Max,
}

/// Check a measurement against every rule of one norm.
///
/// Parameters missing from the record are skipped. Parameters present in the
/// record but not in the table are ignored. The min and max bounds are
/// checked independently, in that order.
pub fn check_norm(norm: Norm, measurement: &MeasurementRecord) -> Vec<Violation> {
    let mut violations = Vec::new();

    for rule in limit_table(norm) {
        let Some(value) = measurement.get(rule.parameter) else {
            continue;
        };

        if let Some(min) = rule.min {
            if value < min {
                violations.push(violation(norm, rule, value, min, Bound::Min));
            }
        }
        if let Some(max) = rule.max {
            if value > max {
                violations.push(violation(norm, rule, value, max, Bound::Max));
            }
        }
    }

    violations
}

/// Check all enabled norms, DS90 first, and combine the results.
pub fn check_all(
    measurement: &MeasurementRecord,
    ds90_enabled: bool,
    ds609_enabled: bool,
) -> ComplianceReport {
    let mut violations = Vec::new();

    if ds90_enabled {
        violations.extend(check_norm(Norm::Ds90, measurement));
    }
    if ds609_enabled {
        violations.extend(check_norm(Norm::Ds609, measurement));
    }

    ComplianceReport {
        compliant: violations.is_empty(),
        violations,
    }
}

fn violation(norm: Norm, rule: &LimitRule, value: f64, limit: f64, bound: Bound) -> Violation {
    let verb = match bound {
        Bound::Min => "está bajo",
        Bound::Max => "excede",
    };
    Violation {
        norm,
        parameter: rule.parameter.to_string(),
        value,
        limit,
        severity: rule.severity,
        message: format!(
            "{} {verb} el límite {} ({limit:.1} {})",
            rule.parameter,
            norm.label(),
            rule.unit
        ),
        reference: reference_for(norm, rule.parameter).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Dashboard summary
// ---------------------------------------------------------------------------

/// Per-norm compliance flags for a plant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub ds90_compliant: bool,
    pub ds609_compliant: bool,
    /// Message of the last violation in the report, if any.
    pub last_violation: Option<String>,
}

impl ComplianceSummary {
    /// Summarize a report. A norm that was not evaluated counts as compliant.
    pub fn from_report(report: &ComplianceReport) -> Self {
        let breaches = |norm: Norm| report.violations.iter().any(|v| v.norm == norm);
        Self {
            ds90_compliant: !breaches(Norm::Ds90),
            ds609_compliant: !breaches(Norm::Ds609),
            last_violation: report.violations.last().map(|v| v.message.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
