//! Measurement vocabulary, process phases, and the record types handed to the
//! evaluators.
//!
//! A [`MeasurementRecord`] is an immutable snapshot: parameter name to an
//! optional numeric value. Absent and `null` parameters are skipped by every
//! rule, so new columns never break an evaluation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

/// Hydrogen potential.
pub const PARAM_PH: &str = "ph";
/// Water temperature in °C.
pub const PARAM_TEMPERATURE: &str = "temperature";
/// Total suspended solids (mg/L).
pub const PARAM_SST: &str = "sst";
/// Five-day biochemical oxygen demand (mg/L).
pub const PARAM_DBO5: &str = "dbo5";
/// Chemical oxygen demand (mg/L).
pub const PARAM_DQO: &str = "dqo";
/// Turbidity (NTU).
pub const PARAM_TURBIDITY: &str = "turbidity";
/// Free residual chlorine (mg/L).
pub const PARAM_CHLORINE_FREE: &str = "chlorine_free";
/// Dissolved oxygen (mg/L).
pub const PARAM_OD: &str = "od";
/// Inflow (m³/h).
pub const PARAM_CAUDAL_AFFLUENT: &str = "caudal_affluent_m3h";
/// Outflow (m³/h).
pub const PARAM_CAUDAL_EFFLUENT: &str = "caudal_effluent_m3h";
/// Electrical conductivity (µS/cm).
pub const PARAM_CONDUCTIVITY: &str = "conductivity";
/// Sludge blanket level (m).
pub const PARAM_LEVEL_SLUDGE: &str = "level_sludge_m";
/// Oils and greases (mg/L).
pub const PARAM_GREASES: &str = "greases";
/// Fecal coliforms (NMP/100mL).
pub const PARAM_COLIFORMES_FECALES: &str = "coliformes_fecales";
/// Apparent color (UC).
pub const PARAM_COLOR: &str = "color";

/// Parameters captured by the plant's routine measurement form.
///
/// Used as the default monitored set for anomaly detection and trends.
pub const MEASURED_PARAMETERS: &[&str] = &[
    PARAM_CAUDAL_AFFLUENT,
    PARAM_CAUDAL_EFFLUENT,
    PARAM_PH,
    PARAM_TEMPERATURE,
    PARAM_CONDUCTIVITY,
    PARAM_TURBIDITY,
    PARAM_OD,
    PARAM_CHLORINE_FREE,
    PARAM_SST,
    PARAM_DBO5,
    PARAM_DQO,
    PARAM_LEVEL_SLUDGE,
];

// ---------------------------------------------------------------------------
// Measurement record
// ---------------------------------------------------------------------------

/// Parameter name to optional value, as captured for one sampling point.
///
/// Serializes as a flat JSON object; `null` values deserialize as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementRecord {
    values: BTreeMap<String, Option<f64>>,
}

impl MeasurementRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used by callers assembling records by hand.
    pub fn with(mut self, parameter: &str, value: f64) -> Self {
        self.values.insert(parameter.to_string(), Some(value));
        self
    }

    /// Set or clear a parameter.
    pub fn set(&mut self, parameter: impl Into<String>, value: Option<f64>) {
        self.values.insert(parameter.into(), value);
    }

    /// The observed value of `parameter`, or `None` when absent or null.
    pub fn get(&self, parameter: &str) -> Option<f64> {
        self.values.get(parameter).copied().flatten()
    }

    /// Iterate over the non-null parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.as_str(), v)))
    }

    /// Returns `true` if no parameter carries a value.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MeasurementRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), Some(value)))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Process phases
// ---------------------------------------------------------------------------

pub const PHASE_AFLUENTE: &str = "afluente";
pub const PHASE_PRETRATAMIENTO: &str = "pretratamiento";
pub const PHASE_REACTOR: &str = "reactor";
pub const PHASE_CLARIFICADOR: &str = "clarificador";
pub const PHASE_DESINFECCION: &str = "desinfeccion";
pub const PHASE_LODOS: &str = "lodos";

/// All valid phase names.
pub const VALID_PHASES: &[&str] = &[
    PHASE_AFLUENTE,
    PHASE_PRETRATAMIENTO,
    PHASE_REACTOR,
    PHASE_CLARIFICADOR,
    PHASE_DESINFECCION,
    PHASE_LODOS,
];

/// Treatment-train stage at which a sample was taken.
///
/// Defaults to [`Phase::Desinfeccion`], the stage whose effluent is held to
/// the discharge norms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Afluente,
    Pretratamiento,
    Reactor,
    Clarificador,
    /// Final disinfection stage; plant KPIs are computed on this phase.
    #[default]
    Desinfeccion,
    Lodos,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Afluente => PHASE_AFLUENTE,
            Self::Pretratamiento => PHASE_PRETRATAMIENTO,
            Self::Reactor => PHASE_REACTOR,
            Self::Clarificador => PHASE_CLARIFICADOR,
            Self::Desinfeccion => PHASE_DESINFECCION,
            Self::Lodos => PHASE_LODOS,
        }
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PHASE_AFLUENTE => Ok(Self::Afluente),
            PHASE_PRETRATAMIENTO => Ok(Self::Pretratamiento),
            PHASE_REACTOR => Ok(Self::Reactor),
            PHASE_CLARIFICADOR => Ok(Self::Clarificador),
            PHASE_DESINFECCION => Ok(Self::Desinfeccion),
            PHASE_LODOS => Ok(Self::Lodos),
            other => Err(CoreError::Validation(format!(
                "Unknown phase: '{other}'. Valid phases: {}",
                VALID_PHASES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sample with context
// ---------------------------------------------------------------------------

/// Review state of a captured measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    #[default]
    Pending,
    Validated,
    Rejected,
}

/// A measurement record together with when and where it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub timestamp: Timestamp,
    pub phase: Phase,
    #[serde(default)]
    pub validated: ValidationState,
    pub values: MeasurementRecord,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
