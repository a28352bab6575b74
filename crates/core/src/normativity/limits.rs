//! DS90 and DS609 limit tables.
//!
//! Both tables are compile-time constants. Bounds are inclusive: a value
//! equal to `min` or `max` is compliant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alert::Severity;
use crate::error::CoreError;
use crate::measurement::{
    PARAM_CHLORINE_FREE, PARAM_COLIFORMES_FECALES, PARAM_COLOR, PARAM_DBO5, PARAM_DQO,
    PARAM_GREASES, PARAM_PH, PARAM_SST, PARAM_TEMPERATURE, PARAM_TURBIDITY,
};

// ---------------------------------------------------------------------------
// Norms
// ---------------------------------------------------------------------------

pub const NORM_DS90: &str = "DS90";
pub const NORM_DS609: &str = "DS609";

/// All valid norm identifiers.
pub const VALID_NORMS: &[&str] = &[NORM_DS90, NORM_DS609];

/// Chilean regulatory decree a measurement can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Norm {
    /// DS 90/2000, emission limits for liquid waste discharges.
    #[serde(rename = "DS90")]
    Ds90,
    /// DS 609/1998, potable water quality.
    #[serde(rename = "DS609")]
    Ds609,
}

impl Norm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ds90 => NORM_DS90,
            Self::Ds609 => NORM_DS609,
        }
    }

    /// Label used in messages and alert titles; same as the wire id.
    pub fn label(self) -> &'static str {
        self.as_str()
    }

    /// Reference used when a parameter has no specific article registered.
    pub fn default_reference(self) -> &'static str {
        match self {
            Self::Ds90 => "DS 90",
            Self::Ds609 => "DS 609",
        }
    }
}

impl FromStr for Norm {
    type Err = CoreError;

    /// Case-insensitive: `ds90` and `DS90` are the same norm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            NORM_DS90 => Ok(Self::Ds90),
            NORM_DS609 => Ok(Self::Ds609),
            _ => Err(CoreError::Validation(format!(
                "Unknown norm: '{s}'. Valid norms: {}",
                VALID_NORMS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Limit rules
// ---------------------------------------------------------------------------

/// Regulatory limit for one parameter under one norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitRule {
    pub parameter: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: &'static str,
    pub severity: Severity,
}

/// DS90 effluent discharge limits.
pub const DS90_LIMITS: &[LimitRule] = &[
    LimitRule {
        parameter: PARAM_PH,
        min: Some(6.0),
        max: Some(9.0),
        unit: "pH",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_TEMPERATURE,
        min: None,
        max: Some(35.0),
        unit: "°C",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_SST,
        min: None,
        max: Some(80.0),
        unit: "mg/L",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_DBO5,
        min: None,
        max: Some(60.0),
        unit: "mg/L",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_DQO,
        min: None,
        max: Some(200.0),
        unit: "mg/L",
        severity: Severity::Warning,
    },
    LimitRule {
        parameter: PARAM_GREASES,
        min: None,
        max: Some(100.0),
        unit: "mg/L",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_COLIFORMES_FECALES,
        min: None,
        max: Some(1000.0),
        unit: "NMP/100mL",
        severity: Severity::Critical,
    },
];

/// DS609 potable water limits.
pub const DS609_LIMITS: &[LimitRule] = &[
    LimitRule {
        parameter: PARAM_PH,
        min: Some(6.5),
        max: Some(8.5),
        unit: "pH",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_CHLORINE_FREE,
        min: Some(0.5),
        max: Some(5.0),
        unit: "mg/L",
        severity: Severity::Critical,
    },
    LimitRule {
        parameter: PARAM_TURBIDITY,
        min: None,
        max: Some(2.0),
        unit: "NTU",
        severity: Severity::Warning,
    },
    LimitRule {
        parameter: PARAM_COLOR,
        min: None,
        max: Some(20.0),
        unit: "UC",
        severity: Severity::Warning,
    },
];

// ---------------------------------------------------------------------------
// Article references
// ---------------------------------------------------------------------------

const DS90_REFERENCES: &[(&str, &str)] = &[
    (PARAM_PH, "DS 90, Art. 3.a"),
    (PARAM_TEMPERATURE, "DS 90, Art. 3.a"),
    (PARAM_SST, "DS 90, Art. 3.a"),
    (PARAM_DBO5, "DS 90, Art. 3.a"),
    (PARAM_DQO, "DS 90, Art. 3.a"),
    (PARAM_GREASES, "DS 90, Art. 3.a"),
    (PARAM_COLIFORMES_FECALES, "DS 90, Art. 3.b"),
];

const DS609_REFERENCES: &[(&str, &str)] = &[
    (PARAM_PH, "DS 609, Art. 5.a"),
    (PARAM_CHLORINE_FREE, "DS 609, Art. 5.c"),
    (PARAM_TURBIDITY, "DS 609, Art. 5.b"),
    (PARAM_COLOR, "DS 609, Art. 5.b"),
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// The full limit table of a norm, in evaluation order.
pub fn limit_table(norm: Norm) -> &'static [LimitRule] {
    match norm {
        Norm::Ds90 => DS90_LIMITS,
        Norm::Ds609 => DS609_LIMITS,
    }
}

/// The limit registered for `parameter` under `norm`, if any.
pub fn limit_for(norm: Norm, parameter: &str) -> Option<&'static LimitRule> {
    limit_table(norm).iter().find(|r| r.parameter == parameter)
}

/// Article reference for a parameter, falling back to the bare norm name.
pub fn reference_for(norm: Norm, parameter: &str) -> &'static str {
    let refs = match norm {
        Norm::Ds90 => DS90_REFERENCES,
        Norm::Ds609 => DS609_REFERENCES,
    };
    refs.iter()
        .find(|(p, _)| *p == parameter)
        .map(|(_, r)| *r)
        .unwrap_or(norm.default_reference())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_has_at_least_one_bound() {
        for rule in DS90_LIMITS.iter().chain(DS609_LIMITS) {
            assert!(
                rule.min.is_some() || rule.max.is_some(),
                "{} has no bounds",
                rule.parameter
            );
        }
    }

    #[test]
    fn bounds_are_ordered() {
        for rule in DS90_LIMITS.iter().chain(DS609_LIMITS) {
            if let (Some(min), Some(max)) = (rule.min, rule.max) {
                assert!(min < max, "{} has min >= max", rule.parameter);
            }
        }
    }

    #[test]
    fn ph_limits_differ_per_norm() {
        let ds90 = limit_for(Norm::Ds90, PARAM_PH).unwrap();
        let ds609 = limit_for(Norm::Ds609, PARAM_PH).unwrap();
        assert_eq!((ds90.min, ds90.max), (Some(6.0), Some(9.0)));
        assert_eq!((ds609.min, ds609.max), (Some(6.5), Some(8.5)));
    }

    #[test]
    fn unregistered_parameter_has_no_limit() {
        assert!(limit_for(Norm::Ds609, PARAM_DBO5).is_none());
    }

    #[test]
    fn references_resolve_specific_articles() {
        assert_eq!(reference_for(Norm::Ds90, PARAM_COLIFORMES_FECALES), "DS 90, Art. 3.b");
        assert_eq!(reference_for(Norm::Ds609, PARAM_CHLORINE_FREE), "DS 609, Art. 5.c");
    }

    #[test]
    fn references_fall_back_to_norm_name() {
        assert_eq!(reference_for(Norm::Ds90, "od"), "DS 90");
        assert_eq!(reference_for(Norm::Ds609, "od"), "DS 609");
    }

    #[test]
    fn norm_parses_any_case() {
        assert_eq!("ds90".parse::<Norm>().unwrap(), Norm::Ds90);
        assert_eq!("DS609".parse::<Norm>().unwrap(), Norm::Ds609);
        assert!("ds 90".parse::<Norm>().is_err());
    }

    #[test]
    fn norm_serializes_as_upper_case_label() {
        assert_eq!(serde_json::to_value(Norm::Ds90).unwrap(), "DS90");
        assert_eq!(serde_json::to_value(Norm::Ds609).unwrap(), "DS609");
        let back: Norm = serde_json::from_str("\"DS609\"").unwrap();
        assert_eq!(back, Norm::Ds609);
    }
}
