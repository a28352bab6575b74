//! Operational recommendations for flagged parameters.
//!
//! The rules are deliberately looser than the detectors' own thresholds:
//! a value can be statistically anomalous for its window and still be
//! operationally fine, in which case no advice is emitted for it.

use crate::anomaly::Anomaly;
use crate::measurement::{
    MeasurementRecord, PARAM_CHLORINE_FREE, PARAM_DBO5, PARAM_OD, PARAM_PH, PARAM_SST,
    PARAM_TEMPERATURE,
};
use crate::normativity::Violation;

/// Message emitted when no rule produced advice.
pub const NORMAL_OPERATION: &str = "✅ Sistema operando dentro de parámetros normales.";

/// Anything that names a parameter and the value that drew attention to it.
pub trait AnomalySignal {
    fn parameter(&self) -> &str;
    fn value(&self) -> f64;
}

impl AnomalySignal for Anomaly {
    fn parameter(&self) -> &str {
        &self.parameter
    }

    fn value(&self) -> f64 {
        self.value
    }
}

impl AnomalySignal for Violation {
    fn parameter(&self) -> &str {
        &self.parameter
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// Which side of the threshold triggers the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Below,
    Above,
}

/// One advisory rule: emit `advice` when the parameter crosses `threshold`
/// in `direction` (strictly).
#[derive(Debug, Clone, Copy)]
pub struct AdviceRule {
    pub parameter: &'static str,
    pub direction: Direction,
    pub threshold: f64,
    pub advice: &'static str,
}

/// Advisory rules in evaluation order. For a given parameter at most one
/// rule can fire because the bounds never overlap.
pub const ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        parameter: PARAM_PH,
        direction: Direction::Below,
        threshold: 6.0,
        advice: "⚠️ pH bajo: Verificar ingreso de aguas ácidas. Considerar neutralización con cal.",
    },
    AdviceRule {
        parameter: PARAM_PH,
        direction: Direction::Above,
        threshold: 9.0,
        advice: "⚠️ pH alto: Verificar vertidos alcalinos. Ajustar dosificación de químicos.",
    },
    AdviceRule {
        parameter: PARAM_SST,
        direction: Direction::Above,
        threshold: 80.0,
        advice: "⚠️ SST elevado: Revisar funcionamiento del sedimentador. Posible sobrecarga.",
    },
    AdviceRule {
        parameter: PARAM_DBO5,
        direction: Direction::Above,
        threshold: 60.0,
        advice: "⚠️ DBO5 alto: Posible sobrecarga orgánica. Verificar caudal y carga contaminantes.",
    },
    AdviceRule {
        parameter: PARAM_OD,
        direction: Direction::Below,
        threshold: 2.0,
        advice: "⚠️ OD bajo: Aumentar aireación. Revisar sopladores y difusores.",
    },
    AdviceRule {
        parameter: PARAM_OD,
        direction: Direction::Above,
        threshold: 6.0,
        advice: "ℹ️ OD alto: Considerar reducir aireación para ahorro energético.",
    },
    AdviceRule {
        parameter: PARAM_CHLORINE_FREE,
        direction: Direction::Below,
        threshold: 0.5,
        advice: "⚠️ Cloro bajo: Aumentar dosificación de hipoclorito.",
    },
    AdviceRule {
        parameter: PARAM_CHLORINE_FREE,
        direction: Direction::Above,
        threshold: 2.0,
        advice: "⚠️ Cloro alto: Reducir dosificación para evitar subproductos.",
    },
    AdviceRule {
        parameter: PARAM_TEMPERATURE,
        direction: Direction::Above,
        threshold: 30.0,
        advice: "🌡️ Temperatura alta: Monitorear actividad biológica. Posible reducción de eficiencia.",
    },
];

impl AdviceRule {
    fn applies(&self, parameter: &str, value: f64) -> bool {
        self.parameter == parameter
            && match self.direction {
                Direction::Below => value < self.threshold,
                Direction::Above => value > self.threshold,
            }
    }
}

/// Produce advice for each signal in input order.
///
/// Duplicates are kept: two anomalies on the same parameter yield the same
/// advice twice. When nothing applies, the result is the single
/// [`NORMAL_OPERATION`] message. The measurement is accepted for callers
/// that pass the current snapshot alongside the anomalies; the rules only
/// look at the signals.
pub fn generate_recommendations<A: AnomalySignal>(
    anomalies: &[A],
    _measurement: &MeasurementRecord,
) -> Vec<String> {
    let mut recommendations: Vec<String> = anomalies
        .iter()
        .flat_map(|signal| {
            ADVICE_RULES
                .iter()
                .filter(move |rule| rule.applies(signal.parameter(), signal.value()))
                .map(|rule| rule.advice.to_string())
        })
        .collect();

    if recommendations.is_empty() {
        recommendations.push(NORMAL_OPERATION.to_string());
    }

    recommendations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
