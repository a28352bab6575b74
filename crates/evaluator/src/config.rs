use std::path::PathBuf;
use std::str::FromStr;

use ptas_core::config::EngineConfig;

use crate::error::{EvaluatorError, EvaluatorResult};

/// Evaluator configuration loaded from environment variables.
///
/// Every threshold falls back to the engine default when its variable is
/// unset. Set variables must parse and the resulting engine configuration
/// must validate.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Request file (`PTAS_INPUT`). When unset the first CLI argument is used.
    pub input_path: Option<PathBuf>,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
    pub engine: EngineConfig,
}

impl EvaluatorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                      | Default  |
    /// |------------------------------|----------|
    /// | `PTAS_INPUT`                 | --       |
    /// | `LOG_FORMAT`                 | `text`   |
    /// | `ZSCORE_THRESHOLD`           | `3.0`    |
    /// | `ZSCORE_CRITICAL_FACTOR`     | `1.5`    |
    /// | `ZSCORE_DISPLAY_SIGMAS`      | `2.0`    |
    /// | `IQR_MULTIPLIER`             | `1.5`    |
    /// | `IQR_CRITICAL_FACTOR`        | `3.0`    |
    /// | `ANOMALY_MIN_SAMPLES`        | `10`     |
    /// | `TREND_WINDOW`               | `5`      |
    /// | `TREND_STABLE_SLOPE`         | `0.01`   |
    /// | `MAINTENANCE_MAX_HOURS`      | `10000`  |
    /// | `MAINTENANCE_IMMINENT_HOURS` | `500`    |
    /// | `MAINTENANCE_UPCOMING_HOURS` | `2000`   |
    /// | `COMPLIANCE_PHASE`           | `desinfeccion` |
    pub fn from_env() -> EvaluatorResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EvaluatorResult<Self> {
        let mut engine = EngineConfig::default();

        let detection = &mut engine.detection;
        override_from(&lookup, "ZSCORE_THRESHOLD", &mut detection.zscore_threshold)?;
        override_from(&lookup, "ZSCORE_CRITICAL_FACTOR", &mut detection.zscore_critical_factor)?;
        override_from(&lookup, "ZSCORE_DISPLAY_SIGMAS", &mut detection.zscore_display_sigmas)?;
        override_from(&lookup, "IQR_MULTIPLIER", &mut detection.iqr_multiplier)?;
        override_from(&lookup, "IQR_CRITICAL_FACTOR", &mut detection.iqr_critical_factor)?;
        override_from(&lookup, "ANOMALY_MIN_SAMPLES", &mut detection.min_samples)?;

        override_from(&lookup, "TREND_WINDOW", &mut engine.trend.window)?;
        override_from(&lookup, "TREND_STABLE_SLOPE", &mut engine.trend.stable_slope)?;

        let bands = &mut engine.maintenance;
        override_from(&lookup, "MAINTENANCE_MAX_HOURS", &mut bands.max_hours)?;
        override_from(&lookup, "MAINTENANCE_IMMINENT_HOURS", &mut bands.imminent_below)?;
        override_from(&lookup, "MAINTENANCE_UPCOMING_HOURS", &mut bands.upcoming_below)?;

        override_from(&lookup, "COMPLIANCE_PHASE", &mut engine.compliance_phase)?;

        engine.validate()?;

        let input_path = lookup("PTAS_INPUT")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let json_logs = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(EvaluatorError::Config {
                    var: "LOG_FORMAT",
                    reason: format!("expected 'text' or 'json', got '{other}'"),
                })
            }
        };

        Ok(Self {
            input_path,
            json_logs,
            engine,
        })
    }
}

/// Replace `target` with the parsed value of `var` when it is set.
fn override_from<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    target: &mut T,
) -> EvaluatorResult<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(());
    };
    *target = raw.trim().parse().map_err(|e: T::Err| EvaluatorError::Config {
        var,
        reason: format!("'{raw}' ({e})"),
    })?;
    Ok(())
}
