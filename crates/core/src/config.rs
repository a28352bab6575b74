//! Engine configuration: every tunable threshold of the evaluators in one
//! place, with documented defaults.
//!
//! | Field                               | Default        |
//! |-------------------------------------|----------------|
//! | `detection.zscore_threshold`        | `3.0`          |
//! | `detection.zscore_critical_factor`  | `1.5`          |
//! | `detection.zscore_display_sigmas`   | `2.0`          |
//! | `detection.iqr_multiplier`          | `1.5`          |
//! | `detection.iqr_critical_factor`     | `3.0`          |
//! | `detection.min_samples`             | `10`           |
//! | `trend.window`                      | `5`            |
//! | `trend.stable_slope`                | `0.01`         |
//! | `maintenance.max_hours`             | `10000`        |
//! | `maintenance.imminent_below`        | `500`          |
//! | `maintenance.upcoming_below`        | `2000`         |
//! | `compliance_phase`                  | `desinfeccion` |

use serde::{Deserialize, Serialize};

use crate::anomaly::DetectionConfig;
use crate::error::CoreError;
use crate::maintenance::MaintenanceBands;
use crate::measurement::Phase;
use crate::trend::TrendConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub trend: TrendConfig,
    pub maintenance: MaintenanceBands,
    /// Process phase whose samples are checked against the norms and fed
    /// to detection and trends. Other phases are different water streams
    /// and are never mixed into that history.
    pub compliance_phase: Phase,
}

impl EngineConfig {
    /// Validate all sections, reporting the first invalid field.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.detection.validate()?;
        self.trend.validate()?;
        self.maintenance.validate()?;
        Ok(())
    }
}
