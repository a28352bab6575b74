//! Compliance and anomaly evaluation core for wastewater-treatment plants.
//!
//! Every module here is pure logic over records the caller already loaded:
//! no I/O, no shared mutable state. Limit tables and advisory rules are
//! compile-time constants, so all evaluators are safe to call concurrently.

pub mod alert;
pub mod anomaly;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod measurement;
pub mod normativity;
pub mod plant_stats;
pub mod recommendations;
pub mod threshold_validation;
pub mod trend;
pub mod types;
