//! DS90 / DS609 normativity checks.
//!
//! Contains the static limit tables and a pure-logic evaluator. The caller
//! fetches the measurement and the plant's norm flags and decides whether to
//! store the resulting violations as alerts.

pub mod evaluator;
pub mod limits;

pub use evaluator::{check_all, check_norm, ComplianceReport, ComplianceSummary, Violation};
pub use limits::{limit_for, limit_table, reference_for, LimitRule, Norm};
