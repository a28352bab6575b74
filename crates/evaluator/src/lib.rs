//! `ptas-evaluator` library crate.
//!
//! Loads a plant evaluation request, runs the core evaluators over it and
//! builds the plant report. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod request;
