//! `ptas-evaluator` -- batch evaluator for one treatment plant.
//!
//! Reads a JSON evaluation request (plant, measurement history, equipment
//! run hours, stored alerts), evaluates it and prints the plant report as
//! JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! ptas-evaluator [REQUEST.json]
//! ```
//!
//! The request path comes from `PTAS_INPUT` or the first argument. See
//! [`EvaluatorConfig::from_env`] for the threshold variables.

use std::path::PathBuf;
use std::process::ExitCode;

use ptas_evaluator::config::EvaluatorConfig;
use ptas_evaluator::error::{EvaluatorError, EvaluatorResult};
use ptas_evaluator::pipeline;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "ptas_evaluator=info,ptas_core=info";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = EvaluatorConfig::from_env();
    let json_logs = config.as_ref().map(|c| c.json_logs).unwrap_or(false);
    init_tracing(json_logs);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Evaluation failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(config: EvaluatorResult<EvaluatorConfig>) -> EvaluatorResult<()> {
    let config = config?;
    let input = config
        .input_path
        .clone()
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from))
        .ok_or(EvaluatorError::MissingInput)?;

    tracing::info!(input = %input.display(), "Starting ptas-evaluator");

    let report = pipeline::evaluate_file(&input, &config.engine).await?;
    tracing::info!(
        evaluation_id = %report.evaluation_id,
        compliant = report.compliance.as_ref().map(|c| c.compliant),
        anomalies = report.anomalies.len(),
        alerts = report.alerts.len(),
        "Evaluation complete",
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
