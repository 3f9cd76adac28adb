//! Lambda entry point for image derivative generation
//!
//! Environment variables:
//! - IMAGE_DERIVATIVES: ordered `label:max_dimension:suffix` list
//!   (default: "thumbnail:100:-thumb,large:2000:-large")
//! - EXIT_ON_STORE_FAILURE: exit the process when a derivative write fails (default: true)
//! - LOG_FORMAT: "text" or "json" (default: text)
//! - AWS_REGION / S3_ENDPOINT / S3_FORCE_PATH_STYLE: object storage client overrides
//! - RUST_LOG: log filter (default: info)

use anyhow::Context;
use image_derivative_service::config::LogFormat;
use image_derivative_service::{AppError, Config, DerivativePipeline, S3Event};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use s3_utils::{ObjectStore, S3ObjectStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!(
        derivatives = config.derivatives.len(),
        exit_on_store_failure = config.exit_on_store_failure,
        "Starting image derivative service"
    );

    let pipeline = bootstrap(&config).await?;
    let pipeline_ref = &pipeline;
    let exit_on_store_failure = config.exit_on_store_failure;

    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        handle_event(pipeline_ref, event, exit_on_store_failure).await
    }))
    .await
}

async fn bootstrap(config: &Config) -> anyhow::Result<DerivativePipeline> {
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_config(&config.s3).await);
    info!(
        endpoint = config.s3.endpoint.as_deref().unwrap_or("default"),
        "S3 client initialized"
    );

    DerivativePipeline::new(store, config).context("building derivative pipeline")
}

async fn handle_event(
    pipeline: &DerivativePipeline,
    event: LambdaEvent<S3Event>,
    exit_on_store_failure: bool,
) -> Result<String, Error> {
    let (payload, context) = event.into_parts();

    match pipeline.handle(&payload).await {
        Ok(outcome) => Ok(outcome.response().to_string()),
        Err(e) if should_exit(&e, exit_on_store_failure) => {
            error!(
                request_id = %context.request_id,
                error = %e,
                "Derivative write failed, exiting"
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!(
                request_id = %context.request_id,
                retryable = e.is_retryable(),
                error = %e,
                "Invocation failed"
            );
            Err(e.into())
        }
    }
}

/// Only a rejected derivative write terminates the process, and only when enabled
fn should_exit(err: &AppError, exit_on_store_failure: bool) -> bool {
    err.is_store_failure() && exit_on_store_failure
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        // CloudWatch adds its own ingestion time and does not render ANSI codes
        .with_target(false)
        .with_ansi(false)
        .without_time();

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
