//! Derivative pipeline - coordinates routing, fetch, transform and store
//!
//! Workflow for one notification:
//! 1. Route the event (skip unrecognized or non-image keys)
//! 2. Download the source object
//! 3. Decode it once
//! 4. For each configured derivative, in order: resize, encode, upload
//!
//! A rejected upload stops the pipeline. Derivatives already written stay
//! in place.

use super::processor::ImageTransformer;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::events::S3Event;
use crate::models::{DerivativeSpec, ImageType, NotificationRecord, StoredObject};
use crate::router::{EventRouter, RouteDecision, SkipReason};
use image::DynamicImage;
use s3_utils::{ObjectAcl, ObjectStore, PutObject, S3Config};
use std::sync::Arc;
use tracing::{error, info};

/// Response string for a fully processed event
pub const RESPONSE_OK: &str = "Ok";
/// Response string for a skipped event
pub const RESPONSE_SKIPPED: &str = "";

/// What one invocation did
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Skipped(SkipReason),
    /// Every configured derivative was written, in configuration order
    Completed(Vec<StoredObject>),
}

impl InvocationOutcome {
    pub fn response(&self) -> &'static str {
        match self {
            InvocationOutcome::Skipped(_) => RESPONSE_SKIPPED,
            InvocationOutcome::Completed(_) => RESPONSE_OK,
        }
    }
}

/// End-to-end handler for object-created notifications
pub struct DerivativePipeline {
    store: Arc<dyn ObjectStore>,
    router: EventRouter,
    transformer: ImageTransformer,
    derivatives: Vec<DerivativeSpec>,
}

impl DerivativePipeline {
    pub fn new(store: Arc<dyn ObjectStore>, config: &Config) -> Result<Self> {
        if config.derivatives.is_empty() {
            return Err(AppError::Config(
                "at least one derivative must be configured".to_string(),
            ));
        }

        Ok(Self {
            store,
            router: EventRouter::new()?,
            transformer: ImageTransformer::new(),
            derivatives: config.derivatives.clone(),
        })
    }

    /// Process one notification
    pub async fn handle(&self, event: &S3Event) -> Result<InvocationOutcome> {
        let (record, image_type) = match self.router.route(event)? {
            RouteDecision::Process(record, image_type) => (record, image_type),
            RouteDecision::Skip(reason) => return Ok(InvocationOutcome::Skipped(reason)),
        };

        let source_data = self
            .store
            .get_object(&record.source_container, &record.source_key)
            .await
            .map_err(AppError::Fetch)?;

        let source = self.transformer.decode(&source_data, image_type)?;

        let mut stored = Vec::with_capacity(self.derivatives.len());
        for spec in &self.derivatives {
            stored.push(
                self.generate_derivative(&record, image_type, &source, spec)
                    .await?,
            );
        }

        Ok(InvocationOutcome::Completed(stored))
    }

    async fn generate_derivative(
        &self,
        record: &NotificationRecord,
        image_type: ImageType,
        source: &DynamicImage,
        spec: &DerivativeSpec,
    ) -> Result<StoredObject> {
        let resized = self.transformer.resize(source, spec.max_dimension)?;
        let data = self.transformer.encode(&resized, image_type)?;

        let container = spec.destination_container(&record.source_container);
        let key = record.source_key.clone();
        let path = S3Config::object_path(&container, &key);

        info!("Writing to: {}", path);
        let request = PutObject {
            container: container.clone(),
            key: key.clone(),
            body: data.clone(),
            content_type: image_type.mime_type().to_string(),
            acl: ObjectAcl::PublicRead,
        };

        if let Err(e) = self.store.put_object(request).await {
            error!(
                derivative = %spec.label,
                destination = %path,
                "{}",
                e.backend_message()
            );
            return Err(AppError::Store {
                container,
                key,
                source: e,
            });
        }

        info!(
            width = resized.width(),
            height = resized.height(),
            size = data.len(),
            "Successfully created {} at {}",
            spec.label,
            path
        );

        Ok(StoredObject {
            label: spec.label.clone(),
            container,
            key,
            bytes: data,
            content_type: image_type.mime_type(),
            width: resized.width(),
            height: resized.height(),
        })
    }
}
