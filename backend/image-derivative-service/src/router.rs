//! Event router
//!
//! Turns an S3 notification into either a unit of work (source location plus
//! image type) or a skip. Skips are successful no-ops, never errors.

use crate::error::{AppError, Result};
use crate::events::S3Event;
use crate::models::{ImageType, NotificationRecord};
use regex::Regex;
use std::fmt;
use tracing::{info, warn};

/// Greedy full match; the capture is everything after the last dot
const EXTENSION_PATTERN: &str = r"^.*\.([^.]*)$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Key has no `<name>.<ext>` shape
    CannotInferType { key: String },
    /// Extension is not one of the supported raster types
    NonImage { key: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CannotInferType { key } => {
                write!(f, "Unable to infer image type for key {}", key)
            }
            SkipReason::NonImage { key } => write!(f, "Skipping non-image {}", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Process(NotificationRecord, ImageType),
    Skip(SkipReason),
}

#[derive(Debug, Clone)]
pub struct EventRouter {
    extension_pattern: Regex,
}

impl EventRouter {
    pub fn new() -> Result<Self> {
        let extension_pattern = Regex::new(EXTENSION_PATTERN)
            .map_err(|e| AppError::Config(format!("Invalid extension pattern: {e}")))?;
        Ok(Self { extension_pattern })
    }

    /// Route an inbound notification
    ///
    /// Only the first record is looked at. An event without records violates
    /// the handler's input contract and fails the invocation.
    pub fn route(&self, event: &S3Event) -> Result<RouteDecision> {
        match serde_json::to_string_pretty(event) {
            Ok(json) => info!("EVENT: {}", json),
            Err(_) => info!("EVENT: {:?}", event),
        }

        let record = event
            .records
            .first()
            .ok_or_else(|| {
                AppError::InvalidEvent("notification contains no records".to_string())
            })?;

        if event.records.len() > 1 {
            warn!(
                record_count = event.records.len(),
                "Notification has multiple records, only the first is processed"
            );
        }

        let source_key = decode_object_key(&record.s3.object.key)?;

        let image_type = match self.classify(&source_key) {
            Ok(image_type) => image_type,
            Err(reason) => {
                info!("{}", reason);
                return Ok(RouteDecision::Skip(reason));
            }
        };

        Ok(RouteDecision::Process(
            NotificationRecord {
                source_container: record.s3.bucket.name.clone(),
                source_key,
            },
            image_type,
        ))
    }

    /// Classify a decoded key by its extension
    pub fn classify(&self, key: &str) -> std::result::Result<ImageType, SkipReason> {
        let Some(captures) = self.extension_pattern.captures(key) else {
            return Err(SkipReason::CannotInferType {
                key: key.to_string(),
            });
        };

        let extension = captures
            .get(1)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        ImageType::from_extension(&extension).ok_or_else(|| SkipReason::NonImage {
            key: key.to_string(),
        })
    }
}

/// Decode an S3 notification key: `+` is a space, then percent-escapes
pub fn decode_object_key(raw: &str) -> Result<String> {
    if !has_well_formed_escapes(raw) {
        return Err(AppError::InvalidEvent(format!(
            "Object key `{raw}` has a malformed percent escape"
        )));
    }

    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            AppError::InvalidEvent(format!("Object key `{raw}` is not valid UTF-8: {e}"))
        })
}

/// Every `%` must introduce two hex digits
fn has_well_formed_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
