//! Image Derivative Service
//!
//! Generates resized copies of newly stored images. One S3 object-created
//! notification in, one thumbnail and one large rendition out, each written
//! to a sibling container under the original key.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod router;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
pub use events::S3Event;
pub use services::derivative::{DerivativePipeline, InvocationOutcome};
