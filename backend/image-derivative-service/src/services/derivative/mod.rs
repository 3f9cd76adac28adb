//! Image derivative generation
//!
//! - Transformer for decoding, resizing and encoding
//! - Pipeline coordinating routing, storage and transformation

pub mod processor;
pub mod service;

pub use processor::{scaled_dimensions, ImageTransformer};
pub use service::{DerivativePipeline, InvocationOutcome, RESPONSE_OK, RESPONSE_SKIPPED};
