//! Data models for the image derivative pipeline
//!
//! All values here are invocation-local; nothing is cached across events.

use bytes::Bytes;
use image::ImageFormat;
use std::fmt;

/// Source location extracted from the first notification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Container (bucket) holding the new object
    pub source_container: String,
    /// URL-decoded object key
    pub source_key: String,
}

/// Raster formats the pipeline accepts and produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    /// Match an already lowercased file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(ImageType::Jpeg),
            "png" => Some(ImageType::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
        }
    }

    /// Content-Type written alongside every derivative
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            ImageType::Jpeg => ImageFormat::Jpeg,
            ImageType::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One configured output size
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeSpec {
    /// Name used in logs ("thumbnail", "large", ...)
    pub label: String,
    /// Bounding box edge length in pixels
    pub max_dimension: f32,
    /// Appended to the source container to form the destination container
    pub container_suffix: String,
}

impl DerivativeSpec {
    pub fn new(
        label: impl Into<String>,
        max_dimension: f32,
        container_suffix: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            max_dimension,
            container_suffix: container_suffix.into(),
        }
    }

    pub fn thumbnail() -> Self {
        Self::new("thumbnail", 100.0, "-thumb")
    }

    pub fn large() -> Self {
        Self::new("large", 2000.0, "-large")
    }

    /// Destination container for a given source container
    pub fn destination_container(&self, source_container: &str) -> String {
        format!("{}{}", source_container, self.container_suffix)
    }
}

/// Derivative written to storage
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub label: String,
    pub container: String,
    /// Always equal to the source key
    pub key: String,
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl StoredObject {
    pub fn path(&self) -> String {
        format!("{}/{}", self.container, self.key)
    }
}
