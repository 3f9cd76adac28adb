/// Object storage access shared by the image services
///
/// Provides the `ObjectStore` abstraction, its AWS S3 implementation and an
/// in-memory implementation for tests.
use async_trait::async_trait;
use bytes::Bytes;

pub mod config;
pub mod error;
pub mod memory;
pub mod operations;

pub use config::S3Config;
pub use error::StorageError;
pub use memory::{MemoryObjectStore, StoredBlob};
pub use operations::S3ObjectStore;

/// Canned access policy applied to a written object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

/// A single object write
#[derive(Debug, Clone)]
pub struct PutObject {
    pub container: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub acl: ObjectAcl,
}

/// Durable get/put of opaque blobs keyed by `(container, key)`
///
/// Writes overwrite any existing object at the same location.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, container: &str, key: &str) -> Result<Bytes, StorageError>;

    async fn put_object(&self, request: PutObject) -> Result<(), StorageError>;
}
