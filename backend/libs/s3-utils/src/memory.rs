//! In-process object store
//!
//! Keeps objects in a map keyed by `(container, key)`. Used by integration
//! tests and local dry runs; supports injecting failures per container.

use crate::error::StorageError;
use crate::{ObjectAcl, ObjectStore, PutObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Object as persisted by [`MemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub acl: ObjectAcl,
}

#[derive(Debug, Default)]
struct State {
    objects: HashMap<(String, String), StoredBlob>,
    put_failures: HashMap<String, StorageError>,
    writes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    state: Mutex<State>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a source object, bypassing failure injection
    pub fn insert(&self, container: &str, key: &str, body: impl Into<Bytes>) {
        let body = body.into();
        let blob = StoredBlob {
            content_length: body.len(),
            body,
            content_type: None,
            acl: ObjectAcl::Private,
        };
        self.state()
            .objects
            .insert((container.to_string(), key.to_string()), blob);
    }

    /// Make every subsequent write into `container` fail with `error`
    pub fn fail_puts_to(&self, container: &str, error: StorageError) {
        self.state()
            .put_failures
            .insert(container.to_string(), error);
    }

    pub fn get(&self, container: &str, key: &str) -> Option<StoredBlob> {
        self.state()
            .objects
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    /// Successful writes in order, as `container/key`
    pub fn writes(&self) -> Vec<String> {
        self.state().writes.clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, container: &str, key: &str) -> Result<Bytes, StorageError> {
        self.state()
            .objects
            .get(&(container.to_string(), key.to_string()))
            .map(|blob| blob.body.clone())
            .ok_or_else(|| StorageError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(&self, request: PutObject) -> Result<(), StorageError> {
        let mut state = self.state();
        if let Some(err) = state.put_failures.get(&request.container) {
            return Err(err.clone());
        }

        state
            .writes
            .push(format!("{}/{}", request.container, request.key));
        let blob = StoredBlob {
            content_length: request.body.len(),
            body: request.body,
            content_type: Some(request.content_type),
            acl: request.acl,
        };
        state.objects.insert((request.container, request.key), blob);
        Ok(())
    }
}
