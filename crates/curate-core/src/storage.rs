//! # Storage Port
//!
//! The pipeline talks to object storage only through [`BlobStore`], a
//! get/put interface scoped to one bucket. The production adapter lives in
//! `curate-store`; [`MemoryStore`] backs the tests and records every call so
//! that "no storage access happened" can be asserted directly.
//!
//! Keys are opaque strings. Consistency semantics of the backing store are
//! not modelled.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by a [`BlobStore`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No object exists under the key.
    #[error("no object under key \"{key}\"")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The key cannot be expressed as an object path by this backend.
    #[error("invalid object key \"{key}\": {message}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why the backend rejected it.
        message: String,
    },

    /// Any other backend failure (transport, permissions, throttling).
    #[error("storage backend error for \"{key}\": {message}")]
    Backend {
        /// The key being accessed.
        key: String,
        /// Backend-provided description.
        message: String,
    },
}

/// A bucket-scoped blob store.
///
/// Implementations must be usable from a single thread with strictly
/// sequential calls; the pipeline never issues overlapping requests.
pub trait BlobStore {
    /// Name of the bucket every key is resolved against.
    fn bucket(&self) -> &str;

    /// Fetch the full payload stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `body` under `key`, overwriting any existing object.
    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn bucket(&self) -> &str {
        (**self).bucket()
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, body)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn bucket(&self) -> &str {
        (**self).bucket()
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, body)
    }
}

/// Fully qualified object address, displayed as `s3://<bucket>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectLocation {
    /// Bucket name.
    pub bucket: String,
    /// Object key within the bucket.
    pub key: String,
}

impl ObjectLocation {
    /// Build a location from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// One recorded call against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `get(key)`.
    Get(String),
    /// `put(key, _)`.
    Put(String),
}

/// In-memory [`BlobStore`] that records the calls made against it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_puts: Option<String>,
}

impl MemoryStore {
    /// Create an empty store for `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Seed an object without recording a call.
    pub fn with_object(self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.objects.lock().insert(key.into(), body.into());
        self
    }

    /// Make every subsequent `put` fail with a backend error carrying `message`.
    pub fn failing_puts(mut self, message: impl Into<String>) -> Self {
        self.fail_puts = Some(message.into());
        self
    }

    /// Current payload under `key`, if any.
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).cloned()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }
}

impl BlobStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.calls.lock().push(StoreCall::Get(key.to_string()));
        self.objects
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.calls.lock().push(StoreCall::Put(key.to_string()));
        if let Some(message) = &self.fail_puts {
            return Err(StoreError::Backend {
                key: key.to_string(),
                message: message.clone(),
            });
        }
        self.objects.lock().insert(key.to_string(), body);
        Ok(())
    }
}
