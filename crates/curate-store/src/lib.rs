//! # curate-store — Object Storage Adapter
//!
//! Implements the [`BlobStore`] port from `curate-core` on top of the
//! `object_store` crate, so the same job runs against Amazon S3, an
//! S3-compatible local endpoint, or a plain directory tree.
//!
//! `object_store` is async. The adapter owns a current-thread Tokio runtime
//! and blocks on each request in turn, which keeps the job itself fully
//! synchronous: one read, then one write, never overlapping.

pub mod config;

use std::path::Path as FsPath;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tokio::runtime::Runtime;

use curate_core::{BlobStore, StoreError};

pub use config::{Backend, ConfigError, StoreConfig};

/// Failures while constructing a store.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The blocking runtime could not be created.
    #[error("failed to start storage runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The S3 client rejected its configuration.
    #[error("failed to configure S3 client for bucket \"{bucket}\": {source}")]
    S3 {
        /// Bucket being configured.
        bucket: String,
        /// Builder failure.
        #[source]
        source: object_store::Error,
    },

    /// The local bucket directory is missing or unusable.
    #[error("local bucket directory {path} is unusable: {source}")]
    LocalBucket {
        /// Directory that was expected to hold the bucket.
        path: String,
        /// Underlying failure.
        #[source]
        source: object_store::Error,
    },
}

/// [`BlobStore`] backed by any `object_store` implementation.
#[derive(Debug)]
pub struct ObjectStoreBlobStore {
    bucket: String,
    store: Arc<dyn ObjectStore>,
    runtime: Runtime,
}

impl ObjectStoreBlobStore {
    /// Wrap an existing object store already scoped to `bucket`.
    pub fn new(bucket: impl Into<String>, store: Arc<dyn ObjectStore>) -> Result<Self, ConnectError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ConnectError::Runtime)?;
        Ok(Self {
            bucket: bucket.into(),
            store,
            runtime,
        })
    }

    /// Build the store described by `config` for `bucket`.
    pub fn connect(config: &StoreConfig, bucket: &str) -> Result<Self, ConnectError> {
        let store: Arc<dyn ObjectStore> = match &config.backend {
            Backend::S3 { endpoint } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(url) = endpoint {
                    builder = builder
                        .with_endpoint(url.as_str().trim_end_matches('/'))
                        .with_virtual_hosted_style_request(false)
                        .with_allow_http(url.scheme() == "http");
                }
                let s3 = builder.build().map_err(|source| ConnectError::S3 {
                    bucket: bucket.to_string(),
                    source,
                })?;
                tracing::debug!(bucket, endpoint = ?endpoint, "configured S3 store");
                Arc::new(s3)
            }
            Backend::Local { root } => Arc::new(local_bucket(root, bucket)?),
        };
        Self::new(bucket, store)
    }

    /// A process-local store, empty at creation.
    pub fn in_memory(bucket: impl Into<String>) -> Result<Self, ConnectError> {
        Self::new(bucket, Arc::new(InMemory::new()))
    }
}

fn local_bucket(root: &FsPath, bucket: &str) -> Result<LocalFileSystem, ConnectError> {
    let dir = root.join(bucket);
    let fs = LocalFileSystem::new_with_prefix(&dir).map_err(|source| ConnectError::LocalBucket {
        path: dir.display().to_string(),
        source,
    })?;
    tracing::debug!(dir = %dir.display(), "configured local store");
    Ok(fs)
}

fn object_path(key: &str) -> Result<Path, StoreError> {
    Path::parse(key).map_err(|e| StoreError::InvalidKey {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn store_error(key: &str, err: object_store::Error) -> StoreError {
    match err {
        object_store::Error::NotFound { .. } => StoreError::NotFound {
            key: key.to_string(),
        },
        other => StoreError::Backend {
            key: key.to_string(),
            message: other.to_string(),
        },
    }
}

impl BlobStore for ObjectStoreBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = object_path(key)?;
        let bytes = self
            .runtime
            .block_on(async {
                let result = self.store.get(&path).await?;
                result.bytes().await
            })
            .map_err(|e| store_error(key, e))?;
        Ok(bytes.to_vec())
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let path = object_path(key)?;
        self.runtime
            .block_on(self.store.put(&path, PutPayload::from(body)))
            .map_err(|e| store_error(key, e))?;
        Ok(())
    }
}
