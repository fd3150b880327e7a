//! Storage backend configuration.
//!
//! Selects the object-store backend from environment variables. Defaults to
//! Amazon S3 with credentials and region taken from the standard `AWS_*`
//! variables; an S3-compatible local service (MinIO, LocalStack) is reached
//! by setting a custom endpoint.

use std::path::PathBuf;

use url::Url;

/// Backend selector: `s3` (default) or `local`.
pub const BACKEND_VAR: &str = "CURATE_STORE_BACKEND";
/// Optional S3 endpoint override, e.g. `http://localhost:4566`.
pub const S3_ENDPOINT_VAR: &str = "CURATE_S3_ENDPOINT";
/// Root directory for the `local` backend; buckets are its subdirectories.
pub const LOCAL_ROOT_VAR: &str = "CURATE_LOCAL_ROOT";

/// Which object store to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Amazon S3, or any S3-compatible service when `endpoint` is set.
    S3 {
        /// Custom endpoint. Requests use path-style addressing when set.
        endpoint: Option<Url>,
    },
    /// A directory tree laid out as `<root>/<bucket>/<key>`.
    Local {
        /// Directory holding one subdirectory per bucket.
        root: PathBuf,
    },
}

/// Resolved storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Selected backend.
    pub backend: Backend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::S3 { endpoint: None },
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// Variables:
    /// - `CURATE_STORE_BACKEND` (`s3` | `local`, default: `s3`)
    /// - `CURATE_S3_ENDPOINT` (optional URL, `s3` only)
    /// - `CURATE_LOCAL_ROOT` (required for `local`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let backend = match get(BACKEND_VAR).as_deref().map(str::trim) {
            None | Some("s3") => {
                let endpoint = get(S3_ENDPOINT_VAR)
                    .map(|raw| {
                        Url::parse(raw.trim()).map_err(|e| {
                            ConfigError::InvalidUrl(S3_ENDPOINT_VAR.to_string(), e.to_string())
                        })
                    })
                    .transpose()?;
                Backend::S3 { endpoint }
            }
            Some("local") => {
                let root = get(LOCAL_ROOT_VAR).ok_or(ConfigError::MissingLocalRoot)?;
                Backend::Local {
                    root: PathBuf::from(root),
                }
            }
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self { backend })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown storage backend \"{0}\" (expected s3 or local)")]
    UnknownBackend(String),
    #[error("CURATE_LOCAL_ROOT environment variable is required for the local backend")]
    MissingLocalRoot,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
