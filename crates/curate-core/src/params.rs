//! # Run Parameters
//!
//! The three values every run needs, validated up front. A missing
//! parameter aborts the run before any storage client exists, so a
//! mistyped job definition can never touch the bucket.

use crate::error::CurateError;
use crate::storage::ObjectLocation;

/// Fixed source object name, appended to the raw prefix.
pub const SOURCE_OBJECT: &str = "orders.csv";

/// Fixed destination object name, appended to the curated prefix.
pub const DESTINATION_OBJECT: &str = "orders_curated.csv";

/// Flag names, as passed on the command line.
pub const RAW_BUCKET_FLAG: &str = "--raw_bucket";
/// See [`RAW_BUCKET_FLAG`].
pub const RAW_PREFIX_FLAG: &str = "--raw_prefix";
/// See [`RAW_BUCKET_FLAG`].
pub const CURATED_PREFIX_FLAG: &str = "--curated_prefix";

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    bucket: String,
    raw_prefix: String,
    curated_prefix: String,
}

impl RunParams {
    /// Validate optional inputs. Absent and empty values both count as
    /// missing; every missing flag is reported at once.
    pub fn from_parts(
        raw_bucket: Option<String>,
        raw_prefix: Option<String>,
        curated_prefix: Option<String>,
    ) -> Result<Self, CurateError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, flag: &'static str| match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(flag);
                String::new()
            }
        };

        let bucket = take(raw_bucket, RAW_BUCKET_FLAG);
        let raw_prefix = take(raw_prefix, RAW_PREFIX_FLAG);
        let curated_prefix = take(curated_prefix, CURATED_PREFIX_FLAG);

        if !missing.is_empty() {
            return Err(CurateError::MissingArgument { flags: missing });
        }

        Ok(Self {
            bucket,
            raw_prefix,
            curated_prefix,
        })
    }

    /// Bucket both objects live in.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `<raw_prefix>orders.csv`, concatenated literally.
    pub fn source_key(&self) -> String {
        format!("{}{SOURCE_OBJECT}", self.raw_prefix)
    }

    /// `<curated_prefix>orders_curated.csv`, concatenated literally.
    pub fn destination_key(&self) -> String {
        format!("{}{DESTINATION_OBJECT}", self.curated_prefix)
    }

    /// Source object address.
    pub fn source(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, self.source_key())
    }

    /// Destination object address.
    pub fn destination(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, self.destination_key())
    }
}
