//! # Error Hierarchy
//!
//! Structured error types for the curation job, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every variant is fatal for the run. Row-level validation problems are
//! never errors: they are counted (and possibly filtered) by the validator
//! and surface only in the [`ValidationReport`](crate::ValidationReport).

use thiserror::Error;

use crate::storage::{ObjectLocation, StoreError};

/// Top-level error type for a curation run.
#[derive(Error, Debug)]
pub enum CurateError {
    /// One or more required run parameters were absent or empty.
    ///
    /// Raised before any storage client is built or called.
    #[error("missing required arguments: {}", .flags.join(", "))]
    MissingArgument {
        /// The command-line flags that were missing, in canonical order.
        flags: Vec<&'static str>,
    },

    /// The source object does not exist.
    #[error("source object not found: {location}")]
    SourceNotFound {
        /// Where the source was expected.
        location: ObjectLocation,
    },

    /// The storage layer failed while reading the source object.
    #[error("failed to read source {location}: {source}")]
    SourceRead {
        /// The source object location.
        location: ObjectLocation,
        /// The underlying storage failure.
        #[source]
        source: StoreError,
    },

    /// The source payload is not valid UTF-8 text.
    #[error("source {location} is not valid UTF-8: {source}")]
    SourceNotUtf8 {
        /// The source object location.
        location: ObjectLocation,
        /// The decoding failure.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The source has no header line, so there is no column set to validate
    /// against or to re-serialize with.
    #[error("source has no header line")]
    MissingHeader,

    /// The delimited-text parser rejected the source. The reader is lenient
    /// about quoting, so this is limited to reader-level failures.
    #[error("malformed CSV at line {line}: {source}")]
    MalformedCsv {
        /// 1-based line number reported by the parser (0 when unknown).
        line: u64,
        /// The parser failure.
        #[source]
        source: csv::Error,
    },

    /// Re-encoding the curated table failed.
    #[error("failed to serialize curated table: {0}")]
    Serialize(String),

    /// The storage layer failed while writing the destination object.
    #[error("failed to write destination {location}: {source}")]
    DestinationWrite {
        /// The destination object location.
        location: ObjectLocation,
        /// The underlying storage failure.
        #[source]
        source: StoreError,
    },
}

impl CurateError {
    /// Wrap a storage failure observed while reading `location`.
    ///
    /// A missing object is reported as [`CurateError::SourceNotFound`] so
    /// callers can tell "wrong prefix" apart from transport failures.
    pub fn from_read(location: ObjectLocation, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::SourceNotFound { location },
            other => Self::SourceRead {
                location,
                source: other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(key: &str) -> ObjectLocation {
        ObjectLocation::new("raw-bucket", key)
    }

    #[test]
    fn missing_argument_lists_every_flag() {
        let err = CurateError::MissingArgument {
            flags: vec!["--raw_prefix", "--curated_prefix"],
        };
        let msg = format!("{err}");
        assert!(msg.contains("--raw_prefix, --curated_prefix"));
    }

    #[test]
    fn from_read_maps_not_found() {
        let err = CurateError::from_read(
            loc("raw/orders.csv"),
            StoreError::NotFound {
                key: "raw/orders.csv".to_string(),
            },
        );
        assert!(matches!(err, CurateError::SourceNotFound { .. }));
        assert!(format!("{err}").contains("s3://raw-bucket/raw/orders.csv"));
    }

    #[test]
    fn from_read_keeps_backend_failures() {
        let err = CurateError::from_read(
            loc("raw/orders.csv"),
            StoreError::Backend {
                key: "raw/orders.csv".to_string(),
                message: "access denied".to_string(),
            },
        );
        assert!(matches!(err, CurateError::SourceRead { .. }));
        assert!(format!("{err}").contains("access denied"));
    }

    #[test]
    fn destination_write_display() {
        let err = CurateError::DestinationWrite {
            location: loc("curated/orders_curated.csv"),
            source: StoreError::Backend {
                key: "curated/orders_curated.csv".to_string(),
                message: "bucket is read-only".to_string(),
            },
        };
        let msg = format!("{err}");
        assert!(msg.contains("curated/orders_curated.csv"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn missing_header_display() {
        assert_eq!(
            format!("{}", CurateError::MissingHeader),
            "source has no header line"
        );
    }
}
