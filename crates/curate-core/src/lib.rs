#![deny(missing_docs)]

//! # curate-core — Orders CSV Curation
//!
//! Everything the curation job decides lives here; the storage adapter and
//! the CLI are thin shells around it.
//!
//! ## Flow
//!
//! 1. [`RunParams::from_parts`] rejects incomplete job definitions before
//!    any storage access.
//! 2. [`run`] fetches `<raw_prefix>orders.csv` through a [`BlobStore`],
//!    parses it into a [`Table`], and validates every row against
//!    [`RequiredColumns::orders`].
//! 3. The chosen [`IssuePolicy`] decides how issues are counted and whether
//!    invalid rows are dropped.
//! 4. The curated table is re-encoded and written to
//!    `<curated_prefix>orders_curated.csv` in the same bucket.
//!
//! ## Crate Policy
//!
//! - No network I/O. Storage is injected through [`BlobStore`].
//! - Row-level problems are counted, never raised.
//! - No `.unwrap()` outside tests.

pub mod columns;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod table;
pub mod validate;

pub use columns::{RequiredColumns, ORDER_COLUMNS};
pub use error::CurateError;
pub use params::RunParams;
pub use pipeline::{curate, run, run_with_columns, RunOutcome};
pub use report::{ColumnIssues, ValidationReport};
pub use storage::{BlobStore, MemoryStore, ObjectLocation, StoreCall, StoreError};
pub use table::{Header, Row, Table};
pub use validate::{check_row, validate, Curated, IssuePolicy, RowVerdict};
