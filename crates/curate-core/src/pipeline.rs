//! # Curation Pipeline
//!
//! fetch → decode → parse → validate/filter → serialize → write.
//!
//! Strictly sequential: the destination write starts only after the source
//! has been read and fully transformed, and any failure before that point
//! leaves the destination key untouched. There is no retry.

use crate::columns::RequiredColumns;
use crate::error::CurateError;
use crate::params::RunParams;
use crate::report::ValidationReport;
use crate::storage::{BlobStore, ObjectLocation};
use crate::table::Table;
use crate::validate::{validate, IssuePolicy};

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Object that was read.
    pub source: ObjectLocation,
    /// Object that was written.
    pub destination: ObjectLocation,
    /// Size of the curated payload.
    pub bytes_written: usize,
    /// Validation counts.
    pub report: ValidationReport,
}

/// Pure transform: source text in, curated CSV bytes and counts out.
pub fn curate(
    text: &str,
    columns: &RequiredColumns,
    policy: IssuePolicy,
) -> Result<(Vec<u8>, ValidationReport), CurateError> {
    let table = Table::parse(text)?;
    let curated = validate(table, columns, policy);
    let body = curated.table.to_csv()?;
    Ok((body, curated.report))
}

/// Run the job for the order file against `store`.
///
/// `store` must be scoped to `params.bucket()`.
pub fn run(
    params: &RunParams,
    policy: IssuePolicy,
    store: &dyn BlobStore,
) -> Result<RunOutcome, CurateError> {
    run_with_columns(params, &RequiredColumns::orders(), policy, store)
}

/// [`run`] with an explicit required-column set.
pub fn run_with_columns(
    params: &RunParams,
    columns: &RequiredColumns,
    policy: IssuePolicy,
    store: &dyn BlobStore,
) -> Result<RunOutcome, CurateError> {
    let source = params.source();
    let destination = params.destination();

    if store.bucket() != params.bucket() {
        tracing::warn!(
            store_bucket = store.bucket(),
            bucket = params.bucket(),
            "store is scoped to a different bucket than the run parameters"
        );
    }

    tracing::info!(%source, %policy, "reading source object");
    let raw = store
        .get(&source.key)
        .map_err(|e| CurateError::from_read(source.clone(), e))?;
    tracing::debug!(bytes = raw.len(), "fetched source object");

    let text = std::str::from_utf8(&raw).map_err(|e| CurateError::SourceNotUtf8 {
        location: source.clone(),
        source: e,
    })?;
    let (body, report) = curate(text, columns, policy)?;

    tracing::info!(
        rows_read = report.rows_read,
        valid = report.valid_rows,
        invalid = report.invalid_rows,
        issues = report.issue_count,
        written = report.rows_written,
        "validated source rows"
    );

    let bytes_written = body.len();
    store
        .put(&destination.key, body)
        .map_err(|e| CurateError::DestinationWrite {
            location: destination.clone(),
            source: e,
        })?;
    tracing::info!(%destination, bytes = bytes_written, "wrote curated object");

    Ok(RunOutcome {
        source,
        destination,
        bytes_written,
        report,
    })
}
