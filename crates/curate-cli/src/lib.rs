//! # curate-cli — Orders Curation Job
//!
//! Provides the `curate` command, the entry point the scheduler invokes:
//!
//! ```bash
//! curate --raw_bucket=lake --raw_prefix=raw/ --curated_prefix=curated/
//! ```
//!
//! Reads `<raw_prefix>orders.csv` from the bucket, validates the eight
//! required order columns, and writes `<curated_prefix>orders_curated.csv`
//! back to the same bucket.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the job. All decisions are made in
//!   `curate-core`; this crate wires flags, storage, and console output.
//! - The storage connection is injected into [`run_job`] so the argument
//!   checks can be exercised without a bucket.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;

use curate_core::{BlobStore, IssuePolicy, RunOutcome, RunParams};

/// Row policy as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyArg {
    /// Drop rows with any missing required column; one issue per dropped row.
    #[default]
    RejectFirst,
    /// Keep every row; one issue per missing required column.
    CountAll,
}

impl From<PolicyArg> for IssuePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RejectFirst => IssuePolicy::RejectFirst,
            PolicyArg::CountAll => IssuePolicy::CountAll,
        }
    }
}

/// Console summary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object on stdout after the run.
    Json,
}

/// Arguments for a curation run.
///
/// The three location flags are optional at parse time so that an
/// incomplete job definition is reported as a missing-argument error
/// naming every absent flag.
#[derive(Args, Debug, Clone, Default)]
pub struct CurateArgs {
    /// Bucket holding both the raw and the curated objects.
    #[arg(long = "raw_bucket", value_name = "BUCKET")]
    pub raw_bucket: Option<String>,

    /// Key prefix of the raw object; `orders.csv` is appended verbatim.
    #[arg(long = "raw_prefix", value_name = "PREFIX")]
    pub raw_prefix: Option<String>,

    /// Key prefix of the curated object; `orders_curated.csv` is appended verbatim.
    #[arg(long = "curated_prefix", value_name = "PREFIX")]
    pub curated_prefix: Option<String>,

    /// How rows with missing required columns are counted and filtered.
    #[arg(long, value_enum, default_value_t = PolicyArg::RejectFirst)]
    pub policy: PolicyArg,

    /// Format of the run summary printed to stdout.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
}

/// Execute one curation run.
///
/// `connect` builds a store for the validated bucket name. It is not called
/// when the arguments are incomplete.
pub fn run_job<'s, F>(args: &CurateArgs, connect: F) -> Result<RunOutcome>
where
    F: FnOnce(&str) -> Result<Box<dyn BlobStore + 's>>,
{
    let params = RunParams::from_parts(
        args.raw_bucket.clone(),
        args.raw_prefix.clone(),
        args.curated_prefix.clone(),
    )?;
    let policy = IssuePolicy::from(args.policy);

    if args.summary == SummaryFormat::Text {
        println!("Reading file from {}", params.source());
    }

    let store = connect(params.bucket())
        .with_context(|| format!("failed to connect to bucket \"{}\"", params.bucket()))?;

    let outcome = curate_core::run(&params, policy, &*store)?;

    println!("{}", render_summary(&outcome, args.summary)?);
    Ok(outcome)
}

/// Render the post-run summary.
pub fn render_summary(outcome: &RunOutcome, format: SummaryFormat) -> Result<String> {
    let report = &outcome.report;
    match format {
        SummaryFormat::Text => {
            let mut lines = vec![format!("Total rows processed: {}", report.total_processed())];
            if report.policy == IssuePolicy::RejectFirst {
                lines.push(format!("Valid rows: {}", report.rows_written));
            }
            lines.push(format!("Rows with validation issues: {}", report.issue_count));
            lines.push(format!("Curated data written to {}", outcome.destination));
            Ok(lines.join("\n"))
        }
        SummaryFormat::Json => {
            let value = json!({
                "source": outcome.source.to_string(),
                "destination": outcome.destination.to_string(),
                "bytes_written": outcome.bytes_written,
                "total_rows_processed": report.total_processed(),
                "report": report,
            });
            serde_json::to_string(&value).context("failed to encode run summary")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_core::{CurateError, MemoryStore, StoreCall};

    const SOURCE: &str = "order_id,order_date,customer_id,product_name,quantity,unit_price,order_status,created_at\n\
1,2024-01-05,C-9,Widget,2,9.99,SHIPPED,2024-01-05T10:00:00Z\n\
2,,C-9,Widget,2,9.99,SHIPPED,2024-01-05T10:00:00Z\n";

    fn args(policy: PolicyArg) -> CurateArgs {
        CurateArgs {
            raw_bucket: Some("lake".into()),
            raw_prefix: Some("raw/".into()),
            curated_prefix: Some("curated/".into()),
            policy,
            summary: SummaryFormat::Text,
        }
    }

    fn borrow<'a>(
        store: &'a MemoryStore,
    ) -> impl FnOnce(&str) -> Result<Box<dyn BlobStore + 'a>> {
        move |_| Ok(Box::new(store) as Box<dyn BlobStore + 'a>)
    }

    #[test]
    fn policy_arg_maps_to_issue_policy() {
        assert_eq!(IssuePolicy::from(PolicyArg::CountAll), IssuePolicy::CountAll);
        assert_eq!(
            IssuePolicy::from(PolicyArg::default()),
            IssuePolicy::RejectFirst
        );
    }

    #[test]
    fn missing_argument_never_connects() {
        let mut incomplete = args(PolicyArg::RejectFirst);
        incomplete.curated_prefix = None;
        let mut connected = false;

        let err = run_job(&incomplete, |_| {
            connected = true;
            Ok(Box::new(MemoryStore::new("lake")) as Box<dyn BlobStore>)
        })
        .unwrap_err();

        assert!(!connected);
        assert!(matches!(
            err.downcast_ref::<CurateError>(),
            Some(CurateError::MissingArgument { .. })
        ));
    }

    #[test]
    fn connect_failure_is_reported_with_bucket() {
        let err = run_job(&args(PolicyArg::RejectFirst), |_| {
            Err(anyhow::anyhow!("no credentials"))
        })
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("lake"));
        assert!(msg.contains("no credentials"));
    }

    #[test]
    fn run_job_reject_first() {
        let store = MemoryStore::new("lake").with_object("raw/orders.csv", SOURCE);
        let outcome = run_job(&args(PolicyArg::RejectFirst), borrow(&store)).unwrap();
        assert_eq!(outcome.report.rows_written, 1);
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Get("raw/orders.csv".into()),
                StoreCall::Put("curated/orders_curated.csv".into()),
            ]
        );
    }

    #[test]
    fn text_summary_reject_first() {
        let store = MemoryStore::new("lake").with_object("raw/orders.csv", SOURCE);
        let outcome = run_job(&args(PolicyArg::RejectFirst), borrow(&store)).unwrap();
        let text = render_summary(&outcome, SummaryFormat::Text).unwrap();
        assert_eq!(
            text,
            "Total rows processed: 2\n\
Valid rows: 1\n\
Rows with validation issues: 1\n\
Curated data written to s3://lake/curated/orders_curated.csv"
        );
    }

    #[test]
    fn text_summary_count_all_omits_valid_rows() {
        let store = MemoryStore::new("lake").with_object("raw/orders.csv", SOURCE);
        let outcome = run_job(&args(PolicyArg::CountAll), borrow(&store)).unwrap();
        let text = render_summary(&outcome, SummaryFormat::Text).unwrap();
        assert!(text.starts_with("Total rows processed: 2\nRows with validation issues: 1\n"));
        assert!(!text.contains("Valid rows"));
    }

    #[test]
    fn json_summary_carries_report() {
        let store = MemoryStore::new("lake").with_object("raw/orders.csv", SOURCE);
        let outcome = run_job(&args(PolicyArg::CountAll), borrow(&store)).unwrap();
        let text = render_summary(&outcome, SummaryFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "s3://lake/raw/orders.csv");
        assert_eq!(value["total_rows_processed"], 2);
        assert_eq!(value["report"]["policy"], "count-all");
        assert_eq!(value["report"]["issue_count"], 1);
        assert_eq!(value["report"]["missing_by_column"][0]["column"], "order_date");
    }
}
