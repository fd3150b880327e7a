//! # curate CLI entry point
//!
//! Parses command-line arguments, initializes tracing, connects to the
//! configured object store, and runs the job.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use curate_cli::{run_job, CurateArgs};
use curate_core::BlobStore;
use curate_store::{ObjectStoreBlobStore, StoreConfig};

/// Orders CSV curation job.
///
/// Validates the required order columns of `<raw_prefix>orders.csv` and
/// writes `<curated_prefix>orders_curated.csv` to the same bucket. Storage
/// is selected with CURATE_STORE_BACKEND (s3 | local), CURATE_S3_ENDPOINT
/// and CURATE_LOCAL_ROOT; AWS credentials come from the usual AWS_* variables.
#[derive(Parser, Debug)]
#[command(name = "curate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(flatten)]
    job: CurateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(policy = ?cli.job.policy, "curate starting");

    let result = run_job(&cli.job, |bucket| {
        let config = StoreConfig::from_env().context("invalid storage configuration")?;
        tracing::debug!(backend = ?config.backend, "resolved storage backend");
        let store = ObjectStoreBlobStore::connect(&config, bucket)?;
        Ok(Box::new(store) as Box<dyn BlobStore>)
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
