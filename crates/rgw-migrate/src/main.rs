//! rgw-migrate - migrate bucket ownership between two Ceph RGW clusters

use clap::Parser;
use rgw_migrate::{input, MigrationConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rgw-migrate")]
#[command(about = "Migrate bucket ownership between two Ceph RGW clusters")]
#[command(version)]
struct Args {
    /// File containing the admin credentials for each cluster
    #[arg(long, env = "RGW_MIGRATE_CREDENTIALS")]
    credentials: PathBuf,

    /// File containing the list of buckets to migrate
    #[arg(long, env = "RGW_MIGRATE_BUCKETS")]
    buckets: PathBuf,

    /// File to write the rclone configuration commands
    #[arg(long, default_value = "config_commands.sh")]
    config_commands_file: PathBuf,

    /// File to write the rclone copy commands
    #[arg(long, default_value = "copy_commands.sh")]
    copy_commands_file: PathBuf,

    /// Use plain HTTP towards both clusters
    #[arg(long, env = "RGW_MIGRATE_INSECURE")]
    insecure: bool,

    /// Enable debug logging
    #[arg(short, long, env = "RGW_MIGRATE_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rgw_migrate={},rgw_admin={},rgw_s3={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Input-file problems are the one fatal error class; everything past
    // this point is best-effort per bucket.
    let credentials = input::load_credentials(&args.credentials)?;
    let buckets = input::load_buckets(&args.buckets)?;

    tracing::info!(
        "Loaded credentials for {} cluster(s) and {} bucket entries",
        credentials.len(),
        buckets.len()
    );
    if args.insecure {
        tracing::warn!("Using plain HTTP towards both clusters");
    }

    let config = MigrationConfig {
        credentials,
        buckets,
        config_commands_file: args.config_commands_file,
        copy_commands_file: args.copy_commands_file,
        secure: !args.insecure,
    };

    let report = rgw_migrate::run(&config).await?;
    tracing::info!(
        "Migration pass complete: {} migrated, {} skipped, {} failed",
        report.migrated(),
        report.skipped(),
        report.failed()
    );
    for entry in report.entries() {
        tracing::info!("  {}: {}", entry.bucket, entry.outcome);
    }

    Ok(())
}
