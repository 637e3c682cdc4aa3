//! Migration orchestrator
//!
//! Processes each bucket entry to completion before starting the next:
//! mirror the prefix-matched users onto the destination, mirror the bucket
//! and its policy, then emit the rclone configuration and copy commands for
//! the later data copy. Remote failures are logged and recorded in the run
//! report; nothing is retried or rolled back.

use crate::emitter;
use crate::input::{BucketSpec, ClusterCredentials};
use crate::report::{MigrationReport, Outcome, SkipReason};
use rgw_admin::{AdminClient, AdminConfig, UserRecord};
use rgw_s3::{S3Client, S3Config};
use rgw_sigv4::Credentials;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Settings for one migration run
#[derive(Clone, Debug)]
pub struct MigrationConfig {
    /// Admin credentials per cluster host
    pub credentials: HashMap<String, ClusterCredentials>,
    /// Buckets to migrate, keyed by bucket name
    pub buckets: BTreeMap<String, BucketSpec>,
    /// Output file for rclone remote-configuration commands
    pub config_commands_file: PathBuf,
    /// Output file for rclone copy commands
    pub copy_commands_file: PathBuf,
    /// Use HTTPS towards both clusters
    pub secure: bool,
}

/// Run the full migration pass and return the per-bucket report.
///
/// Fails fast only when a bucket entry references a cluster with no
/// configured credentials; everything else is best-effort per bucket.
pub async fn run(config: &MigrationConfig) -> anyhow::Result<MigrationReport> {
    let mut missing: Vec<&str> = Vec::new();
    for spec in config.buckets.values() {
        for host in [&spec.source, &spec.destination] {
            if !config.credentials.contains_key(host.as_str()) && !missing.contains(&host.as_str())
            {
                missing.push(host.as_str());
            }
        }
    }
    if !missing.is_empty() {
        anyhow::bail!(
            "no credentials configured for cluster(s): {}",
            missing.join(", ")
        );
    }

    let mut report = MigrationReport::new();
    for (bucket_name, spec) in &config.buckets {
        let outcome = migrate_bucket(config, bucket_name, spec).await;
        report.record(bucket_name.clone(), outcome);
    }
    Ok(report)
}

async fn migrate_bucket(config: &MigrationConfig, bucket: &str, spec: &BucketSpec) -> Outcome {
    let source_creds = &config.credentials[&spec.source];
    let destination_creds = &config.credentials[&spec.destination];

    let source_admin = match admin_client(&spec.source, source_creds, config.secure) {
        Ok(client) => client,
        Err(err) => return Outcome::Failed(format!("source admin client setup failed: {}", err)),
    };
    let destination_admin = match admin_client(&spec.destination, destination_creds, config.secure)
    {
        Ok(client) => client,
        Err(err) => {
            return Outcome::Failed(format!("destination admin client setup failed: {}", err))
        }
    };

    // Resolve the owning user on the source.
    let owner = match source_admin.get_bucket_owner(bucket).await {
        Ok(owner) => owner,
        Err(err) => {
            error!("Failed to resolve owner of {} on {}: {}", bucket, spec.source, err);
            None
        }
    };
    info!(
        "Bucket: {}, Owner: {}, Source: {}, Destination: {}",
        bucket,
        owner.as_deref().unwrap_or("<unknown>"),
        spec.source,
        spec.destination
    );

    // Mirror users whose id starts with the bucket name. The prefix match
    // is a naming-convention heuristic, not a relationship the API reports.
    let source_users = list_users_or_empty(&source_admin, &spec.source).await;
    let destination_users = list_users_or_empty(&destination_admin, &spec.destination).await;

    let matched: Vec<&String> = source_users
        .iter()
        .filter(|user_id| user_id.starts_with(bucket))
        .collect();

    let mut users_created = Vec::new();
    let mut last_fetched: Option<UserRecord> = None;

    if matched.is_empty() {
        warn!("No users found on {} starting with {}", spec.source, bucket);
    } else {
        for user_id in matched {
            if destination_users.contains(user_id) {
                info!("User {} already exists on {}", user_id, spec.destination);
                continue;
            }

            let record = match source_admin.get_user(user_id).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    error!("User {} has no record on {}", user_id, spec.source);
                    continue;
                }
                Err(err) => {
                    error!("Failed to fetch user {} from {}: {}", user_id, spec.source, err);
                    continue;
                }
            };
            last_fetched = Some(record.clone());

            match destination_admin.create_user(&record).await {
                Ok(_) => {
                    info!("User {} created on {}", user_id, spec.destination);
                    users_created.push(user_id.clone());
                }
                Err(err) => {
                    error!(
                        "Failed to create user {} on {}: {}",
                        user_id, spec.destination, err
                    );
                }
            }
        }
    }

    // Full bucket listings gate the bucket migration itself.
    let source_buckets = list_buckets_or_empty(&source_admin, &spec.source).await;
    let destination_buckets = list_buckets_or_empty(&destination_admin, &spec.destination).await;

    if !source_buckets.iter().any(|name| name == bucket) {
        warn!("Bucket {} not found on {}", bucket, spec.source);
        return Outcome::Skipped(SkipReason::MissingOnSource);
    }
    if destination_buckets.iter().any(|name| name == bucket) {
        warn!("Bucket {} already exists on {}", bucket, spec.destination);
        return Outcome::Skipped(SkipReason::AlreadyOnDestination);
    }

    // Policy reads and the emitted sync configuration need a data-plane
    // identity: the owner's first key pair, or the last record fetched in
    // the user loop when the owner's record is unavailable.
    let owner_record = match &owner {
        Some(owner_id) => match source_admin.get_user(owner_id).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                error!("Owner {} has no record on {}", owner_id, spec.source);
                None
            }
            Err(err) => {
                error!(
                    "Failed to fetch owner {} from {}: {}",
                    owner_id, spec.source, err
                );
                None
            }
        },
        None => None,
    };
    let data_plane_user = owner_record.or(last_fetched);
    let data_plane_key = data_plane_user
        .as_ref()
        .and_then(|record| record.primary_key());

    let source_policy = match data_plane_key {
        Some(key) => {
            match s3_client(
                &spec.source,
                Credentials::new(&key.access_key, &key.secret_key),
                config.secure,
            ) {
                Ok(source_s3) => match source_s3.get_bucket_policy(bucket).await {
                    Ok(Some(policy)) => Some(policy),
                    Ok(None) => {
                        warn!("No bucket policy found for {} on {}", bucket, spec.source);
                        None
                    }
                    Err(err) => {
                        error!(
                            "Failed to read bucket policy of {} on {}: {}",
                            bucket, spec.source, err
                        );
                        None
                    }
                },
                Err(err) => {
                    error!("Source S3 client setup failed for {}: {}", bucket, err);
                    None
                }
            }
        }
        None => {
            warn!(
                "No data-plane credentials available to read the policy of {} on {}",
                bucket, spec.source
            );
            None
        }
    };

    // Destination mutations use the destination admin credentials.
    let destination_s3 = match s3_client(
        &spec.destination,
        Credentials::new(
            &destination_creds.access_key,
            &destination_creds.secret_key,
        ),
        config.secure,
    ) {
        Ok(client) => client,
        Err(err) => {
            return Outcome::Failed(format!("destination S3 client setup failed: {}", err))
        }
    };

    if let Err(err) = destination_s3.create_bucket(bucket, None).await {
        error!(
            "Failed to create bucket {} on {}: {}",
            bucket, spec.destination, err
        );
        return Outcome::Failed(format!("bucket creation failed: {}", err));
    }
    info!("Bucket {} created on {}", bucket, spec.destination);

    let mut policy_copied = false;
    if let Some(policy) = &source_policy {
        match destination_s3.set_bucket_policy(bucket, policy).await {
            Ok(()) => {
                info!("Bucket policy set for {} on {}", bucket, spec.destination);
                policy_copied = true;
            }
            Err(err) => {
                error!(
                    "Failed to set bucket policy for {} on {}: {}",
                    bucket, spec.destination, err
                );
            }
        }
    }

    // Emit the rclone commands for the later data copy. Both remotes use
    // the same key pair: the user was mirrored with identical keys, so one
    // identity addresses both clusters.
    let mut commands_emitted = false;
    match data_plane_key {
        Some(key) => {
            let (source_name, destination_name) = emitter::connection_names(bucket);
            let result = emitter::write_rclone_config(
                &config.config_commands_file,
                &source_name,
                &key.access_key,
                &key.secret_key,
                &endpoint_url(&spec.source, config.secure),
            )
            .and_then(|_| {
                emitter::write_rclone_config(
                    &config.config_commands_file,
                    &destination_name,
                    &key.access_key,
                    &key.secret_key,
                    &endpoint_url(&spec.destination, config.secure),
                )
            })
            .and_then(|_| {
                emitter::write_rclone_copy(
                    &config.copy_commands_file,
                    &source_name,
                    &destination_name,
                    bucket,
                )
            });

            match result {
                Ok(()) => commands_emitted = true,
                Err(err) => error!("Failed to write sync commands for {}: {}", bucket, err),
            }
        }
        None => {
            error!(
                "No data-plane credentials available to emit sync commands for {}",
                bucket
            );
        }
    }

    Outcome::Migrated {
        users_created,
        policy_copied,
        commands_emitted,
    }
}

async fn list_users_or_empty(client: &AdminClient, host: &str) -> Vec<String> {
    match client.list_users().await {
        Ok(users) => users,
        Err(err) => {
            error!("Failed to list users on {}: {}", host, err);
            Vec::new()
        }
    }
}

async fn list_buckets_or_empty(client: &AdminClient, host: &str) -> Vec<String> {
    match client.list_buckets().await {
        Ok(buckets) => buckets,
        Err(err) => {
            error!("Failed to list buckets on {}: {}", host, err);
            Vec::new()
        }
    }
}

fn admin_client(
    host: &str,
    credentials: &ClusterCredentials,
    secure: bool,
) -> rgw_admin::Result<AdminClient> {
    let mut config = AdminConfig::new(
        host,
        Credentials::new(&credentials.access_key, &credentials.secret_key),
    );
    if !secure {
        config = config.insecure();
    }
    AdminClient::new(config)
}

fn s3_client(host: &str, credentials: Credentials, secure: bool) -> rgw_s3::Result<S3Client> {
    let mut config = S3Config::new(host, credentials);
    if !secure {
        config = config.insecure();
    }
    S3Client::new(config)
}

fn endpoint_url(host: &str, secure: bool) -> String {
    let scheme = if secure { "https" } else { "http" };
    format!("{}://{}", scheme, host)
}
