//! End-to-end migration scenarios against mocked clusters
//!
//! Each cluster is a single wiremock server carrying both the admin API
//! (under /admin) and the S3 data plane (path-style bucket URLs), the way
//! a real gateway exposes them.

use rgw_migrate::input::{BucketSpec, ClusterCredentials};
use rgw_migrate::{MigrationConfig, Outcome, SkipReason};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Principal":{"AWS":["arn:aws:iam:::user/alpha-owner"]},"Action":"s3:GetObject","Resource":"arn:aws:s3:::alpha/*"}]}"#;

struct Scenario {
    source: MockServer,
    destination: MockServer,
    out: TempDir,
}

impl Scenario {
    async fn new() -> Self {
        Self {
            source: MockServer::start().await,
            destination: MockServer::start().await,
            out: tempfile::tempdir().unwrap(),
        }
    }

    fn config(&self, bucket: &str) -> MigrationConfig {
        let source_host = host_of(&self.source);
        let destination_host = host_of(&self.destination);

        let mut credentials = HashMap::new();
        credentials.insert(
            source_host.clone(),
            ClusterCredentials {
                access_key: "src-admin-ak".to_string(),
                secret_key: "src-admin-sk".to_string(),
            },
        );
        credentials.insert(
            destination_host.clone(),
            ClusterCredentials {
                access_key: "dst-admin-ak".to_string(),
                secret_key: "dst-admin-sk".to_string(),
            },
        );

        let mut buckets = BTreeMap::new();
        buckets.insert(
            bucket.to_string(),
            BucketSpec {
                source: source_host,
                destination: destination_host,
            },
        );

        MigrationConfig {
            credentials,
            buckets,
            config_commands_file: self.out.path().join("config_commands.sh"),
            copy_commands_file: self.out.path().join("copy_commands.sh"),
            secure: false,
        }
    }
}

fn host_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

fn user_record_json(uid: &str, access_key: &str, secret_key: &str) -> serde_json::Value {
    serde_json::json!({
        "user_id": uid,
        "display_name": uid,
        "max_buckets": 1000,
        "keys": [{"user": uid, "access_key": access_key, "secret_key": secret_key}]
    })
}

async fn mock_user_listing(server: &MockServer, users: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/admin/metadata/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(server)
        .await;
}

async fn mock_bucket_listing(server: &MockServer, buckets: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/admin/bucket"))
        .and(query_param_is_missing("bucket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(buckets))
        .mount(server)
        .await;
}

async fn mock_bucket_owner(server: &MockServer, bucket: &str, owner: &str) {
    Mock::given(method("GET"))
        .and(path("/admin/bucket"))
        .and(query_param("bucket", bucket))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"bucket": bucket, "owner": owner})),
        )
        .mount(server)
        .await;
}

async fn mock_get_user(server: &MockServer, uid: &str, access_key: &str, secret_key: &str) {
    Mock::given(method("GET"))
        .and(path("/admin/user"))
        .and(query_param("uid", uid))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_record_json(uid, access_key, secret_key)),
        )
        .mount(server)
        .await;
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// Scenario A: fresh bucket, owner with one key pair, no matching users on
// the destination yet.
#[tokio::test]
async fn migrates_bucket_users_policy_and_commands() {
    let scenario = Scenario::new().await;

    mock_bucket_owner(&scenario.source, "alpha", "alpha-owner").await;
    mock_user_listing(&scenario.source, &["alpha-owner", "unrelated-user"]).await;
    mock_get_user(&scenario.source, "alpha-owner", "AK-OWNER", "SK-OWNER").await;
    mock_bucket_listing(&scenario.source, &["alpha", "other"]).await;
    Mock::given(method("GET"))
        .and(path("/alpha"))
        .and(query_param("policy", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(POLICY))
        .mount(&scenario.source)
        .await;

    mock_user_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/admin/user"))
        .and(query_param("uid", "alpha-owner"))
        .and(query_param("access-key", "AK-OWNER"))
        .and(query_param("secret-key", "SK-OWNER"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_record_json("alpha-owner", "AK-OWNER", "SK-OWNER")),
        )
        .expect(1)
        .mount(&scenario.destination)
        .await;
    mock_bucket_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/alpha"))
        .and(query_param_is_missing("policy"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&scenario.destination)
        .await;
    Mock::given(method("PUT"))
        .and(path("/alpha"))
        .and(query_param("policy", ""))
        .and(body_string(POLICY))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&scenario.destination)
        .await;

    let config = scenario.config("alpha");
    let report = rgw_migrate::run(&config).await.unwrap();

    assert_eq!(
        report.outcome_for("alpha"),
        Some(&Outcome::Migrated {
            users_created: vec!["alpha-owner".to_string()],
            policy_copied: true,
            commands_emitted: true,
        })
    );

    let config_lines = read_lines(&config.config_commands_file);
    assert_eq!(config_lines.len(), 2);
    assert!(config_lines[0].contains("rclone config create alpha_source s3 provider Ceph"));
    assert!(config_lines[0].contains("access_key_id AK-OWNER"));
    assert!(config_lines[0].contains(&format!("endpoint http://{}", host_of(&scenario.source))));
    assert!(config_lines[1].contains("rclone config create alpha_destination s3 provider Ceph"));
    assert!(config_lines[1].contains("secret_access_key SK-OWNER"));
    assert!(config_lines[1]
        .contains(&format!("endpoint http://{}", host_of(&scenario.destination))));

    let copy_lines = read_lines(&config.copy_commands_file);
    assert_eq!(
        copy_lines,
        vec!["rclone copy alpha_source:alpha alpha_destination:alpha".to_string()]
    );
}

// Scenario B: the bucket already exists on the destination.
#[tokio::test]
async fn existing_destination_bucket_is_a_pure_skip() {
    let scenario = Scenario::new().await;

    mock_bucket_owner(&scenario.source, "beta", "beta-owner").await;
    mock_user_listing(&scenario.source, &["beta-owner"]).await;
    mock_bucket_listing(&scenario.source, &["beta"]).await;

    mock_user_listing(&scenario.destination, &["beta-owner"]).await;
    mock_bucket_listing(&scenario.destination, &["beta"]).await;
    // Neither bucket creation, policy writes, nor user creation may happen.
    Mock::given(method("PUT"))
        .and(path("/beta"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&scenario.destination)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/user"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&scenario.destination)
        .await;

    let config = scenario.config("beta");
    let report = rgw_migrate::run(&config).await.unwrap();

    assert_eq!(
        report.outcome_for("beta"),
        Some(&Outcome::Skipped(SkipReason::AlreadyOnDestination))
    );
    assert!(!config.config_commands_file.exists());
    assert!(!config.copy_commands_file.exists());
}

// Scenario C and D combined: no users match the bucket-name prefix, and the
// source bucket carries no policy. The bucket itself still migrates.
#[tokio::test]
async fn missing_prefix_users_still_migrates_bucket() {
    let scenario = Scenario::new().await;

    mock_bucket_owner(&scenario.source, "gamma", "svc-gamma").await;
    mock_user_listing(&scenario.source, &["svc-gamma", "other-user"]).await;
    mock_get_user(&scenario.source, "svc-gamma", "AK-G", "SK-G").await;
    mock_bucket_listing(&scenario.source, &["gamma"]).await;
    Mock::given(method("GET"))
        .and(path("/gamma"))
        .and(query_param("policy", ""))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "<Error><Code>NoSuchBucketPolicy</Code><Message>none</Message></Error>",
        ))
        .mount(&scenario.source)
        .await;

    mock_user_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/admin/user"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&scenario.destination)
        .await;
    mock_bucket_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/gamma"))
        .and(query_param_is_missing("policy"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&scenario.destination)
        .await;
    Mock::given(method("PUT"))
        .and(path("/gamma"))
        .and(query_param("policy", ""))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&scenario.destination)
        .await;

    let config = scenario.config("gamma");
    let report = rgw_migrate::run(&config).await.unwrap();

    assert_eq!(
        report.outcome_for("gamma"),
        Some(&Outcome::Migrated {
            users_created: vec![],
            policy_copied: false,
            commands_emitted: true,
        })
    );

    // Sync commands fall back to the owner's key pair.
    let config_lines = read_lines(&config.config_commands_file);
    assert_eq!(config_lines.len(), 2);
    assert!(config_lines[0].contains("access_key_id AK-G"));
    assert_eq!(
        read_lines(&config.copy_commands_file),
        vec!["rclone copy gamma_source:gamma gamma_destination:gamma".to_string()]
    );
}

// A bucket absent from the source listing is skipped, though user
// mirroring has already run by that point.
#[tokio::test]
async fn bucket_missing_on_source_is_skipped() {
    let scenario = Scenario::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/bucket"))
        .and(query_param("bucket", "delta"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"Code": "NoSuchBucket"})),
        )
        .mount(&scenario.source)
        .await;
    mock_user_listing(&scenario.source, &["delta-owner"]).await;
    mock_get_user(&scenario.source, "delta-owner", "AK-D", "SK-D").await;
    mock_bucket_listing(&scenario.source, &["other"]).await;

    mock_user_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/admin/user"))
        .and(query_param("uid", "delta-owner"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_record_json("delta-owner", "AK-D", "SK-D")),
        )
        .expect(1)
        .mount(&scenario.destination)
        .await;
    mock_bucket_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/delta"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&scenario.destination)
        .await;

    let config = scenario.config("delta");
    let report = rgw_migrate::run(&config).await.unwrap();

    assert_eq!(
        report.outcome_for("delta"),
        Some(&Outcome::Skipped(SkipReason::MissingOnSource))
    );
    assert!(!config.copy_commands_file.exists());
}

// The command files carry no idempotence marker: with cluster responses
// unchanged, a second pass appends a second copy of every line.
#[tokio::test]
async fn rerun_appends_duplicate_command_lines() {
    let scenario = Scenario::new().await;

    mock_bucket_owner(&scenario.source, "alpha", "alpha-owner").await;
    mock_user_listing(&scenario.source, &["alpha-owner"]).await;
    mock_get_user(&scenario.source, "alpha-owner", "AK-OWNER", "SK-OWNER").await;
    mock_bucket_listing(&scenario.source, &["alpha"]).await;
    Mock::given(method("GET"))
        .and(path("/alpha"))
        .and(query_param("policy", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(POLICY))
        .mount(&scenario.source)
        .await;

    mock_user_listing(&scenario.destination, &["alpha-owner"]).await;
    mock_bucket_listing(&scenario.destination, &[]).await;
    Mock::given(method("PUT"))
        .and(path("/alpha"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&scenario.destination)
        .await;

    let config = scenario.config("alpha");
    rgw_migrate::run(&config).await.unwrap();
    rgw_migrate::run(&config).await.unwrap();

    let config_lines = read_lines(&config.config_commands_file);
    assert_eq!(config_lines.len(), 4);
    assert_eq!(config_lines[0], config_lines[2]);
    assert_eq!(config_lines[1], config_lines[3]);

    let copy_lines = read_lines(&config.copy_commands_file);
    assert_eq!(copy_lines.len(), 2);
    assert_eq!(copy_lines[0], copy_lines[1]);
}
