//! Input file loading
//!
//! Both inputs are YAML mappings read once at startup. Load or parse
//! failures abort the run; everything after this point is best-effort.

use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Admin credentials for one cluster
#[derive(Clone, Debug, Deserialize)]
pub struct ClusterCredentials {
    /// Admin access key
    pub access_key: String,
    /// Admin secret key
    pub secret_key: String,
}

/// Source and destination clusters for one bucket
#[derive(Clone, Debug, Deserialize)]
pub struct BucketSpec {
    /// Host of the cluster currently holding the bucket
    pub source: String,
    /// Host of the cluster the bucket moves to
    pub destination: String,
}

/// Load the credentials file: a mapping from cluster host to key pair
pub fn load_credentials(path: &Path) -> anyhow::Result<HashMap<String, ClusterCredentials>> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml))
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Load the buckets file: a mapping from bucket name to migration entry.
///
/// The BTreeMap gives a deterministic, name-sorted processing order.
pub fn load_buckets(path: &Path) -> anyhow::Result<BTreeMap<String, BucketSpec>> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml))
        .build()?;
    Ok(settings.try_deserialize()?)
}
