//! Types returned by the admin API

use serde::{Deserialize, Serialize};

/// One of a user's access key pairs
#[derive(Clone, Serialize, Deserialize)]
pub struct UserKey {
    /// Access key id
    pub access_key: String,
    /// Secret key
    pub secret_key: String,
}

// Secret key material must never reach the log stream.
impl std::fmt::Debug for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserKey")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// A full user record as reported by `GET /admin/user`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id
    pub user_id: String,
    /// Display name
    pub display_name: String,
    /// Bucket quota, when the cluster reports one
    #[serde(default)]
    pub max_buckets: Option<i64>,
    /// Key pairs in the order the cluster reports them
    #[serde(default)]
    pub keys: Vec<UserKey>,
}

impl UserRecord {
    /// The user's first key pair.
    ///
    /// The admin API gives no ordering guarantee; treating the first pair as
    /// canonical is a simplification shared with policy reads and sync-tool
    /// configuration.
    pub fn primary_key(&self) -> Option<&UserKey> {
        self.keys.first()
    }
}

/// Bucket metadata from `GET /admin/bucket?bucket=..`, reduced to the
/// fields the migration needs.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct BucketInfo {
    #[serde(default)]
    pub owner: Option<String>,
}
