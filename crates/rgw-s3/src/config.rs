//! S3 client configuration

use rgw_sigv4::Credentials;
use std::time::Duration;

/// Connection settings for one cluster's S3 endpoint
#[derive(Clone, Debug)]
pub struct S3Config {
    /// Cluster host, with port when it is not the scheme default
    pub host: String,
    /// Credentials used to sign requests
    pub credentials: Credentials,
    /// Use HTTPS when true
    pub secure: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Region used in the signing scope
    pub region: String,
}

impl S3Config {
    /// Create a config for the given host with default settings
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            credentials,
            secure: true,
            timeout: Duration::from_secs(30),
            region: "us-east-1".to_string(),
        }
    }

    /// Use plain HTTP towards the cluster
    pub fn insecure(mut self) -> Self {
        self.secure = false;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL for path-style requests
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.host)
    }
}
