//! Admin client configuration

use rgw_sigv4::Credentials;
use std::time::Duration;

/// Connection settings for one cluster's admin API
#[derive(Clone, Debug)]
pub struct AdminConfig {
    /// Cluster host, with port when it is not the scheme default
    pub host: String,
    /// Admin credentials used to sign requests
    pub credentials: Credentials,
    /// Use HTTPS when true
    pub secure: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Region used in the signing scope
    pub region: String,
}

impl AdminConfig {
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

    /// Base URL for admin requests
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_schemes() {
        let creds = Credentials::new("ak", "sk");
        let secure = AdminConfig::new("ceph.example.com", creds.clone());
        assert_eq!(secure.base_url(), "https://ceph.example.com");

        let insecure = AdminConfig::new("127.0.0.1:7480", creds).insecure();
        assert_eq!(insecure.base_url(), "http://127.0.0.1:7480");
    }
}
