//! Admin API client implementation

use crate::{types::BucketInfo, AdminConfig, AdminError, Result, UserRecord};
use chrono::Utc;
use reqwest::{Client, Method, Response};
use rgw_sigv4::{canonical_query, EMPTY_PAYLOAD_SHA256};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Client for one cluster's admin control plane
pub struct AdminClient {
    config: AdminConfig,
    http: Client,
}

impl AdminClient {
    /// Create a new client with the given configuration
    pub fn new(config: AdminConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AdminError::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    // ==================== User Operations ====================

    /// List all user ids known to the cluster
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn list_users(&self) -> Result<Vec<String>> {
        let response = self
            .request(Method::GET, "/admin/metadata/user", &[])
            .await?;
        response.json().await.map_err(AdminError::Http)
    }

    /// Fetch a user's full record, `None` when the user does not exist
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        match self
            .request(Method::GET, "/admin/user", &[("uid", user_id)])
            .await
        {
            Ok(response) => Ok(Some(response.json().await.map_err(AdminError::Http)?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Recreate a user on this cluster with the same id, display name,
    /// quota and key material as the given record.
    ///
    /// Key values may contain characters unsafe for the query string; every
    /// parameter is percent-encoded before transmission.
    #[instrument(skip(self, user), fields(host = %self.config.host, user_id = %user.user_id))]
    pub async fn create_user(&self, user: &UserRecord) -> Result<UserRecord> {
        let max_buckets = user.max_buckets.map(|quota| quota.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("uid", user.user_id.as_str()),
            ("display-name", user.display_name.as_str()),
        ];
        if let Some(quota) = &max_buckets {
            params.push(("max-buckets", quota.as_str()));
        }
        if let Some(key) = user.primary_key() {
            params.push(("access-key", key.access_key.as_str()));
            params.push(("secret-key", key.secret_key.as_str()));
        }

        let response = self.request(Method::PUT, "/admin/user", &params).await?;
        response.json().await.map_err(AdminError::Http)
    }

    // ==================== Bucket Operations ====================

    /// List all bucket names known to the cluster
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self.request(Method::GET, "/admin/bucket", &[]).await?;
        response.json().await.map_err(AdminError::Http)
    }

    /// Resolve a bucket's owning user, `None` when the bucket is unknown
    /// or carries no owner.
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn get_bucket_owner(&self, bucket: &str) -> Result<Option<String>> {
        match self
            .request(Method::GET, "/admin/bucket", &[("bucket", bucket)])
            .await
        {
            Ok(response) => {
                let info: BucketInfo = response.json().await.map_err(AdminError::Http)?;
                Ok(info.owner)
            }
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    // ==================== Helper Methods ====================

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Response> {
        let mut params = params.to_vec();
        params.push(("format", "json"));

        // The query string is built in canonical form so the transmitted
        // bytes match the signed bytes exactly.
        let query = canonical_query(&params);
        let url = url::Url::parse(&format!("{}{}?{}", self.config.base_url(), path, query))?;

        let mut headers = BTreeMap::new();
        let authorization = rgw_sigv4::authorization_header(
            method.as_str(),
            &url,
            &mut headers,
            EMPTY_PAYLOAD_SHA256,
            &self.config.credentials,
            &self.config.region,
            "s3",
            Utc::now(),
        );

        let mut request = self.http.request(method, url.clone());
        for (name, value) in &headers {
            // reqwest derives the host header from the URL itself.
            if name != "host" {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        request = request.header("Authorization", authorization);

        debug!("Sending signed admin request to {}", url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::from_response(status.as_u16(), &body));
        }

        Ok(response)
    }
}
