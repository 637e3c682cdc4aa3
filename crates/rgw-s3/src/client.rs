//! S3 data-plane client implementation

use crate::{Result, S3Config, S3Error};
use chrono::Utc;
use reqwest::{Client, Method, Response};
use rgw_sigv4::{canonical_query, payload_sha256, EMPTY_PAYLOAD_SHA256};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Client for one cluster's S3 data plane
pub struct S3Client {
    config: S3Config,
    http: Client,
}

impl S3Client {
    /// Create a new client with the given configuration
    pub fn new(config: S3Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(S3Error::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    // ==================== Bucket Operations ====================

    /// Create a bucket, optionally with a location constraint.
    ///
    /// "Already exists" is not special-cased here; callers are expected to
    /// have checked the destination listing before calling.
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn create_bucket(&self, bucket: &str, region: Option<&str>) -> Result<()> {
        let body = region.map(|location| {
            format!(
                "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                 <LocationConstraint>{}</LocationConstraint>\
                 </CreateBucketConfiguration>",
                location
            )
        });

        self.request(Method::PUT, bucket, &[], body).await?;
        Ok(())
    }

    /// Read a bucket's policy document.
    ///
    /// Returns `Ok(None)` when no policy is attached; every other failure is
    /// an error, so the two cases stay distinguishable to the caller.
    #[instrument(skip(self), fields(host = %self.config.host))]
    pub async fn get_bucket_policy(&self, bucket: &str) -> Result<Option<String>> {
        match self
            .request(Method::GET, bucket, &[("policy", "")], None)
            .await
        {
            Ok(response) => Ok(Some(response.text().await.map_err(S3Error::Http)?)),
            Err(err) if err.is_no_such_bucket_policy() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Attach a policy document to a bucket, verbatim
    #[instrument(skip(self, policy), fields(host = %self.config.host))]
    pub async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.request(
            Method::PUT,
            bucket,
            &[("policy", "")],
            Some(policy.to_string()),
        )
        .await?;
        Ok(())
    }

    // ==================== Helper Methods ====================

    async fn request(
        &self,
        method: Method,
        bucket: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Response> {
        // Path-style addressing; the query string is built in canonical
        // form so the transmitted bytes match the signed bytes exactly.
        let query = canonical_query(params);
        let url_text = if query.is_empty() {
            format!("{}/{}", self.config.base_url(), bucket)
        } else {
            format!("{}/{}?{}", self.config.base_url(), bucket, query)
        };
        let url = url::Url::parse(&url_text)?;

        let payload_hash = match &body {
            Some(content) => payload_sha256(content.as_bytes()),
            None => EMPTY_PAYLOAD_SHA256.to_string(),
        };

        let mut headers = BTreeMap::new();
        let authorization = rgw_sigv4::authorization_header(
            method.as_str(),
            &url,
            &mut headers,
            &payload_hash,
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
        if let Some(content) = body {
            request = request.body(content);
        }

        debug!("Sending signed S3 request to {}", url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(S3Error::from_s3_xml(&text, status.as_u16()));
        }

        Ok(response)
    }
}
