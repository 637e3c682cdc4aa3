//! S3 client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, S3Error>;

/// S3 client errors
#[derive(Error, Debug)]
pub enum S3Error {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the S3 API
    #[error("S3 error ({code}): {message}")]
    Api {
        code: String,
        message: String,
        status: u16,
    },

    /// Invalid request URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl S3Error {
    /// Parse an S3 error from an XML response body
    pub fn from_s3_xml(xml: &str, status: u16) -> Self {
        let code = extract_xml_element(xml, "Code").unwrap_or_else(|| format!("HTTP{}", status));
        let message =
            extract_xml_element(xml, "Message").unwrap_or_else(|| "Unknown error".to_string());

        Self::Api {
            code,
            message,
            status,
        }
    }

    /// Check if this error means the bucket has no policy attached
    pub fn is_no_such_bucket_policy(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == "NoSuchBucketPolicy")
    }
}

fn extract_xml_element(xml: &str, element: &str) -> Option<String> {
    let start_tag = format!("<{}>", element);
    let end_tag = format!("</{}>", element);

    let start = xml.find(&start_tag)? + start_tag.len();
    let end = xml.find(&end_tag)?;

    if start < end {
        Some(xml[start..end].to_string())
    } else {
        None
    }
}
