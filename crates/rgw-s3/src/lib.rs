//! # RGW S3 Client
//!
//! A minimal S3 data-plane client for Ceph Object Gateway, covering the
//! three operations a bucket-ownership migration needs: creating a bucket,
//! reading a bucket policy and writing a bucket policy. Requests use
//! path-style URLs and SigV4 signing.
//!
//! Bucket policies are treated as opaque strings: whatever the source
//! cluster returns is what the destination cluster receives.

mod client;
mod config;
mod error;

pub use client::S3Client;
pub use config::S3Config;
pub use error::{Result, S3Error};
