//! # RGW Admin Client
//!
//! A client for the Ceph Object Gateway admin ops API, scoped to a single
//! cluster. Covers the handful of operations a bucket-ownership migration
//! needs: listing users, reading full user records (including key pairs),
//! recreating users with explicit keys, listing buckets and resolving a
//! bucket's owner.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rgw_admin::{AdminClient, AdminConfig};
//! use rgw_sigv4::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AdminClient::new(AdminConfig::new(
//!         "ceph-a.example.com",
//!         Credentials::new("admin-access", "admin-secret"),
//!     ))?;
//!
//!     for user_id in client.list_users().await? {
//!         println!("{}", user_id);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::AdminClient;
pub use config::AdminConfig;
pub use error::{AdminError, Result};
pub use types::{UserKey, UserRecord};
