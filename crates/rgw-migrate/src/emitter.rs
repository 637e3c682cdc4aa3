//! rclone command emission
//!
//! Appends fully formed shell commands to the output files. Files are
//! opened in append mode per call and the handle is released immediately,
//! so a rerun appends a second copy of every line. Nothing here executes
//! the commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Connection names used for a bucket's rclone remotes
pub fn connection_names(bucket: &str) -> (String, String) {
    (format!("{}_source", bucket), format!("{}_destination", bucket))
}

/// Append an rclone remote-configuration command
pub fn write_rclone_config(
    path: &Path,
    connection_name: &str,
    access_key: &str,
    secret_key: &str,
    endpoint: &str,
) -> std::io::Result<()> {
    let command = format!(
        "rclone config create {} s3 provider Ceph \
         access_key_id {} secret_access_key {} \
         endpoint {} acl public-read",
        connection_name, access_key, secret_key, endpoint
    );
    append_line(path, &command)
}

/// Append an rclone remote-to-remote copy command
pub fn write_rclone_copy(
    path: &Path,
    source_name: &str,
    destination_name: &str,
    bucket: &str,
) -> std::io::Result<()> {
    let command = format!(
        "rclone copy {}:{} {}:{}",
        source_name, bucket, destination_name, bucket
    );
    append_line(path, &command)
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}
