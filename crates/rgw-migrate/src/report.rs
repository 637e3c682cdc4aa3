//! Per-bucket outcome accumulation
//!
//! The orchestrator records one outcome per bucket entry so a run can be
//! judged at the end without replaying the log stream.

use std::fmt;

/// Why a bucket was skipped without touching the destination
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The bucket is not present on the source cluster
    MissingOnSource,
    /// The bucket already exists on the destination cluster
    AlreadyOnDestination,
}

/// What happened to one bucket entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The bucket was created on the destination
    Migrated {
        /// Users mirrored onto the destination during this entry
        users_created: Vec<String>,
        /// Whether the source policy was copied onto the destination
        policy_copied: bool,
        /// Whether the rclone config/copy commands were written
        commands_emitted: bool,
    },
    /// Nothing was done, for an expected reason
    Skipped(SkipReason),
    /// The migration of this bucket failed partway
    Failed(String),
}

/// One bucket entry's result
#[derive(Clone, Debug)]
pub struct BucketOutcome {
    /// Bucket name
    pub bucket: String,
    /// What happened
    pub outcome: Outcome,
}

/// Accumulated outcomes for a full run
#[derive(Debug, Default)]
pub struct MigrationReport {
    entries: Vec<BucketOutcome>,
}

impl MigrationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one bucket
    pub fn record(&mut self, bucket: impl Into<String>, outcome: Outcome) {
        self.entries.push(BucketOutcome {
            bucket: bucket.into(),
            outcome,
        });
    }

    /// All recorded outcomes, in processing order
    pub fn entries(&self) -> &[BucketOutcome] {
        &self.entries
    }

    /// The outcome recorded for a bucket, if any
    pub fn outcome_for(&self, bucket: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.bucket == bucket)
            .map(|entry| &entry.outcome)
    }

    /// Number of migrated buckets
    pub fn migrated(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Migrated { .. }))
    }

    /// Number of skipped buckets
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    /// Number of failed buckets
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    fn count(&self, matcher: impl Fn(&Outcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| matcher(&entry.outcome))
            .count()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Migrated {
                users_created,
                policy_copied,
                commands_emitted,
            } => write!(
                f,
                "migrated ({} user(s) created, policy {}, commands {})",
                users_created.len(),
                if *policy_copied { "copied" } else { "not copied" },
                if *commands_emitted { "emitted" } else { "not emitted" },
            ),
            Self::Skipped(SkipReason::MissingOnSource) => {
                write!(f, "skipped (not found on source)")
            }
            Self::Skipped(SkipReason::AlreadyOnDestination) => {
                write!(f, "skipped (already exists on destination)")
            }
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} migrated, {} skipped, {} failed",
            self.migrated(),
            self.skipped(),
            self.failed()
        )?;
        for entry in &self.entries {
            write!(f, "\n  {}: {}", entry.bucket, entry.outcome)?;
        }
        Ok(())
    }
}
