//! Migration run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ============================================================================
// Step Results
// ============================================================================

/// Result of one set-difference step (roles, groups or attributes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Entities created at the destination.
    pub created: usize,

    /// Source entities already present at the destination.
    pub existing: usize,

    /// Create calls that failed.
    pub failed: usize,
}

impl StepResult {
    /// Records a created entity.
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    /// Records a failed create.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}

/// Result of the user upload step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUploadResult {
    /// Users submitted in batch create calls.
    pub processed: usize,

    /// Users skipped before submission (no login ID).
    pub skipped: usize,

    /// Batch calls issued (one per user file).
    pub batches: usize,

    /// Batch calls that failed as a whole.
    pub failed_batches: usize,

    /// Users submitted in batch calls that failed as a whole.
    pub failed_users: usize,

    /// Users the API rejected individually.
    pub rejected: usize,

    /// Disabled users deactivated after creation.
    pub deactivated: usize,

    /// Deactivation calls that failed.
    pub failed_deactivations: usize,

    /// User files that could not be read.
    pub unreadable_files: usize,
}

impl UserUploadResult {
    /// Adds another file's result to this one.
    pub fn merge(&mut self, other: &Self) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.batches += other.batches;
        self.failed_batches += other.failed_batches;
        self.failed_users += other.failed_users;
        self.rejected += other.rejected;
        self.deactivated += other.deactivated;
        self.failed_deactivations += other.failed_deactivations;
        self.unreadable_files += other.unreadable_files;
    }

    /// Submitted users the API neither rejected nor lost in a failed batch.
    #[must_use]
    pub fn created(&self) -> usize {
        self.processed
            .saturating_sub(self.rejected)
            .saturating_sub(self.failed_users)
    }
}

// ============================================================================
// Migration Report
// ============================================================================

/// Result of a full migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Roles step.
    pub roles: StepResult,

    /// Groups step; `None` when groups are not mapped.
    pub groups: Option<StepResult>,

    /// Custom attributes step.
    pub custom_attributes: StepResult,

    /// Users step.
    pub users: UserUploadResult,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

impl MigrationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            roles: StepResult::default(),
            groups: None,
            custom_attributes: StepResult::default(),
            users: UserUploadResult::default(),
            started_at,
            completed_at: started_at,
        }
    }

    /// Marks the run as complete.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.completed_at = Utc::now();
        self
    }

    /// Returns true if anything failed along the way.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        let steps = [Some(self.roles), self.groups, Some(self.custom_attributes)];
        steps.iter().flatten().any(|s| s.failed > 0)
            || self.users.failed_batches > 0
            || self.users.rejected > 0
            || self.users.failed_deactivations > 0
            || self.users.unreadable_files > 0
    }

    /// Rows for the console summary table.
    #[must_use]
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        let mut rows = vec![SummaryRow::step("Roles", &self.roles)];
        if let Some(groups) = &self.groups {
            rows.push(SummaryRow::step("Groups", groups));
        }
        rows.push(SummaryRow::step("Custom attributes", &self.custom_attributes));
        rows.push(SummaryRow {
            entity: "Users",
            created: self.users.created(),
            existing: 0,
            failed: self.users.rejected + self.users.skipped + self.users.failed_users,
        });
        rows.push(SummaryRow {
            entity: "Deactivated users",
            created: self.users.deactivated,
            existing: 0,
            failed: self.users.failed_deactivations,
        });
        rows
    }
}

/// One line of the console summary.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryRow {
    /// Entity kind.
    #[tabled(rename = "Entity")]
    pub entity: &'static str,
    /// Created (or processed) count.
    #[tabled(rename = "Created")]
    pub created: usize,
    /// Already present count.
    #[tabled(rename = "Existing")]
    pub existing: usize,
    /// Failure count.
    #[tabled(rename = "Failed")]
    pub failed: usize,
}

impl SummaryRow {
    fn step(entity: &'static str, step: &StepResult) -> Self {
        Self {
            entity,
            created: step.created,
            existing: step.existing,
            failed: step.failed,
        }
    }
}
