//! User upload.
//!
//! One batch create call per user export file, in file name order, with a
//! pause between files. Disabled users are created like everyone else and
//! then deactivated one by one.

use kc_export::{scanner, UserExport};

use crate::migrator::Migrator;
use crate::output;
use crate::report::UserUploadResult;
use crate::user::to_batch_user;

/// Users between console progress lines.
const PROGRESS_INTERVAL: usize = 10;

/// True when going from `before` to `after` processed users crosses a new
/// multiple of [`PROGRESS_INTERVAL`].
#[must_use]
pub fn crosses_progress_mark(before: usize, after: usize) -> bool {
    after / PROGRESS_INTERVAL > before / PROGRESS_INTERVAL
}

impl Migrator {
    /// Uploads every user export file.
    pub async fn process_users(&self) -> UserUploadResult {
        output::info("Starting user migration...");

        let files = match self.source.user_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Failed to list user files: {e}");
                output::warning("No user files could be read");
                return UserUploadResult::default();
            }
        };

        let mut total = UserUploadResult::default();

        for path in &files {
            let users = match scanner::load_users(path) {
                Ok(users) => users,
                Err(e) => {
                    tracing::error!(file = %path.display(), "Skipping user file: {e}");
                    total.unreadable_files += 1;
                    continue;
                }
            };

            tracing::info!(file = %path.display(), users = users.len(), "Uploading user file");
            let before = total.processed;
            let result = self.batch_create_users(&users).await;
            total.merge(&result);

            if crosses_progress_mark(before, total.processed) {
                output::info(&format!("Processed {} users...", total.processed));
            }

            if !self.options.batch_pause.is_zero() {
                tokio::time::sleep(self.options.batch_pause).await;
            }
        }

        output::success(&format!(
            "Migration complete. Total users processed: {}",
            total.processed
        ));
        total
    }

    /// Creates one file's users in a single batch call, then deactivates
    /// the disabled ones.
    pub async fn batch_create_users(&self, users: &[UserExport]) -> UserUploadResult {
        let mut result = UserUploadResult::default();
        let mut batch = Vec::with_capacity(users.len());
        let mut disabled = Vec::new();

        for user in users {
            match to_batch_user(user, &self.options) {
                Ok(entry) => {
                    if !user.is_enabled() {
                        disabled.push(entry.login_id.clone());
                    }
                    batch.push(entry);
                }
                Err(e) => {
                    tracing::warn!(user_id = ?user.id, "Skipping user: {e}");
                    result.skipped += 1;
                }
            }
        }

        if batch.is_empty() {
            tracing::info!("No users to upload in this file");
            return result;
        }

        result.batches = 1;
        result.processed = batch.len();

        match self.api.batch_create_users(&batch).await {
            Ok(response) => {
                for failed in &response.failed_users {
                    tracing::error!(
                        login_id = failed.login_id().unwrap_or("<unknown>"),
                        "User was not created: {}",
                        failed.failure
                    );
                }
                result.rejected = response.failed_users.len();
                tracing::info!(
                    submitted = batch.len(),
                    rejected = result.rejected,
                    "Batch created"
                );
            }
            Err(e) => {
                result.failed_batches = 1;
                result.failed_users = batch.len();
                tracing::error!(users = batch.len(), "Batch create failed: {e}");
            }
        }

        for login_id in &disabled {
            match self.api.deactivate_user(login_id).await {
                Ok(()) => {
                    tracing::info!(login_id = %login_id, "Deactivated user");
                    result.deactivated += 1;
                }
                Err(e) => {
                    tracing::error!(login_id = %login_id, "Failed to deactivate user: {e}");
                    result.failed_deactivations += 1;
                }
            }
        }

        result
    }
}
