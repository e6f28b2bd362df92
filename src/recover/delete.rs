// recoverytool/src/recover/delete.rs
use std::collections::BTreeSet;

use crate::storage::VersionStore;

use super::{ActionOutcome, ActionReport};

/// Deletes the keys whose entire version history postdates the cutoff.
///
/// Only the current version is removed; older versions stay in the bucket's
/// history. Per-key failures are logged and reported independently. In
/// dry-run mode no storage call is made.
pub async fn delete_orphan_keys<S: VersionStore>(
    store: &S,
    orphan_keys: &BTreeSet<String>,
    dry_run: bool,
) -> Vec<ActionReport> {
    tracing::debug!("Starting to delete {} newer objects", orphan_keys.len());

    let mut reports = Vec::with_capacity(orphan_keys.len());
    for key in orphan_keys {
        if dry_run {
            tracing::info!("[Dry Run] Would delete '{}'", key);
            reports.push(ActionReport {
                key: key.clone(),
                outcome: ActionOutcome::WouldDelete,
            });
            continue;
        }

        tracing::info!("Deleting '{}'", key);
        match store.delete_current(key).await {
            Ok(()) => {
                tracing::debug!("Successfully deleted object: {}", key);
                reports.push(ActionReport {
                    key: key.clone(),
                    outcome: ActionOutcome::Deleted,
                });
            }
            Err(e) => {
                tracing::error!("Error deleting '{}': {:#}", key, e);
                reports.push(ActionReport {
                    key: key.clone(),
                    outcome: ActionOutcome::Failed(format!("{:#}", e)),
                });
            }
        }
    }
    reports
}
