// recoverytool/src/recover/restore.rs
use std::collections::BTreeMap;

use crate::storage::VersionStore;

use super::plan::TargetVersion;
use super::{ActionOutcome, ActionReport};

/// Restores each planned key by copying the object onto itself pinned at
/// the target version, making that version current again.
///
/// Failures are per-key: logged with key and version context, recorded in
/// the report, and never abort the remaining keys. In dry-run mode no
/// storage call is made, one log line per intended action.
pub async fn restore_target_versions<S: VersionStore>(
    store: &S,
    target_versions: &BTreeMap<String, TargetVersion>,
    dry_run: bool,
) -> Vec<ActionReport> {
    tracing::debug!(
        "Starting to restore latest versions for {} objects",
        target_versions.len()
    );

    let mut reports = Vec::with_capacity(target_versions.len());
    for (key, target) in target_versions {
        let modified = target.last_modified.format("%Y-%m-%dT%H:%M:%SZ");

        if dry_run {
            tracing::info!(
                "[Dry Run] Would restore '{}' to version '{}' modified at {}",
                key,
                target.version_id,
                modified
            );
            reports.push(ActionReport {
                key: key.clone(),
                outcome: ActionOutcome::WouldRestore,
            });
            continue;
        }

        tracing::info!(
            "Restoring '{}' to version '{}' modified at {}",
            key,
            target.version_id,
            modified
        );
        match store.restore_version(key, &target.version_id).await {
            Ok(()) => {
                tracing::debug!("Successfully restored object: {}", key);
                reports.push(ActionReport {
                    key: key.clone(),
                    outcome: ActionOutcome::Restored,
                });
            }
            Err(e) => {
                tracing::error!(
                    "Error restoring '{}' version '{}': {:#}",
                    key,
                    target.version_id,
                    e
                );
                reports.push(ActionReport {
                    key: key.clone(),
                    outcome: ActionOutcome::Failed(format!("{:#}", e)),
                });
            }
        }
    }
    reports
}
