// recoverytool/src/recover/logic.rs
use anyhow::{Context, Result};

use crate::config::RecoveryConfig;
use crate::storage::VersionStore;

use super::ActionReport;
use super::delete::delete_orphan_keys;
use super::lister::VersionLister;
use super::plan::{PlanBuilder, RecoveryPlan};
use super::restore::restore_target_versions;

/// Reports from the two mutating phases of a recovery run.
#[derive(Debug, Default)]
pub struct RecoveryReport {
    pub restores: Vec<ActionReport>,
    pub deletions: Vec<ActionReport>,
}

/// Orchestrates one recovery run.
///
/// 1. Pages through the prefix's version history and folds it into a plan.
/// 2. Restores each key to its target version.
/// 3. Deletes orphan keys, only when the caller opted in.
///
/// The plan is fully built and frozen before any mutating call. There is no
/// rollback across phases; per-key failures surface in the report and the
/// log, not as a run failure.
pub async fn perform_recovery_orchestration<S: VersionStore>(
    store: &S,
    recovery_config: &RecoveryConfig,
) -> Result<RecoveryReport> {
    tracing::info!(
        "Starting recovery process for prefix '{}' up to time {}",
        recovery_config.folder_prefix,
        recovery_config.recovery_time.format("%Y-%m-%dT%H:%M:%SZ")
    );

    let plan = build_recovery_plan(store, recovery_config).await?;
    tracing::debug!(
        "Finished getting object versions. Found {} target versions and {} keys without older versions",
        plan.target_versions.len(),
        plan.orphan_keys.len()
    );

    let restores =
        restore_target_versions(store, &plan.target_versions, recovery_config.dry_run).await;

    let deletions = if recovery_config.delete_newer_objects {
        delete_orphan_keys(store, &plan.orphan_keys, recovery_config.dry_run).await
    } else {
        Vec::new()
    };

    tracing::info!("Recovery process completed.");
    Ok(RecoveryReport {
        restores,
        deletions,
    })
}

/// Drives the paginated listing through the planner.
///
/// A listing failure aborts the run: a partially observed history cannot be
/// trusted to classify keys.
async fn build_recovery_plan<S: VersionStore>(
    store: &S,
    recovery_config: &RecoveryConfig,
) -> Result<RecoveryPlan> {
    let mut lister = VersionLister::new(store, &recovery_config.folder_prefix);
    let mut builder = PlanBuilder::new(recovery_config.recovery_time);

    while let Some(page) = lister
        .next_page()
        .await
        .context("Failed while paginating object version history")?
    {
        for version in &page {
            builder.observe(version);
        }
    }
    Ok(builder.finish())
}
