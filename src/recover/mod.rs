mod delete;
mod lister;
mod logic;
mod plan;
mod restore;

use anyhow::Result;

use crate::config::RecoveryConfig;
use crate::storage::VersionStore;

/// Per-key result of a mutating recovery phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub key: String,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Restored,
    Deleted,
    WouldRestore,
    WouldDelete,
    Failed(String),
}

/// Public entry point for the recovery process.
///
/// Orchestrates listing, planning and the two apply phases against the
/// given store. Per-key restore/delete failures are logged and reported but
/// do not fail the run; a listing failure does.
pub async fn run_recovery_flow<S: VersionStore>(
    store: &S,
    recovery_config: &RecoveryConfig,
) -> Result<()> {
    let report = logic::perform_recovery_orchestration(store, recovery_config).await?;
    tracing::debug!(
        "Attempted {} restore actions and {} delete actions",
        report.restores.len(),
        report.deletions.len()
    );
    Ok(())
}
