// recoverytool/src/recover/plan.rs
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::storage::ObjectVersion;

/// The version a key will be rolled back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetVersion {
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
}

/// Result of planning: the version each key is restored to, and the keys
/// that did not exist yet at the cutoff.
///
/// Every key observed in the version stream ends up in exactly one of the
/// two collections.
#[derive(Debug, Clone, Default)]
pub struct RecoveryPlan {
    pub target_versions: BTreeMap<String, TargetVersion>,
    pub orphan_keys: BTreeSet<String>,
}

/// Folds a version stream into a `RecoveryPlan`, one record at a time.
///
/// The stream is not globally time-ordered across pages, so a key's orphan
/// status stays tentative until the whole stream has been observed.
#[derive(Debug)]
pub struct PlanBuilder {
    cutoff: DateTime<Utc>,
    target_versions: BTreeMap<String, TargetVersion>,
    orphan_keys: BTreeSet<String>,
}

impl PlanBuilder {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            target_versions: BTreeMap::new(),
            orphan_keys: BTreeSet::new(),
        }
    }

    /// Folds one version record into the plan.
    ///
    /// A record at or before the cutoff replaces the held target when it is
    /// strictly newer, and clears any tentative orphan mark for its key. On
    /// an exact timestamp tie the first-processed record is kept, so the
    /// outcome depends on service arrival order.
    pub fn observe(&mut self, version: &ObjectVersion) {
        tracing::debug!(
            "Processing version for key: {}, version time: {}",
            version.key,
            version.last_modified
        );

        if version.last_modified <= self.cutoff {
            let replace = self
                .target_versions
                .get(&version.key)
                .map_or(true, |held| version.last_modified > held.last_modified);
            if replace {
                tracing::debug!("Updating target version for key: {}", version.key);
                self.target_versions.insert(
                    version.key.clone(),
                    TargetVersion {
                        version_id: version.version_id.clone(),
                        last_modified: version.last_modified,
                    },
                );
            }
            self.orphan_keys.remove(&version.key);
        } else if !self.target_versions.contains_key(&version.key) {
            tracing::debug!("Marking key as newer than cutoff: {}", version.key);
            self.orphan_keys.insert(version.key.clone());
        }
    }

    /// Freezes the plan. Orphan membership is only trustworthy here, after
    /// the full stream has been observed.
    pub fn finish(self) -> RecoveryPlan {
        RecoveryPlan {
            target_versions: self.target_versions,
            orphan_keys: self.orphan_keys,
        }
    }
}
