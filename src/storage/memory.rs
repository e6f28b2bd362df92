//! In-memory version store for tests, recording operations for assertions.

use std::sync::Mutex;

use anyhow::{Result, bail};

use super::{ListCursor, ObjectVersion, VersionPage, VersionStore};

/// Record of a store operation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreOp {
    ListVersions { prefix: String },
    RestoreVersion { key: String, version_id: String },
    DeleteCurrent { key: String },
}

/// Serves a fixed version listing in fixture order, split into pages of
/// `page_size` entries, and records every call.
pub(crate) struct MemoryVersionStore {
    versions: Vec<ObjectVersion>,
    page_size: usize,
    operations: Mutex<Vec<StoreOp>>,
    fail_keys: Mutex<Vec<String>>,
    fail_after_pages: Mutex<Option<usize>>,
}

impl MemoryVersionStore {
    pub(crate) fn new(versions: Vec<ObjectVersion>) -> Self {
        Self::with_page_size(versions, 999)
    }

    pub(crate) fn with_page_size(versions: Vec<ObjectVersion>, page_size: usize) -> Self {
        Self {
            versions,
            page_size,
            operations: Mutex::new(Vec::new()),
            fail_keys: Mutex::new(Vec::new()),
            fail_after_pages: Mutex::new(None),
        }
    }

    /// Returns all recorded operations.
    pub(crate) fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().expect("lock").clone()
    }

    /// Returns only the operations that would mutate the bucket.
    pub(crate) fn mutating_operations(&self) -> Vec<StoreOp> {
        self.operations()
            .into_iter()
            .filter(|op| !matches!(op, StoreOp::ListVersions { .. }))
            .collect()
    }

    /// Injects a failure for restore/delete calls touching `key`.
    pub(crate) fn inject_failure(&self, key: impl Into<String>) {
        self.fail_keys.lock().expect("lock").push(key.into());
    }

    /// Makes listing fail once the given number of pages has been served.
    pub(crate) fn fail_listing_after(&self, pages: usize) {
        *self.fail_after_pages.lock().expect("lock") = Some(pages);
    }

    fn is_failing(&self, key: &str) -> bool {
        self.fail_keys.lock().expect("lock").iter().any(|k| k == key)
    }
}

impl VersionStore for MemoryVersionStore {
    async fn list_versions(
        &self,
        prefix: &str,
        cursor: Option<&ListCursor>,
        max_keys: i32,
    ) -> Result<VersionPage> {
        let pages_served = {
            let mut ops = self.operations.lock().expect("lock");
            ops.push(StoreOp::ListVersions {
                prefix: prefix.to_string(),
            });
            ops.iter()
                .filter(|op| matches!(op, StoreOp::ListVersions { .. }))
                .count()
        };
        if let Some(limit) = *self.fail_after_pages.lock().expect("lock") {
            if pages_served > limit {
                bail!("injected listing failure after {} pages", limit);
            }
        }

        let matching: Vec<&ObjectVersion> = self
            .versions
            .iter()
            .filter(|v| v.key.starts_with(prefix))
            .collect();
        let start = match cursor {
            None => 0,
            Some(c) => matching
                .iter()
                .position(|v| v.key == c.key_marker && v.version_id == c.version_id_marker)
                .map_or(0, |i| i + 1),
        };

        let take = self.page_size.min(max_keys as usize);
        let page: Vec<ObjectVersion> = matching
            .iter()
            .skip(start)
            .take(take)
            .map(|v| (*v).clone())
            .collect();
        let next = if start + page.len() < matching.len() {
            page.last().map(|last| ListCursor {
                key_marker: last.key.clone(),
                version_id_marker: last.version_id.clone(),
            })
        } else {
            None
        };

        Ok(VersionPage {
            versions: page,
            next,
        })
    }

    async fn restore_version(&self, key: &str, version_id: &str) -> Result<()> {
        self.operations
            .lock()
            .expect("lock")
            .push(StoreOp::RestoreVersion {
                key: key.to_string(),
                version_id: version_id.to_string(),
            });
        if self.is_failing(key) {
            bail!("injected restore failure for '{}'", key);
        }
        Ok(())
    }

    async fn delete_current(&self, key: &str) -> Result<()> {
        self.operations
            .lock()
            .expect("lock")
            .push(StoreOp::DeleteCurrent {
                key: key.to_string(),
            });
        if self.is_failing(key) {
            bail!("injected delete failure for '{}'", key);
        }
        Ok(())
    }
}
