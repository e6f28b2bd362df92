// recoverytool/src/recover/lister.rs
use anyhow::Result;

use crate::storage::{ListCursor, ObjectVersion, VersionStore};

/// Upper bound on entries requested per listing call.
pub const LIST_MAX_KEYS: i32 = 999;

/// Paginates the version history of a prefix, threading the continuation
/// cursor between successive list calls.
pub struct VersionLister<'a, S: VersionStore> {
    store: &'a S,
    prefix: String,
    cursor: Option<ListCursor>,
    exhausted: bool,
}

impl<'a, S: VersionStore> VersionLister<'a, S> {
    pub fn new(store: &'a S, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
            cursor: None,
            exhausted: false,
        }
    }

    /// Fetches the next page of version records, or `None` once the service
    /// reports the listing complete.
    ///
    /// A service failure aborts the whole listing; a silently truncated
    /// history must never feed the planner.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ObjectVersion>>> {
        if self.exhausted {
            return Ok(None);
        }

        tracing::debug!(
            "Listing object versions for prefix '{}' with cursor: {:?}",
            self.prefix,
            self.cursor
        );
        let page = self
            .store
            .list_versions(&self.prefix, self.cursor.as_ref(), LIST_MAX_KEYS)
            .await?;

        self.cursor = page.next;
        if self.cursor.is_none() {
            self.exhausted = true;
        }
        Ok(Some(page.versions))
    }
}
