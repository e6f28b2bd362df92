// recoverytool/src/storage/mod.rs
use anyhow::{Context, Result};
use aws_sdk_s3 as s3;
use chrono::{DateTime, Utc};
use s3::config::Region;

use crate::config::StorageConfig;

#[cfg(test)]
pub(crate) mod memory;

/// One entry of an object's version history, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    pub key: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
}

/// Continuation markers for a paginated version listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    pub key_marker: String,
    pub version_id_marker: String,
}

/// One page of a version listing. `next` is `Some` while the service
/// reports the listing truncated.
#[derive(Debug, Clone)]
pub struct VersionPage {
    pub versions: Vec<ObjectVersion>,
    pub next: Option<ListCursor>,
}

/// The three object-storage operations recovery depends on.
///
/// Versions come back in service order, which is not globally sorted by
/// modification time across pages.
pub trait VersionStore {
    /// Lists one page of version history under `prefix`, resuming from
    /// `cursor` when given.
    async fn list_versions(
        &self,
        prefix: &str,
        cursor: Option<&ListCursor>,
        max_keys: i32,
    ) -> Result<VersionPage>;

    /// Makes `version_id` the current version of `key` again by copying the
    /// object onto itself. Additive: intervening versions are kept.
    async fn restore_version(&self, key: &str, version_id: &str) -> Result<()>;

    /// Deletes the current version of `key`. Older versions stay in history.
    async fn delete_current(&self, key: &str) -> Result<()>;
}

/// Builds a client for an S3-compatible endpoint using static credentials.
pub async fn build_client(storage_config: &StorageConfig) -> s3::Client {
    let sdk_config = aws_config::defaults(s3::config::BehaviorVersion::latest())
        .endpoint_url(&storage_config.endpoint_url)
        .region(Region::new(storage_config.region.clone()))
        .credentials_provider(s3::config::Credentials::new(
            &storage_config.access_key_id,
            &storage_config.secret_access_key,
            None,     // session_token
            None,     // expiry
            "Static", // provider_name
        ))
        .load()
        .await;

    s3::Client::new(&sdk_config)
}

/// `VersionStore` backed by a versioned S3-compatible bucket.
pub struct S3VersionStore {
    client: s3::Client,
    bucket_name: String,
}

impl S3VersionStore {
    pub fn new(client: s3::Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }
}

impl VersionStore for S3VersionStore {
    async fn list_versions(
        &self,
        prefix: &str,
        cursor: Option<&ListCursor>,
        max_keys: i32,
    ) -> Result<VersionPage> {
        let mut request = self
            .client
            .list_object_versions()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .max_keys(max_keys);
        if let Some(cursor) = cursor {
            request = request
                .key_marker(&cursor.key_marker)
                .version_id_marker(&cursor.version_id_marker);
        }

        let output = request.send().await.with_context(|| {
            format!(
                "Failed to list object versions for prefix '{}' in bucket {}",
                prefix, self.bucket_name
            )
        })?;

        // Delete markers are reported in a separate field and are not
        // restorable targets; only real versions are forwarded.
        let mut versions = Vec::new();
        for entry in output.versions() {
            let (Some(key), Some(version_id), Some(modified)) =
                (entry.key(), entry.version_id(), entry.last_modified())
            else {
                tracing::debug!("Skipping version entry with missing fields: {:?}", entry);
                continue;
            };
            let Some(last_modified) = to_chrono(modified) else {
                tracing::debug!("Skipping version of '{}' with out-of-range timestamp", key);
                continue;
            };
            versions.push(ObjectVersion {
                key: key.to_string(),
                version_id: version_id.to_string(),
                last_modified,
            });
        }

        let next = if output.is_truncated().unwrap_or(false) {
            match (output.next_key_marker(), output.next_version_id_marker()) {
                (Some(key_marker), Some(version_id_marker)) => Some(ListCursor {
                    key_marker: key_marker.to_string(),
                    version_id_marker: version_id_marker.to_string(),
                }),
                _ => None,
            }
        } else {
            None
        };

        Ok(VersionPage { versions, next })
    }

    async fn restore_version(&self, key: &str, version_id: &str) -> Result<()> {
        let copy_source = format!("{}/{}?versionId={}", self.bucket_name, key, version_id);
        self.client
            .copy_object()
            .bucket(&self.bucket_name)
            .copy_source(copy_source)
            .key(key)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to copy '{}' back to version '{}' in bucket {}",
                    key, version_id, self.bucket_name
                )
            })?;
        Ok(())
    }

    async fn delete_current(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to delete object '{}' from bucket {}",
                    key, self.bucket_name
                )
            })?;
        Ok(())
    }
}

fn to_chrono(timestamp: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
