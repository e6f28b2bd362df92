// recoverytool/src/config/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Parser;

/// Command-line arguments for the point-in-time recovery tool.
#[derive(Debug, Parser)]
#[command(name = "recoverytool")]
#[command(about = "Point-in-time recovery for a versioned object-storage prefix")]
#[command(version)]
pub struct CliArgs {
    /// Access key ID for the object-storage service.
    #[arg(long, env = "RECOVERY_ACCESS_KEY_ID")]
    pub access_key_id: String,

    /// Access key secret for the object-storage service.
    #[arg(long, env = "RECOVERY_ACCESS_KEY_SECRET", hide_env_values = true)]
    pub access_key_secret: String,

    /// Storage endpoint URL (e.g. https://s3.eu-central-1.amazonaws.com).
    #[arg(long, env = "RECOVERY_ENDPOINT")]
    pub endpoint: String,

    /// Region the bucket lives in.
    #[arg(long, env = "RECOVERY_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Bucket holding the objects to recover.
    #[arg(long, env = "RECOVERY_BUCKET_NAME")]
    pub bucket_name: String,

    /// Key prefix to recover (e.g. "my-folder/").
    #[arg(long)]
    pub folder_prefix: String,

    /// Recovery time in UTC, format YYYY-MM-DDTHH:MM:SSZ.
    #[arg(long)]
    pub recovery_time: String,

    /// Compute and log intended actions without touching the bucket.
    #[arg(long)]
    pub dry_run: bool,

    /// Delete objects whose earliest version is after the recovery time.
    #[arg(long)]
    pub delete_newer_objects: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// Connection settings for the S3-compatible storage service.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

/// What to recover and how.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    pub folder_prefix: String,
    pub recovery_time: DateTime<Utc>,
    pub dry_run: bool,
    pub delete_newer_objects: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub recovery: RecoveryConfig,
}

impl AppConfig {
    /// Validates raw CLI arguments into the runtime configuration.
    ///
    /// Fails before any storage call is made: a malformed recovery time or
    /// endpoint URL must abort the process, not a half-finished run.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let recovery_time = parse_recovery_time(&args.recovery_time)?;

        url::Url::parse(&args.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", args.endpoint))?;

        if args.bucket_name.trim().is_empty() {
            return Err(anyhow::anyhow!("bucket_name cannot be empty"));
        }

        Ok(AppConfig {
            storage: StorageConfig {
                endpoint_url: args.endpoint.clone(),
                region: args.region.clone(),
                access_key_id: args.access_key_id.clone(),
                secret_access_key: args.access_key_secret.clone(),
                bucket_name: args.bucket_name.clone(),
            },
            recovery: RecoveryConfig {
                folder_prefix: args.folder_prefix.clone(),
                recovery_time,
                dry_run: args.dry_run,
                delete_newer_objects: args.delete_newer_objects,
            },
        })
    }
}

/// Parses the recovery time from its CLI representation.
pub fn parse_recovery_time(recovery_time_str: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(recovery_time_str, "%Y-%m-%dT%H:%M:%SZ")
        .with_context(|| {
            format!(
                "Invalid recovery time '{}'. Use UTC time in format: YYYY-MM-DDTHH:MM:SSZ",
                recovery_time_str
            )
        })?;
    Ok(naive.and_utc())
}
