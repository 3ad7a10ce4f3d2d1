//! Submission of build information to the deployment service

pub mod http;
pub mod mock;

pub use http::OctopusClient;
pub use mock::RecordingClient;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::payload::BuildInformationRecord;

/// What the service does when build information for the package version
/// already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteMode {
    /// Reject the push
    #[default]
    #[serde(alias = "FailIfExists")]
    #[value(alias = "FailIfExists")]
    FailIfExists,
    /// Replace the stored record
    #[serde(alias = "OverwriteExisting")]
    #[value(alias = "OverwriteExisting")]
    OverwriteExisting,
    /// Keep the stored record and report success
    #[serde(alias = "IgnoreIfExists")]
    #[value(alias = "IgnoreIfExists")]
    IgnoreIfExists,
}

impl OverwriteMode {
    /// Value expected by the service's `overwriteMode` parameter
    pub fn as_api_str(&self) -> &'static str {
        match self {
            OverwriteMode::FailIfExists => "FailIfExists",
            OverwriteMode::OverwriteExisting => "OverwriteExisting",
            OverwriteMode::IgnoreIfExists => "IgnoreIfExists",
        }
    }
}

impl fmt::Display for OverwriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Client for a remote build information store
pub trait BuildInformationClient {
    /// Submit one record under the given overwrite policy
    fn push(&self, record: &BuildInformationRecord, mode: OverwriteMode) -> Result<()>;
}

/// Push the record, logging the outcome.
///
/// Errors from the client are returned unchanged after a diagnostic naming
/// the version being published.
pub fn publish<C: BuildInformationClient + ?Sized>(
    client: &C,
    record: &BuildInformationRecord,
    mode: OverwriteMode,
    version: &str,
) -> Result<()> {
    tracing::debug!(space = %record.space, mode = %mode, "Pushing build information");

    match client.push(record, mode) {
        Ok(()) => {
            tracing::info!("Successfully pushed build information to Octopus");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to push build information for version {}", version);
            Err(e)
        }
    }
}
