//! Build information payload
//!
//! Field names follow the Octopus Deploy build information API.

use serde::Serialize;

use crate::context::CiContext;
use crate::domain::{normalize_branch, Commit};

/// Build environment reported to the deployment service
pub const BUILD_ENVIRONMENT: &str = "GitHub Actions";

/// Version-control type reported to the deployment service
pub const VCS_TYPE: &str = "Git";

/// A commit as it appears in the outbound record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitEntry {
    pub id: String,
    pub comment: String,
}

impl From<&Commit> for CommitEntry {
    fn from(commit: &Commit) -> Self {
        CommitEntry {
            id: commit.hash.clone(),
            comment: commit.message.clone(),
        }
    }
}

/// A package the build information is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageIdentity {
    pub id: String,
    pub version: String,
}

/// The record submitted to the build information store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildInformationRecord {
    #[serde(rename = "spaceName")]
    pub space: String,
    #[serde(rename = "BuildEnvironment")]
    pub environment: String,
    pub build_number: String,
    pub build_url: String,
    pub branch: String,
    pub vcs_type: String,
    pub vcs_root: String,
    #[serde(rename = "VcsCommitNumber")]
    pub vcs_commit: String,
    pub commits: Vec<CommitEntry>,
    pub packages: Vec<PackageIdentity>,
}

impl BuildInformationRecord {
    /// Pretty-printed JSON, as sent on the wire
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Caller-supplied inputs for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    pub space: String,
    pub packages: Vec<String>,
    pub version: String,
    /// Branch to report instead of the CI ref
    pub branch: Option<String>,
}

/// Pair every package with the invocation's version
pub fn package_identities(packages: &[String], version: &str) -> Vec<PackageIdentity> {
    packages
        .iter()
        .map(|id| PackageIdentity {
            id: id.clone(),
            version: version.to_string(),
        })
        .collect()
}

/// Assemble the build information record.
pub fn build_record(inputs: &BuildInputs, ctx: &CiContext, commits: &[Commit]) -> BuildInformationRecord {
    let branch = inputs
        .branch
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or(&ctx.git_ref);

    BuildInformationRecord {
        space: inputs.space.clone(),
        environment: BUILD_ENVIRONMENT.to_string(),
        build_number: ctx.run_number.to_string(),
        build_url: ctx.build_url(),
        branch: normalize_branch(branch).to_string(),
        vcs_type: VCS_TYPE.to_string(),
        vcs_root: ctx.repo_uri(),
        vcs_commit: ctx.sha.clone(),
        commits: commits.iter().map(CommitEntry::from).collect(),
        packages: package_identities(&inputs.packages, &inputs.version),
    }
}
