//! CI execution context
//!
//! Read once from the GitHub Actions environment at startup and passed
//! explicitly to the stages that need it.

use crate::error::{BuildInfoError, Result};

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Values the CI runner supplies about the current run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiContext {
    /// Base URL of the source-control host (e.g. `https://github.com`)
    pub server_url: String,
    pub owner: String,
    pub repo: String,
    /// Ref that triggered the run (e.g. `refs/heads/main`)
    pub git_ref: String,
    /// Commit SHA of the run
    pub sha: String,
    pub run_number: u64,
    pub run_id: u64,
    /// Runner debug logging is switched on
    pub debug: bool,
}

impl CiContext {
    /// Read the context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| BuildInfoError::context(format!("{} is not set", key)))
        };
        let number = |key: &str| -> Result<u64> {
            let value = require(key)?;
            value.parse::<u64>().map_err(|_| {
                BuildInfoError::context(format!("{} is not a number: '{}'", key, value))
            })
        };

        let repository = require("GITHUB_REPOSITORY")?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
            .ok_or_else(|| {
                BuildInfoError::context(format!(
                    "GITHUB_REPOSITORY must look like owner/repo, got '{}'",
                    repository
                ))
            })?;

        let server_url = lookup("GITHUB_SERVER_URL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Ok(CiContext {
            server_url: server_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: require("GITHUB_REF")?,
            sha: require("GITHUB_SHA")?,
            run_number: number("GITHUB_RUN_NUMBER")?,
            run_id: number("GITHUB_RUN_ID")?,
            debug: lookup("RUNNER_DEBUG").as_deref() == Some("1"),
        })
    }

    /// Web URL of the repository
    pub fn repo_uri(&self) -> String {
        format!("{}/{}/{}", self.server_url, self.owner, self.repo)
    }

    /// Web URL of the current workflow run
    pub fn build_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repo_uri(), self.run_id)
    }
}
