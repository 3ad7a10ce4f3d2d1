//! Version-control abstraction layer
//!
//! The pipeline only needs two read-only queries from version control, each
//! behind its own trait so it can be backed by libgit2, the `git` binary, or
//! a test double.
//!
//! - [repository::Git2Repository]: in-process implementation using the `git2` crate
//! - [system::SystemGit]: implementation that shells out to the `git` binary
//! - [mock::MockRepository]: in-memory implementation for testing
//!
//! ```rust
//! # use push_build_info::git::{CommitRangeQuery, TagLister};
//! # fn example<R: TagLister + CommitRangeQuery>(repo: &R) -> push_build_info::Result<()> {
//! let tags = repo.list_tags_by_version_desc()?;
//! let commits = repo.commits_between(&tags[1], &tags[0])?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod system;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use system::SystemGit;

use crate::domain::Commit;
use crate::error::{BuildInfoError, Result};

/// Lists release tags.
pub trait TagLister {
    /// Get all tag names sorted by version, newest first
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names in descending version order
    /// * `Err` - If the tag list cannot be read
    fn list_tags_by_version_desc(&self) -> Result<Vec<String>>;
}

/// Queries commit history between two revisions.
pub trait CommitRangeQuery {
    /// Get commits reachable from `newer` but not from `older`
    ///
    /// Commits are returned in the backend's native order, newest first.
    ///
    /// # Arguments
    /// * `older` - Exclusive lower bound (tag, branch or hash)
    /// * `newer` - Inclusive upper bound (tag, branch or hash)
    ///
    /// # Returns
    /// * `Ok(Vec<Commit>)` - Commits in the range
    /// * `Err(HistoryQuery)` - If either revision is invalid or the query fails
    fn commits_between(&self, older: &str, newer: &str) -> Result<Vec<Commit>>;
}

/// A backend that answers both history queries
pub trait History: TagLister + CommitRangeQuery {}

impl<T: TagLister + CommitRangeQuery + ?Sized> History for T {}

/// Reject revisions that are empty or could be mistaken for options.
pub(crate) fn validate_revision(revision: &str) -> Result<()> {
    if revision.trim().is_empty() {
        return Err(BuildInfoError::history("Revision must not be empty"));
    }
    if revision.starts_with('-') {
        return Err(BuildInfoError::history(format!(
            "Invalid revision '{}'",
            revision
        )));
    }
    Ok(())
}
