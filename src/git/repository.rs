use crate::domain::{sort_by_version_desc, Commit};
use crate::error::{BuildInfoError, Result};
use crate::git::{validate_revision, CommitRangeQuery, TagLister};
use chrono::{DateTime, FixedOffset};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository implementing the history traits
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    fn resolve_commit(&self, revision: &str) -> Result<Oid> {
        validate_revision(revision)?;

        let object = self.repo.revparse_single(revision).map_err(|e| {
            BuildInfoError::history(format!("Cannot resolve revision '{}': {}", revision, e))
        })?;
        let commit = object.peel_to_commit().map_err(|e| {
            BuildInfoError::history(format!("Revision '{}' is not a commit: {}", revision, e))
        })?;

        Ok(commit.id())
    }
}

impl TagLister for Git2Repository {
    fn list_tags_by_version_desc(&self) -> Result<Vec<String>> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| BuildInfoError::history(format!("Cannot list tags: {}", e)))?;

        let mut tags: Vec<String> = names.iter().flatten().map(|s| s.to_string()).collect();
        sort_by_version_desc(&mut tags);
        Ok(tags)
    }
}

impl CommitRangeQuery for Git2Repository {
    fn commits_between(&self, older: &str, newer: &str) -> Result<Vec<Commit>> {
        let older_oid = self.resolve_commit(older)?;
        let newer_oid = self.resolve_commit(newer)?;

        let walk_err = |e: git2::Error| {
            BuildInfoError::history(format!("Cannot walk {}..{}: {}", older, newer, e))
        };

        let mut revwalk = self.repo.revwalk().map_err(walk_err)?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .map_err(walk_err)?;
        revwalk.push(newer_oid).map_err(walk_err)?;
        revwalk.hide(older_oid).map_err(walk_err)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(walk_err)?;
            let commit = self.repo.find_commit(oid).map_err(walk_err)?;

            let author = commit.author();
            commits.push(Commit {
                hash: oid.to_string(),
                author: author.name().unwrap_or("unknown").to_string(),
                date: format_git_time(&author.when()),
                message: commit.summary().unwrap_or_default().to_string(),
            });
        }

        Ok(commits)
    }
}

/// Render a git timestamp as ISO 8601 in the author's own offset.
fn format_git_time(time: &git2::Time) -> String {
    let Some(utc) = DateTime::from_timestamp(time.seconds(), 0) else {
        return String::new();
    };

    match FixedOffset::east_opt(time.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_git_time_keeps_offset() {
        let time = git2::Time::new(1_700_000_000, 120);
        assert_eq!(format_git_time(&time), "2023-11-15T00:13:20+02:00");
    }

    #[test]
    fn test_format_git_time_utc() {
        let time = git2::Time::new(0, 0);
        assert_eq!(format_git_time(&time), "1970-01-01T00:00:00+00:00");
    }
}
