use crate::domain::Commit;
use crate::error::{BuildInfoError, Result};
use crate::git::{CommitRangeQuery, TagLister};
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Tags are returned in insertion order, so tests control the version
/// ordering directly. Commit ranges are keyed by `(older, newer)`.
#[derive(Default)]
pub struct MockRepository {
    tags: Vec<String>,
    ranges: HashMap<(String, String), Vec<Commit>>,
    queries: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose tag list is already sorted newest first
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockRepository {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Register the commits returned for a revision range
    pub fn add_range(&mut self, older: impl Into<String>, newer: impl Into<String>, commits: Vec<Commit>) {
        self.ranges.insert((older.into(), newer.into()), commits);
    }

    /// Revision ranges queried so far
    pub fn queried_ranges(&self) -> Vec<(String, String)> {
        self.queries.borrow().clone()
    }
}

impl TagLister for MockRepository {
    fn list_tags_by_version_desc(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }
}

impl CommitRangeQuery for MockRepository {
    fn commits_between(&self, older: &str, newer: &str) -> Result<Vec<Commit>> {
        self.queries
            .borrow_mut()
            .push((older.to_string(), newer.to_string()));

        self.ranges
            .get(&(older.to_string(), newer.to_string()))
            .cloned()
            .ok_or_else(|| BuildInfoError::history(format!("Unknown revision range {}..{}", older, newer)))
    }
}
