//! Tag resolution and commit collection stages

use crate::domain::{previous_tag, Commit, TagPattern, TagRange};
use crate::error::{BuildInfoError, Result};
use crate::git::{CommitRangeQuery, TagLister};

/// Check that a version string can be turned into a tag name.
pub fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(BuildInfoError::config("Version must not be empty"));
    }
    if version.chars().any(char::is_whitespace) {
        return Err(BuildInfoError::config(format!(
            "Version '{}' must not contain whitespace",
            version
        )));
    }
    Ok(())
}

/// Locate the release tag for `version` and the tag released before it.
///
/// # Returns
/// * `Ok(TagRange)` - The previous and current tags
/// * `Err(TagNotFound)` - If no tag matches the version
/// * `Err(NoPreviousTag)` - If the matching tag is the oldest one
pub fn resolve_tag_range<L: TagLister + ?Sized>(
    lister: &L,
    pattern: &TagPattern,
    version: &str,
) -> Result<TagRange> {
    validate_version(version)?;

    let current = pattern.format(version);
    let tags = lister.list_tags_by_version_desc()?;
    tracing::debug!(count = tags.len(), tag = %current, "Resolving release tag");

    let range = previous_tag(&tags, pattern, version)?;
    tracing::debug!(previous = %range.previous, current = %range.current, "Resolved tag range");
    Ok(range)
}

/// Collect the commits that went into the release bounded by `range`.
pub fn collect_commits<Q: CommitRangeQuery + ?Sized>(query: &Q, range: &TagRange) -> Result<Vec<Commit>> {
    let commits = query.commits_between(&range.previous, &range.current)?;
    tracing::debug!(
        count = commits.len(),
        "Collected commits {}..{}",
        range.previous,
        range.current
    );
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_resolve_tag_range() {
        let repo = MockRepository::with_tags(["v2.0.0", "v1.5.0", "v1.0.0"]);
        let range = resolve_tag_range(&repo, &TagPattern::default(), "1.5.0").unwrap();
        assert_eq!(range.previous, "v1.0.0");
        assert_eq!(range.current, "v1.5.0");
    }

    #[test]
    fn test_resolve_with_custom_pattern() {
        let repo = MockRepository::with_tags(["release-2", "release-1"]);
        let pattern = TagPattern::new("release-{version}").unwrap();
        let range = resolve_tag_range(&repo, &pattern, "2").unwrap();
        assert_eq!(range.previous, "release-1");
    }

    #[test]
    fn test_resolve_unknown_version() {
        let repo = MockRepository::with_tags(["v2.0.0", "v1.0.0"]);
        let err = resolve_tag_range(&repo, &TagPattern::default(), "9.9.9").unwrap_err();
        assert!(err.to_string().contains("v2.0.0, v1.0.0"));
    }

    #[test]
    fn test_resolve_rejects_blank_version() {
        let repo = MockRepository::with_tags(["v1.0.0"]);
        assert!(matches!(
            resolve_tag_range(&repo, &TagPattern::default(), ""),
            Err(BuildInfoError::Config(_))
        ));
        assert!(validate_version("1.0 .0").is_err());
    }

    #[test]
    fn test_collect_commits_queries_range() {
        let mut repo = MockRepository::with_tags(["v1.1.0", "v1.0.0"]);
        repo.add_range("v1.0.0", "v1.1.0", vec![Commit::new("abc", "Dev", "d", "fix bug")]);

        let range = TagRange {
            previous: "v1.0.0".to_string(),
            current: "v1.1.0".to_string(),
        };
        let commits = collect_commits(&repo, &range).unwrap();
        assert_eq!(commits[0].message, "fix bug");
    }
}
