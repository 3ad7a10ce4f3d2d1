use std::cmp::Ordering;

use crate::error::{BuildInfoError, Result};

/// Placeholder substituted with the release version in a tag pattern
const VERSION_PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a tag pattern, rejecting patterns without a `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(VERSION_PLACEHOLDER) {
            return Err(BuildInfoError::config(format!(
                "Tag pattern '{}' must contain {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace(VERSION_PLACEHOLDER, version)
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}

/// The pair of release tags bounding a build's commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRange {
    /// The next older release tag
    pub previous: String,
    /// The tag of the release being published
    pub current: String,
}

/// Find the tag for `version` and the tag released immediately before it.
///
/// `tags` must be sorted newest first, so the predecessor is the entry right
/// after the release tag.
pub fn previous_tag(tags: &[String], pattern: &TagPattern, version: &str) -> Result<TagRange> {
    let current = pattern.format(version);
    let index = tags
        .iter()
        .position(|tag| *tag == current)
        .ok_or_else(|| BuildInfoError::TagNotFound {
            version: version.to_string(),
            tag: current.clone(),
            available: tags.to_vec(),
        })?;

    let previous = tags
        .get(index + 1)
        .ok_or_else(|| BuildInfoError::NoPreviousTag {
            tag: current.clone(),
        })?;

    Ok(TagRange {
        previous: previous.clone(),
        current,
    })
}

/// Sort tags newest first, in the same order as `git tag --sort=-v:refname`.
pub fn sort_by_version_desc(tags: &mut [String]) {
    tags.sort_by(|a, b| version_cmp(b, a));
}

/// Compare two tag names the way git's version sort does.
///
/// Runs of ASCII digits are compared by numeric value, everything else byte
/// by byte. When one name is a prefix of the other the shorter one is older,
/// so `v2.0.0` sorts below `v2.0.0-rc.1`.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let (a_bytes, b_bytes) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a_bytes.len() && j < b_bytes.len() {
        if a_bytes[i].is_ascii_digit() && b_bytes[j].is_ascii_digit() {
            let a_end = digit_run_end(a_bytes, i);
            let b_end = digit_run_end(b_bytes, j);
            let ordering = compare_numeric(&a[i..a_end], &b[j..b_end]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = a_end;
            j = b_end;
        } else {
            let ordering = a_bytes[i].cmp(&b_bytes[j]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i += 1;
            j += 1;
        }
    }

    (a_bytes.len() - i)
        .cmp(&(b_bytes.len() - j))
        .then_with(|| a.cmp(b))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

/// Compare digit strings by numeric value; any length is accepted
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
