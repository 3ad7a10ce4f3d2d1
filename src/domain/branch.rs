/// Prefix git uses for fully-qualified local branch references
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Strip the local branch prefix from a reference, if present.
///
/// `refs/heads/main` becomes `main`; anything else (including tag refs and
/// already-short names like `feature/x`) is returned unchanged.
pub fn normalize_branch(reference: &str) -> &str {
    reference
        .strip_prefix(LOCAL_BRANCH_PREFIX)
        .unwrap_or(reference)
}
