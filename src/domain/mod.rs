//! Domain logic - pure rules independent of git operations and the remote service

pub mod branch;
pub mod commit;
pub mod tag;

pub use branch::normalize_branch;
pub use commit::Commit;
pub use tag::{previous_tag, sort_by_version_desc, TagPattern, TagRange};
