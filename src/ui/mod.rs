//! User interface module - terminal output for the command-line tool.
//!
//! Diagnostics go through `tracing`; this module only prints the
//! human-facing status lines and the dry-run payload.

pub mod formatter;

pub use formatter::{
    display_commits, display_error, display_record, display_status, display_success,
    format_commit_lines, format_summary,
};
