//! Pure formatting functions for UI output.

use console::style;

use crate::payload::{BuildInformationRecord, CommitEntry};

/// Commits shown before the list is summarised
const MAX_LISTED_COMMITS: usize = 10;

/// Subject length kept when listing commits
const MAX_SUBJECT_CHARS: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the commits included in a record.
///
/// Shows up to 10 commits; if more exist, displays the count of the rest.
pub fn display_commits(commits: &[CommitEntry], previous_tag: &str, current_tag: &str) {
    println!(
        "\n{}",
        style(format!("Commits {}..{}", previous_tag, current_tag)).bold()
    );

    for line in format_commit_lines(commits) {
        println!("{}", line);
    }
}

/// Display the pretty-printed record, used for dry runs.
pub fn display_record(record_json: &str) {
    println!("\n{}", style("Build Information:").bold());
    println!("{}", record_json);
}

/// Lines listing commits, short hash first.
pub fn format_commit_lines(commits: &[CommitEntry]) -> Vec<String> {
    let mut lines: Vec<String> = commits
        .iter()
        .take(MAX_LISTED_COMMITS)
        .enumerate()
        .map(|(i, commit)| {
            let short_hash = commit.id.get(..7).unwrap_or(&commit.id);
            format!("  {}. {} {}", i + 1, short_hash, truncate(&commit.comment))
        })
        .collect();

    if commits.len() > MAX_LISTED_COMMITS {
        lines.push(format!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        ));
    }

    lines
}

/// One-line summary of what a record attaches to.
pub fn format_summary(record: &BuildInformationRecord) -> String {
    let packages: Vec<&str> = record.packages.iter().map(|p| p.id.as_str()).collect();
    let version = record
        .packages
        .first()
        .map(|p| p.version.as_str())
        .unwrap_or("?");

    format!(
        "{} commit(s) on {} for {} {} in space {}",
        record.commits.len(),
        record.branch,
        packages.join(", "),
        version,
        record.space
    )
}

fn truncate(subject: &str) -> String {
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        let kept: String = subject.chars().take(MAX_SUBJECT_CHARS).collect();
        format!("{}…", kept)
    } else {
        subject.to_string()
    }
}
