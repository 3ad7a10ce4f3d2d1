//! System git backend
//!
//! Shells out to the `git` binary. Commit records are requested in a
//! control-character framed format so subjects containing quotes, commas or
//! braces never corrupt parsing:
//!
//! - records end with NUL (`-z`)
//! - fields are separated by the ASCII unit separator (0x1f)
//! - the subject is the last field, so a stray separator inside it stays put

use crate::domain::Commit;
use crate::error::{BuildInfoError, Result};
use crate::git::{validate_revision, CommitRangeQuery, TagLister};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\0';
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%aI%x1f%s";

/// Git backend using the system `git` executable
pub struct SystemGit {
    repo_path: PathBuf,
}

impl SystemGit {
    /// Open a git repository, verifying it with `git rev-parse`
    pub fn open(path: &Path) -> Result<Self> {
        let git = SystemGit {
            repo_path: path.to_path_buf(),
        };

        let output = git.run(&["rev-parse", "--git-dir"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildInfoError::history(format!(
                "Not a git repository '{}': {}",
                path.display(),
                stderr.trim()
            )));
        }

        Ok(git)
    }

    /// Create a git command with isolated environment
    ///
    /// Only PATH and HOME are passed through.
    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo_path);

        cmd.env_clear();
        if let Ok(path) = std::env::var("PATH") {
            cmd.env("PATH", path);
        }
        if let Ok(home) = std::env::var("HOME") {
            cmd.env("HOME", home);
        }

        cmd.arg("-c").arg("core.quotePath=false");
        cmd.arg("-c").arg("log.showSignature=false");
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        self.git_cmd().args(args).output().map_err(|e| {
            BuildInfoError::history(format!("Failed to execute git {}: {}", args.join(" "), e))
        })
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildInfoError::history(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            BuildInfoError::history(format!("git {} produced invalid UTF-8: {}", args.join(" "), e))
        })
    }
}

impl TagLister for SystemGit {
    fn list_tags_by_version_desc(&self) -> Result<Vec<String>> {
        let stdout = self.run_checked(&["tag", "--list", "--sort=-v:refname"])?;

        Ok(stdout
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}

impl CommitRangeQuery for SystemGit {
    fn commits_between(&self, older: &str, newer: &str) -> Result<Vec<Commit>> {
        validate_revision(older)?;
        validate_revision(newer)?;

        let range = format!("{}..{}", older, newer);
        let stdout = self.run_checked(&["log", "--no-color", "-z", LOG_FORMAT, &range])?;

        parse_log_records(&stdout)
    }
}

/// Parse `git log -z` output produced with [LOG_FORMAT].
pub fn parse_log_records(raw: &str) -> Result<Vec<Commit>> {
    raw.split(RECORD_SEPARATOR)
        .filter(|record| !record.is_empty())
        .map(parse_log_record)
        .collect()
}

fn parse_log_record(record: &str) -> Result<Commit> {
    // `git log -z` may leave the newline that separated records in text mode
    let record = record.strip_prefix('\n').unwrap_or(record);

    let mut fields = record.splitn(4, FIELD_SEPARATOR);
    let mut next = |name: &str| {
        fields.next().ok_or_else(|| {
            BuildInfoError::history(format!("Malformed log record (missing {}): {:?}", name, record))
        })
    };

    let hash = next("hash")?;
    let author = next("author")?;
    let date = next("date")?;
    let message = next("message")?;

    if hash.is_empty() {
        return Err(BuildInfoError::history(format!(
            "Malformed log record (empty hash): {:?}",
            record
        )));
    }

    Ok(Commit::new(hash, author, date, message))
}
