//! Main workflow orchestration logic
//!
//! Runs the four pipeline stages in order, stopping at the first error:
//! tag resolution, commit collection, record assembly and publishing.

use crate::context::CiContext;
use crate::domain::{Commit, TagPattern, TagRange};
use crate::error::Result;
use crate::git::History;
use crate::history::{collect_commits, resolve_tag_range};
use crate::payload::{build_record, BuildInformationRecord, BuildInputs};
use crate::publish::{publish, BuildInformationClient, OverwriteMode};

/// Arguments for the push workflow
///
/// Mirrors the CLI Args after merging with the file configuration, so the
/// workflow can be called programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PushWorkflowArgs {
    /// Release version, without the tag prefix
    pub version: String,

    /// Package ids the build information is attached to
    pub packages: Vec<String>,

    /// Deployment service space name
    pub space: String,

    /// Branch to report instead of the CI ref
    pub branch: Option<String>,

    pub overwrite_mode: OverwriteMode,

    pub tag_pattern: TagPattern,

    /// Log the full payload before pushing
    pub verbose: bool,
}

/// Result of a successful push workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Tags bounding the release
    pub range: TagRange,

    /// The record that was built
    pub record: BuildInformationRecord,

    /// Whether the record was submitted
    pub pushed: bool,
}

/// Main push workflow
///
/// # Arguments
///
/// * `repo` - History backend for tags and commits
/// * `client` - Build information client; `None` builds the record without pushing
/// * `args` - Workflow arguments
/// * `ctx` - CI run context
///
/// # Returns
///
/// The resolved tags and the record, or the first stage error
pub fn run_push_workflow(
    repo: &dyn History,
    client: Option<&dyn BuildInformationClient>,
    args: &PushWorkflowArgs,
    ctx: &CiContext,
) -> Result<WorkflowResult> {
    let (range, commits) = resolve_and_collect(repo, args).map_err(|e| {
        tracing::error!(error = %e, "Failed to retrieve commits for version {}", args.version);
        e
    })?;

    tracing::info!(
        "Found {} commits between {} and {}",
        commits.len(),
        range.previous,
        range.current
    );

    let inputs = BuildInputs {
        space: args.space.clone(),
        packages: args.packages.clone(),
        version: args.version.clone(),
        branch: args.branch.clone(),
    };
    let record = build_record(&inputs, ctx, &commits);

    if args.verbose || ctx.debug {
        tracing::info!("Build Information:\n{}", record.to_pretty_json()?);
    }

    let pushed = match client {
        Some(client) => {
            publish(client, &record, args.overwrite_mode, &args.version)?;
            true
        }
        None => false,
    };

    Ok(WorkflowResult {
        range,
        record,
        pushed,
    })
}

fn resolve_and_collect(
    repo: &dyn History,
    args: &PushWorkflowArgs,
) -> Result<(TagRange, Vec<Commit>)> {
    let range = resolve_tag_range(repo, &args.tag_pattern, &args.version)?;
    let commits = collect_commits(repo, &range)?;
    Ok((range, commits))
}
