use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use push_build_info::cli::{run_push_workflow, Args};
use push_build_info::config::{self, GitBackend};
use push_build_info::context::CiContext;
use push_build_info::git::{Git2Repository, History, SystemGit};
use push_build_info::publish::BuildInformationClient;
use push_build_info::ui;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let settings = match args.into_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let mut ctx = match CiContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    if let Some(run_id) = settings.run_id {
        ctx.run_id = run_id;
    }

    init_tracing(settings.workflow.verbose || ctx.debug);

    let repo = match open_history(settings.backend, &settings.repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Error opening repository: {}", e));
            std::process::exit(1);
        }
    };

    let client = if settings.dry_run {
        None
    } else {
        match settings.octopus_client() {
            Ok(client) => Some(client),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
    };

    ui::display_status(&format!(
        "Collecting build information for version {}",
        settings.workflow.version
    ));

    let result = match run_push_workflow(
        repo.as_ref(),
        client.as_ref().map(|c| c as &dyn BuildInformationClient),
        &settings.workflow,
        &ctx,
    ) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_commits(
        &result.record.commits,
        &result.range.previous,
        &result.range.current,
    );

    if result.pushed {
        ui::display_success(&format!(
            "Pushed {}",
            ui::format_summary(&result.record)
        ));
    } else {
        match result.record.to_pretty_json() {
            Ok(json) => ui::display_record(&json),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
        ui::display_status("Dry run: build information was not pushed");
    }

    Ok(())
}

fn open_history(backend: GitBackend, path: &Path) -> push_build_info::Result<Box<dyn History>> {
    Ok(match backend {
        GitBackend::Libgit2 => Box::new(Git2Repository::open(path)?),
        GitBackend::System => Box::new(SystemGit::open(path)?),
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "push_build_info=debug"
    } else {
        "push_build_info=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
