use std::path::PathBuf;
use std::time::Duration;

use crate::cli::orchestration::PushWorkflowArgs;
use crate::config::{Config, GitBackend};
use crate::domain::TagPattern;
use crate::error::{BuildInfoError, Result};
use crate::publish::{OctopusClient, OverwriteMode};

#[derive(clap::Parser, Debug)]
#[command(
    name = "push-build-info",
    about = "Push build information for a tagged release to Octopus Deploy",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(long, help = "Release version to publish (tag without prefix, e.g. 1.2.3)")]
    pub version: String,

    #[arg(
        short,
        long = "package",
        value_delimiter = ',',
        help = "Package id to attach build information to (repeatable)"
    )]
    pub packages: Vec<String>,

    #[arg(short, long, env = "OCTOPUS_SPACE", help = "Octopus space name")]
    pub space: Option<String>,

    #[arg(long, env = "OCTOPUS_URL", help = "Octopus server URL")]
    pub server: Option<String>,

    #[arg(long, env = "OCTOPUS_API_KEY", hide_env_values = true, help = "Octopus API key")]
    pub api_key: Option<String>,

    #[arg(short, long, help = "Branch to report instead of the CI ref")]
    pub branch: Option<String>,

    #[arg(long, value_enum, help = "Behaviour when build information already exists")]
    pub overwrite_mode: Option<OverwriteMode>,

    #[arg(long, help = "Workflow run id used in the build URL")]
    pub run_id: Option<u64>,

    #[arg(long, help = "Tag naming pattern containing {version}")]
    pub tag_pattern: Option<String>,

    #[arg(long, value_enum, help = "History backend")]
    pub git_backend: Option<GitBackend>,

    #[arg(long, help = "HTTP timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(short = 'C', long, default_value = ".", help = "Repository path")]
    pub repo: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short = 'v', long, help = "Log the full build information payload")]
    pub verbose: bool,

    #[arg(long, help = "Build the record without pushing it")]
    pub dry_run: bool,
}

/// Everything an invocation needs, with CLI values layered over the file configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub workflow: PushWorkflowArgs,
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub backend: GitBackend,
    pub repo_path: PathBuf,
    pub run_id: Option<u64>,
    pub dry_run: bool,
}

impl Args {
    /// Merge with the file configuration, CLI values winning
    pub fn into_settings(self, config: &Config) -> Result<Settings> {
        let packages = if self.packages.is_empty() {
            config.push.packages.clone()
        } else {
            self.packages
        };
        let packages: Vec<String> = packages
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if packages.is_empty() {
            return Err(BuildInfoError::config("At least one package id is required"));
        }

        let space = self
            .space
            .or_else(|| config.server.space.clone())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BuildInfoError::config("Space name is required"))?;

        let tag_pattern = TagPattern::new(
            self.tag_pattern
                .unwrap_or_else(|| config.push.tag_pattern.clone()),
        )?;

        Ok(Settings {
            workflow: PushWorkflowArgs {
                version: self.version.trim().to_string(),
                packages,
                space,
                branch: self.branch,
                overwrite_mode: self.overwrite_mode.unwrap_or(config.push.overwrite_mode),
                tag_pattern,
                verbose: self.verbose,
            },
            server_url: self.server.or_else(|| config.server.url.clone()),
            api_key: self.api_key,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(config.server.timeout_secs)),
            backend: self.git_backend.unwrap_or(config.git.backend),
            repo_path: self.repo,
            run_id: self.run_id,
            dry_run: self.dry_run,
        })
    }
}

impl Settings {
    /// Build the HTTP client, requiring server URL and API key
    pub fn octopus_client(&self) -> Result<OctopusClient> {
        let server_url = self
            .server_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BuildInfoError::config("Octopus server URL is required (--server or OCTOPUS_URL)"))?;
        let api_key = self
            .api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BuildInfoError::config("Octopus API key is required (--api-key or OCTOPUS_API_KEY)"))?;

        OctopusClient::new(server_url, api_key, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["push-build-info"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_values_override_config() {
        let mut config = Config::default();
        config.server.space = Some("FromFile".to_string());
        config.push.packages = vec!["file.pkg".to_string()];

        let settings = parse(&["--version", "1.2.3", "--space", "Cli", "-p", "a,b", "-p", "c"])
            .into_settings(&config)
            .unwrap();

        assert_eq!(settings.workflow.space, "Cli");
        assert_eq!(settings.workflow.packages, vec!["a", "b", "c"]);
        assert_eq!(settings.workflow.version, "1.2.3");
    }

    #[test]
    fn test_config_fills_missing_values() {
        let mut config = Config::default();
        config.server.space = Some("Default".to_string());
        config.server.url = Some("https://octopus.example.com".to_string());
        config.push.packages = vec!["Widgets".to_string()];
        config.push.overwrite_mode = OverwriteMode::OverwriteExisting;
        config.git.backend = GitBackend::System;

        let settings = parse(&["--version", "2.0.0"]).into_settings(&config).unwrap();

        assert_eq!(settings.workflow.space, "Default");
        assert_eq!(settings.workflow.packages, vec!["Widgets"]);
        assert_eq!(settings.workflow.overwrite_mode, OverwriteMode::OverwriteExisting);
        assert_eq!(settings.backend, GitBackend::System);
        assert_eq!(settings.server_url.as_deref(), Some("https://octopus.example.com"));
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overwrite_mode_flag_accepts_api_spelling() {
        let args = parse(&["--version", "1.0.0", "--overwrite-mode", "IgnoreIfExists"]);
        assert_eq!(args.overwrite_mode, Some(OverwriteMode::IgnoreIfExists));

        let args = parse(&["--version", "1.0.0", "--overwrite-mode", "overwrite-existing"]);
        assert_eq!(args.overwrite_mode, Some(OverwriteMode::OverwriteExisting));
    }

    #[test]
    fn test_packages_required() {
        let mut config = Config::default();
        config.server.space = Some("Default".to_string());

        let err = parse(&["--version", "1.0.0"]).into_settings(&config).unwrap_err();
        assert!(err.to_string().contains("package"));
    }

    #[test]
    fn test_space_required() {
        let err = parse(&["--version", "1.0.0", "-p", "a"])
            .into_settings(&Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("Space"));
    }

    #[test]
    fn test_bad_tag_pattern_rejected() {
        let result = parse(&["--version", "1.0.0", "-p", "a", "-s", "S", "--tag-pattern", "latest"])
            .into_settings(&Config::default());
        assert!(matches!(result, Err(BuildInfoError::Config(_))));
    }

    #[test]
    fn test_client_requires_server_and_key() {
        let settings = parse(&["--version", "1.0.0", "-p", "a", "-s", "S"])
            .into_settings(&Config::default())
            .unwrap();
        let settings = Settings {
            server_url: None,
            api_key: None,
            ..settings
        };
        assert!(settings.octopus_client().is_err());
    }

    #[test]
    fn test_version_is_required() {
        assert!(Args::try_parse_from(["push-build-info", "-p", "a"]).is_err());
    }
}
