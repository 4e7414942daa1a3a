//! CLI command implementations and the settings they share.

pub mod doctor;
pub mod publish;
pub mod target;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relpub_build::NexeCompiler;
use relpub_registry::credential::DEFAULT_TOKEN_VAR;
use relpub_registry::GithubConfig;
use relpub_targets::{HostInfo, HostOverrides, TargetId};

use crate::manifest::PublisherConfig;

/// Entry point compiled when neither flags nor `relpub.toml` name one.
const DEFAULT_ENTRY: &str = "bin/dummy.mjs";
const DEFAULT_OUTPUT_DIR: &str = "dist";
const DEFAULT_RUNTIME: &str = "node";

/// Host values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub platform: Option<String>,
    pub arch: Option<String>,
    pub runtime_version: Option<String>,
    /// Complete target identifier; bypasses detection.
    pub target: Option<String>,
}

/// Project values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub entry: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// Effective settings: defaults, then `relpub.toml`, then flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GithubConfig,
    pub token_env: String,
    pub entry_point: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: NexeCompiler,
    pub runtime: String,
}

impl Settings {
    pub fn resolve(
        project_dir: &Path,
        config: &PublisherConfig,
        flags: &ProjectOptions,
    ) -> Self {
        let defaults = GithubConfig::default();
        let release = &config.release;
        let github = GithubConfig {
            api_url: release.api_url.clone().unwrap_or(defaults.api_url),
            upload_url: release.upload_url.clone().unwrap_or(defaults.upload_url),
            owner: flags
                .owner
                .clone()
                .or_else(|| release.owner.clone())
                .unwrap_or(defaults.owner),
            repo: flags
                .repo
                .clone()
                .or_else(|| release.repo.clone())
                .unwrap_or(defaults.repo),
        };

        let build = &config.build;
        let entry = flags
            .entry
            .clone()
            .or_else(|| build.entry.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENTRY));
        let output_dir = flags
            .output_dir
            .clone()
            .or_else(|| build.output_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let mut compiler = NexeCompiler::default();
        if let Some(command) = &build.compiler {
            compiler.command = command.clone();
        }
        if let Some(python) = &build.python {
            compiler.python = python.clone();
        }

        Settings {
            github,
            token_env: release
                .token_env
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_VAR.to_string()),
            entry_point: project_dir.join(entry),
            output_dir: project_dir.join(output_dir),
            compiler,
            runtime: build
                .runtime
                .clone()
                .unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
        }
    }
}

/// Resolve the build target from flags and the runtime.
pub fn resolve_target(options: &HostOptions, runtime: &str) -> Result<TargetId> {
    if let Some(target) = &options.target {
        return target
            .parse()
            .with_context(|| format!("invalid --target '{target}'"));
    }

    let overrides = HostOverrides {
        platform: options.platform.clone(),
        arch: options.arch.clone(),
        runtime_version: options.runtime_version.clone(),
    };
    let host = HostInfo::resolve(runtime, &overrides).context("detecting host")?;
    tracing::info!(
        platform = %host.platform,
        arch = %host.arch,
        runtime_version = %host.runtime_version,
        "host"
    );
    Ok(host.target()?)
}
