//! relpub: build a native executable of a script CLI and publish it as a
//! GitHub release asset.

mod commands;
mod logging;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use commands::publish::PublishOptions;
use commands::{HostOptions, ProjectOptions};

#[derive(Parser)]
#[command(
    name = "relpub",
    version,
    about = "Build and publish native executables as release assets",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Flags for the default `publish` command
    #[command(flatten)]
    publish: PublishArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Build this host's executable and upload it unless already published (default)
    Publish(PublishArgs),
    /// Print the target identifier for this host
    Target(HostArgs),
    /// Check runtime, compiler, configuration, and credential
    Doctor,
}

#[derive(Args, Clone, Default)]
struct HostArgs {
    /// Runtime platform name (e.g., darwin, win32, linux)
    #[arg(long)]
    platform: Option<String>,
    /// Runtime CPU architecture (e.g., x64, arm64)
    #[arg(long)]
    arch: Option<String>,
    /// Runtime version (e.g., 20.11.0)
    #[arg(long)]
    runtime_version: Option<String>,
    /// Complete target identifier (e.g., mac-x64-20.11.0); skips detection
    #[arg(long, conflicts_with_all = ["platform", "arch", "runtime_version"])]
    target: Option<String>,
}

#[derive(Args, Clone, Default)]
struct PublishArgs {
    /// Build the executable but do not upload it
    #[arg(long)]
    skip_upload: bool,
    #[command(flatten)]
    host: HostArgs,
    /// Script entry point (default: relpub.toml, package.json "bin", then bin/dummy.mjs)
    #[arg(long)]
    entry: Option<PathBuf>,
    /// Output directory (default: dist)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Repository owner holding the releases
    #[arg(long)]
    owner: Option<String>,
    /// Repository holding the releases
    #[arg(long)]
    repo: Option<String>,
}

impl From<HostArgs> for HostOptions {
    fn from(args: HostArgs) -> Self {
        HostOptions {
            platform: args.platform,
            arch: args.arch,
            runtime_version: args.runtime_version,
            target: args.target,
        }
    }
}

impl From<PublishArgs> for PublishOptions {
    fn from(args: PublishArgs) -> Self {
        PublishOptions {
            skip_upload: args.skip_upload,
            host: args.host.into(),
            project: ProjectOptions {
                entry: args.entry,
                output_dir: args.output_dir,
                owner: args.owner,
                repo: args.repo,
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        None => commands::publish::run(&cwd, &cli.publish.into()).map(|_| ()),
        Some(Commands::Publish(args)) => commands::publish::run(&cwd, &args.into()).map(|_| ()),
        Some(Commands::Target(args)) => commands::target::run(&cwd, &args.into()).map(|_| ()),
        Some(Commands::Doctor) => commands::doctor::run(&cwd),
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_skip_upload_runs_publish() {
        let cli = Cli::try_parse_from(["relpub", "--skip-upload"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.publish.skip_upload);
    }

    #[test]
    fn no_arguments_uploads() {
        let cli = Cli::try_parse_from(["relpub"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.publish.skip_upload);
    }

    #[test]
    fn publish_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "relpub",
            "publish",
            "--skip-upload",
            "--platform",
            "darwin",
            "--arch",
            "x64",
            "--runtime-version",
            "20.11.0",
            "--owner",
            "acme",
        ])
        .unwrap();
        let Some(Commands::Publish(args)) = cli.command else {
            panic!("expected publish");
        };
        let options: PublishOptions = args.into();
        assert!(options.skip_upload);
        assert_eq!(options.host.platform.as_deref(), Some("darwin"));
        assert_eq!(options.host.runtime_version.as_deref(), Some("20.11.0"));
        assert_eq!(options.project.owner.as_deref(), Some("acme"));
    }

    #[test]
    fn target_conflicts_with_host_parts() {
        assert!(Cli::try_parse_from([
            "relpub",
            "target",
            "--target",
            "mac-x64-20.11.0",
            "--arch",
            "arm64"
        ])
        .is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["relpub", "doctor", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Doctor)));
    }

    #[test]
    fn unknown_positional_is_rejected() {
        assert!(Cli::try_parse_from(["relpub", "--upload-please"]).is_err());
    }
}
