//! `relpub doctor`: environment diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use relpub_registry::Credential;

use crate::commands::{resolve_target, HostOptions, ProjectOptions, Settings};
use crate::manifest::{PackageMetadata, PublisherConfig, CONFIG_FILE};

/// Print what a publish run from `cwd` would use, and what is missing.
pub fn run(cwd: &Path) -> Result<()> {
    println!("=== relpub doctor ===");
    println!();
    println!("relpub version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Project ---");
    let project_dir = match PackageMetadata::find_and_load(cwd) {
        Ok(Some((package, dir))) => {
            println!("  package.json: found at {}", dir.display());
            println!("  Version:      {}", package.version);
            if package.semver().is_none() {
                println!("  warning: version is not semver");
            }
            dir
        }
        Ok(None) => {
            println!("  package.json: not found");
            cwd.to_path_buf()
        }
        Err(e) => {
            println!("  package.json: error: {e:#}");
            cwd.to_path_buf()
        }
    };

    let config = match PublisherConfig::load(&project_dir) {
        Ok(config) => {
            let present = project_dir.join(CONFIG_FILE).is_file();
            println!(
                "  {CONFIG_FILE}:  {}",
                if present { "found" } else { "not found (defaults)" }
            );
            config
        }
        Err(e) => {
            println!("  {CONFIG_FILE}:  error: {e:#}");
            PublisherConfig::default()
        }
    };
    let settings = Settings::resolve(&project_dir, &config, &ProjectOptions::default());
    println!("  Repository:   {}/{}", settings.github.owner, settings.github.repo);
    println!("  Entry point:  {}", settings.entry_point.display());
    println!("  Output dir:   {}", settings.output_dir.display());
    println!();

    println!("--- Tools ---");
    print_tool_status(&settings.runtime, &["--version"]);
    if let Some(program) = settings.compiler.program() {
        print_tool_status(program, &["--version"]);
    }
    print_tool_status(&settings.compiler.python, &["--version"]);
    match resolve_target(&HostOptions::default(), &settings.runtime) {
        Ok(target) => println!("  Target: {target}"),
        Err(e) => println!("  Target: unavailable ({e:#})"),
    }
    println!();

    println!("--- Credential ---");
    match Credential::from_env(&settings.token_env) {
        Ok(_) => println!("  ${}: set", settings.token_env),
        Err(_) => println!("  ${}: not set (publishing will fail)", settings.token_env),
    }

    Ok(())
}

fn print_tool_status(name: &str, args: &[&str]) {
    match Command::new(name).args(args).output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stdout
                .lines()
                .chain(stderr.lines())
                .next()
                .unwrap_or("(unknown version)");
            println!("  {name}: {first_line}");
        }
        Err(_) => {
            println!("  {name}: not found");
        }
    }
}
