//! `relpub target`: print the target identifier for this host.

use std::path::Path;

use anyhow::Result;
use relpub_build::ToolchainEnv;
use relpub_targets::TargetId;

use crate::commands::{resolve_target, HostOptions, ProjectOptions, Settings};
use crate::manifest::{PackageMetadata, PublisherConfig};

/// Resolve and print the target, its executable name, and where it would be written.
pub fn run(cwd: &Path, options: &HostOptions) -> Result<TargetId> {
    let project_dir = match PackageMetadata::find_and_load(cwd)? {
        Some((_, dir)) => dir,
        None => cwd.to_path_buf(),
    };
    let config = PublisherConfig::load(&project_dir)?;
    let settings = Settings::resolve(&project_dir, &config, &ProjectOptions::default());

    let target = resolve_target(options, &settings.runtime)?;
    println!("{target}");
    println!("  Platform:   {}", target.platform());
    println!("  Arch:       {}", target.arch());
    println!("  Runtime:    {}", target.version());
    println!(
        "  Executable: {}",
        settings.output_dir.join(target.executable_file_name()).display()
    );
    if ToolchainEnv::needs_llvm(&target) {
        println!("  Toolchain:  Homebrew llvm@18 (installed on first build)");
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_overridden_target() {
        let dir = tempfile::tempdir().unwrap();
        let options = HostOptions {
            platform: Some("win32".into()),
            arch: Some("arm64".into()),
            runtime_version: Some("v22.1.0".into()),
            target: None,
        };
        let target = run(dir.path(), &options).unwrap();
        assert_eq!(target.to_string(), "windows-arm64-22.1.0");
        assert_eq!(target.executable_file_name(), "windows-arm64-22.1.0.exe");
    }
}
