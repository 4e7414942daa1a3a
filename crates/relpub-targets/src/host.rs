//! Host detection.
//!
//! The target must describe the runtime that gets embedded in the compiled
//! executable, so platform, architecture, and version are asked of the
//! runtime itself. When the runtime cannot be launched, platform and
//! architecture fall back to what this binary was compiled for, spelled the
//! way the runtime spells them.

use std::process::Command;

use crate::error::{Result, TargetError};
use crate::target::TargetId;

/// Expression printed by the runtime to describe the host.
const HOST_EXPRESSION: &str = "process.platform + ' ' + process.arch + ' ' + process.version";

/// Raw, un-normalized description of the execution environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Runtime platform name (e.g., `darwin`, `win32`, `linux`).
    pub platform: String,
    /// Runtime CPU architecture name (e.g., `x64`, `arm64`).
    pub arch: String,
    /// Runtime version, possibly with a leading `v`.
    pub runtime_version: String,
}

/// Values supplied on the command line that win over detection.
#[derive(Debug, Clone, Default)]
pub struct HostOverrides {
    pub platform: Option<String>,
    pub arch: Option<String>,
    pub runtime_version: Option<String>,
}

impl HostOverrides {
    fn is_complete(&self) -> bool {
        self.platform.is_some() && self.arch.is_some() && self.runtime_version.is_some()
    }
}

impl HostInfo {
    /// Ask `runtime` to describe the host.
    pub fn detect(runtime: &str) -> Result<Self> {
        let output = Command::new(runtime)
            .arg("-p")
            .arg(HOST_EXPRESSION)
            .output()
            .map_err(|source| TargetError::RuntimeUnavailable {
                program: runtime.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            return Err(TargetError::UnexpectedRuntimeOutput {
                program: runtime.to_string(),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Self::parse_report(runtime, &stdout)
    }

    /// Parse the `"<platform> <arch> <version>"` line printed by the runtime.
    fn parse_report(runtime: &str, report: &str) -> Result<Self> {
        let mut fields = report.split_whitespace();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(platform), Some(arch), Some(version), None) => Ok(HostInfo {
                platform: platform.to_string(),
                arch: arch.to_string(),
                runtime_version: version.to_string(),
            }),
            _ => Err(TargetError::UnexpectedRuntimeOutput {
                program: runtime.to_string(),
                output: report.trim().to_string(),
            }),
        }
    }

    /// Resolve the host, applying overrides on top of detection.
    ///
    /// The runtime is not launched when every field is overridden. If it
    /// cannot be launched, platform and arch fall back to the compile-time
    /// host, but the runtime version must then come from the overrides.
    pub fn resolve(runtime: &str, overrides: &HostOverrides) -> Result<Self> {
        let detected = if overrides.is_complete() {
            None
        } else {
            match Self::detect(runtime) {
                Ok(host) => Some(host),
                Err(e) if overrides.runtime_version.is_some() => {
                    tracing::warn!("{e}; using compile-time platform and architecture");
                    None
                }
                Err(e) => return Err(e),
            }
        };

        let platform = overrides
            .platform
            .clone()
            .or_else(|| detected.as_ref().map(|h| h.platform.clone()))
            .unwrap_or_else(|| runtime_platform(std::env::consts::OS).to_string());
        let arch = overrides
            .arch
            .clone()
            .or_else(|| detected.as_ref().map(|h| h.arch.clone()))
            .unwrap_or_else(|| runtime_arch(std::env::consts::ARCH).to_string());
        let runtime_version = overrides
            .runtime_version
            .clone()
            .or_else(|| detected.map(|h| h.runtime_version))
            .unwrap_or_default();

        Ok(HostInfo {
            platform,
            arch,
            runtime_version,
        })
    }

    /// The build target for this host.
    pub fn target(&self) -> Result<TargetId> {
        TargetId::new(&self.platform, &self.arch, &self.runtime_version)
    }
}

/// Spell a `std::env::consts::OS` value the way the runtime does.
pub fn runtime_platform(rust_os: &str) -> &str {
    match rust_os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// Spell a `std::env::consts::ARCH` value the way the runtime does.
pub fn runtime_arch(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        "powerpc64" => "ppc64",
        other => other,
    }
}
