//! Target identifiers.
//!
//! A `TargetId` names one build of the tool for one platform, CPU
//! architecture, and runtime version. Its string form must match the asset
//! naming convention of the release repository exactly, since it is used
//! both to name the compiled file and to look up existing assets.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TargetError};

/// Platform aliases. Runtime platform names on the left, published names on the right.
const PLATFORM_ALIASES: &[(&str, &str)] = &[("darwin", "mac"), ("win32", "windows")];

/// Normalized platform whose executables carry the `.exe` suffix.
const WINDOWS: &str = "windows";

/// Map a runtime platform name to its published name.
///
/// Values outside the alias table pass through unchanged.
pub fn normalize_platform(platform: &str) -> &str {
    PLATFORM_ALIASES
        .iter()
        .find(|(raw, _)| *raw == platform)
        .map(|(_, alias)| *alias)
        .unwrap_or(platform)
}

/// A `{platform}-{arch}-{runtime-version}` build target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId {
    platform: String,
    arch: String,
    version: String,
}

impl TargetId {
    /// Build a target from raw host values.
    ///
    /// The platform is normalized through the alias table and a leading `v`
    /// is stripped from the runtime version (`v20.11.0` becomes `20.11.0`).
    pub fn new(platform: &str, arch: &str, runtime_version: &str) -> Result<Self> {
        let platform = normalize_platform(platform.trim());
        let arch = arch.trim();
        let version = runtime_version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);

        check_component("platform", platform, false)?;
        check_component("arch", arch, false)?;
        check_component("version", version, true)?;

        Ok(TargetId {
            platform: platform.to_string(),
            arch: arch.to_string(),
            version: version.to_string(),
        })
    }

    /// Normalized platform name (e.g., `mac`, `windows`, `linux`).
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// CPU architecture (e.g., `x64`, `arm64`).
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Runtime version without a leading `v`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether executables for this target carry a `.exe` suffix.
    pub fn is_windows(&self) -> bool {
        self.platform == WINDOWS
    }

    /// File name of the compiled executable for this target.
    pub fn executable_file_name(&self) -> String {
        if self.is_windows() {
            format!("{self}.exe")
        } else {
            self.to_string()
        }
    }
}

fn check_component(field: &'static str, value: &str, allow_dash: bool) -> Result<()> {
    let bad_char = |c: char| c.is_whitespace() || c == '/' || c == '\\' || (!allow_dash && c == '-');
    if value.is_empty() || value.contains(bad_char) {
        return Err(TargetError::InvalidComponent {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.platform, self.arch, self.version)
    }
}

impl FromStr for TargetId {
    type Err = TargetError;

    /// Parse a published identifier such as `mac-x64-20.11.0`.
    ///
    /// Platform and arch may not contain `-`, so the version keeps any
    /// dashes after the second one (`linux-x64-22.0.0-rc.1`). Nothing is
    /// normalized: a runtime platform name (`darwin`) or a `v`-prefixed
    /// version is rejected rather than rewritten.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TargetError::InvalidComponent {
            field: "target",
            value: s.to_string(),
        };
        let mut parts = s.splitn(3, '-');
        let (Some(platform), Some(arch), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        check_component("platform", platform, false)?;
        check_component("arch", arch, false)?;
        check_component("version", version, true)?;
        if normalize_platform(platform) != platform || version.starts_with('v') {
            return Err(invalid());
        }

        Ok(TargetId {
            platform: platform.to_string(),
            arch: arch.to_string(),
            version: version.to_string(),
        })
    }
}
