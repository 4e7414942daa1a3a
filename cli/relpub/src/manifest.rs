//! `package.json` metadata and `relpub.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Package metadata file whose `version` names the release.
pub const PACKAGE_FILE: &str = "package.json";

/// Optional publisher configuration, next to the package file.
pub const CONFIG_FILE: &str = "relpub.toml";

/// The subset of `package.json` the publisher reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,
    pub version: String,
}

impl PackageMetadata {
    /// Search upward from `start_dir` for a `package.json`, parse it, and
    /// return it with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(PACKAGE_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let package = Self::from_json(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((package, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse package metadata from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let package: PackageMetadata = serde_json::from_str(s)?;
        if package.version.trim().is_empty() {
            bail!("\"version\" is empty");
        }
        Ok(package)
    }

    /// The version as semver, if it is one.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

/// Top-level `relpub.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PublisherConfig {
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[release]`: where assets are published.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseConfig {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub upload_url: Option<String>,
    /// Environment variable holding the token.
    #[serde(default)]
    pub token_env: Option<String>,
}

/// `[build]`: how executables are compiled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Script entry point, relative to the project directory.
    #[serde(default)]
    pub entry: Option<String>,
    /// Output directory, relative to the project directory.
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Compiler program and leading arguments.
    #[serde(default)]
    pub compiler: Option<Vec<String>>,
    /// Python interpreter for the runtime build.
    #[serde(default)]
    pub python: Option<String>,
    /// Runtime asked for platform, arch, and version.
    #[serde(default)]
    pub runtime: Option<String>,
}

impl PublisherConfig {
    /// Load `relpub.toml` from `project_dir`, or defaults when absent.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
