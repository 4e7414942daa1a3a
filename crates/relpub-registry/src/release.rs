//! Release and asset metadata as returned by the GitHub REST API.

use serde::{Deserialize, Serialize};

/// A published version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Numeric release id; the attachment point for uploads.
    pub id: u64,
    /// Git tag the release was cut from.
    pub tag_name: String,
    /// Attached files. Absent on some API responses.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    /// Size in bytes as stored by the host.
    #[serde(default)]
    pub size: Option<u64>,
    /// Upload state (`uploaded`, or `open` while a transfer is in flight).
    #[serde(default)]
    pub state: Option<String>,
}

impl Release {
    /// The asset named exactly `name`, if attached.
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// The release tagged exactly `tag`.
pub fn find_by_tag<'a>(releases: &'a [Release], tag: &str) -> Option<&'a Release> {
    releases.iter().find(|release| release.tag_name == tag)
}
