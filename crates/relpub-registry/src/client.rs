//! Release host trait and GitHub REST implementation.
//!
//! The `ReleaseHost` trait abstracts over the two hosting operations the
//! publish workflow needs. `GithubReleases` implements them with blocking
//! `ureq` calls against `api.github.com` and `uploads.github.com`.

use crate::credential::Credential;
use crate::error::{RegistryError, Result};
use crate::release::{self, Asset, Release};

/// Releases requested per page when listing.
pub const PER_PAGE: usize = 100;

/// Content type of uploaded executables.
pub const BINARY_CONTENT_TYPE: &str = "application/x-binary";

/// Abstract release host.
pub trait ReleaseHost {
    /// Fetch one page (1-based) of releases, newest first.
    fn list_releases(&self, page: u32) -> Result<Vec<Release>>;

    /// Attach `data` to `release` as an asset called `name`.
    fn upload_asset(&self, release: &Release, name: &str, data: &[u8]) -> Result<Asset>;

    /// Find the release tagged exactly `tag`.
    ///
    /// Pages through the collection until the tag shows up or a short page
    /// marks the end.
    fn find_release(&self, tag: &str) -> Result<Option<Release>> {
        let mut page = 1;
        loop {
            let releases = self.list_releases(page)?;
            if let Some(found) = release::find_by_tag(&releases, tag) {
                return Ok(Some(found.clone()));
            }
            if releases.len() < PER_PAGE {
                return Ok(None);
            }
            page += 1;
        }
    }
}

/// Where the releases live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// REST API base URL.
    pub api_url: String,
    /// Upload API base URL.
    pub upload_url: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: "https://api.github.com".to_string(),
            upload_url: "https://uploads.github.com".to_string(),
            owner: "SmartThingsCommunity".to_string(),
            repo: "cli-nexe-builds".to_string(),
        }
    }
}

impl GithubConfig {
    /// `GET` endpoint of the releases collection.
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    /// `POST` endpoint for assets of release `release_id`.
    pub fn assets_url(&self, release_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.upload_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            release_id
        )
    }
}

/// GitHub releases of one repository.
pub struct GithubReleases {
    config: GithubConfig,
    credential: Credential,
    agent: ureq::Agent,
}

impl GithubReleases {
    pub fn new(config: GithubConfig, credential: Credential) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("relpub/", env!("CARGO_PKG_VERSION")))
            .build();
        GithubReleases {
            config,
            credential,
            agent,
        }
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Authorization", &self.credential.authorization())
            .set("Accept", "application/vnd.github+json")
    }
}

impl ReleaseHost for GithubReleases {
    fn list_releases(&self, page: u32) -> Result<Vec<Release>> {
        let url = self.config.releases_url();
        tracing::debug!(%url, page, "listing releases");

        let request = self
            .authorize(self.agent.get(&url))
            .query("per_page", &PER_PAGE.to_string())
            .query("page", &page.to_string());
        let response = check_response("GET", &url, request.call())?;
        decode(&url, response)
    }

    fn upload_asset(&self, release: &Release, name: &str, data: &[u8]) -> Result<Asset> {
        let url = self.config.assets_url(release.id);
        tracing::debug!(%url, name, bytes = data.len(), "uploading asset");

        let request = self
            .authorize(self.agent.post(&url))
            .query("name", name)
            .set("Content-Type", BINARY_CONTENT_TYPE)
            .set("Content-Length", &data.len().to_string());
        let response = check_response("POST", &url, request.send_bytes(data))?;
        decode(&url, response)
    }
}

/// Keep successful responses; turn error statuses and transport failures
/// into registry errors carrying the status and body.
fn check_response(
    method: &'static str,
    url: &str,
    result: std::result::Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => Err(RegistryError::Http {
            method,
            url: url.to_string(),
            status,
            body: response.into_string().unwrap_or_default(),
        }),
        // The transport's own Display repeats the URL; keep kind and message only.
        Err(ureq::Error::Transport(transport)) => Err(RegistryError::Transport {
            method,
            url: url.to_string(),
            detail: match transport.message() {
                Some(message) => format!("{}: {message}", transport.kind()),
                None => transport.kind().to_string(),
            },
        }),
    }
}

fn decode<T: serde::de::DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T> {
    response.into_json().map_err(|e| RegistryError::Decode {
        url: url.to_string(),
        detail: e.to_string(),
    })
}
