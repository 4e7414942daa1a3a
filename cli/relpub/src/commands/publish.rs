//! `relpub publish`: build the host's executable and attach it to the release.

use std::path::Path;

use anyhow::{bail, Result};
use relpub_registry::{
    ensure_output_dir, publish_artifact, Credential, GithubReleases, PublishOutcome, PublishRequest,
};

use crate::commands::{resolve_target, HostOptions, ProjectOptions, Settings};
use crate::manifest::{PackageMetadata, PublisherConfig};

/// Flags of `relpub publish`.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Build but do not upload.
    pub skip_upload: bool,
    pub host: HostOptions,
    pub project: ProjectOptions,
}

/// Run the publish workflow from `cwd`.
pub fn run(cwd: &Path, options: &PublishOptions) -> Result<PublishOutcome> {
    let Some((package, project_dir)) = PackageMetadata::find_and_load(cwd)? else {
        bail!("no package.json found in {} or any parent", cwd.display());
    };
    let config = PublisherConfig::load(&project_dir)?;
    let settings = Settings::resolve(&project_dir, &config, &options.project);

    if package.semver().is_none() {
        tracing::warn!(
            version = %package.version,
            "package version is not semver; matching release tags verbatim"
        );
    }

    let target = resolve_target(&options.host, &settings.runtime)?;
    tracing::info!("building {} for {target}", package.version);

    ensure_output_dir(&settings.output_dir)?;

    // No credential, no network.
    let credential = Credential::from_env(&settings.token_env)?;

    let host = GithubReleases::new(settings.github.clone(), credential);
    let request = PublishRequest {
        version: package.version.clone(),
        target,
        entry_point: settings.entry_point.clone(),
        output_dir: settings.output_dir.clone(),
        skip_upload: options.skip_upload,
    };
    let outcome = publish_artifact(&request, &host, &settings.compiler)?;

    match &outcome {
        PublishOutcome::AlreadyPublished { asset } => {
            println!("{} already published; nothing to do.", asset.name);
        }
        PublishOutcome::Built { path } => {
            println!("Built {} (upload skipped).", path.display());
        }
        PublishOutcome::Uploaded { asset, hash, .. } => {
            println!(
                "Published {} to {}/{}@{} ({hash})",
                asset.name, settings.github.owner, settings.github.repo, package.version
            );
        }
    }
    Ok(outcome)
}
