//! GitHub release lookup and asset publishing for compiled executables.
//!
//! Finds the release tagged with the package version, decides whether the
//! executable for a target is already attached to it, and if not builds and
//! uploads it.
//!
//! # Architecture
//!
//! - **`ReleaseHost`**: the two hosting operations the workflow depends on
//!   (list releases, upload an asset), implemented for the GitHub REST API
//!   by `GithubReleases`
//! - **`publish_artifact`**: the build-or-skip, upload-or-skip workflow
//!
//! Every failure is terminal; nothing is retried.

pub mod client;
pub mod credential;
pub mod error;
pub mod integrity;
pub mod publish;
pub mod release;

// Re-exports for convenience.
pub use client::{GithubConfig, GithubReleases, ReleaseHost};
pub use credential::Credential;
pub use error::{RegistryError, Result};
pub use integrity::ContentHash;
pub use publish::{ensure_output_dir, publish_artifact, PublishOutcome, PublishRequest};
pub use release::{Asset, Release};
