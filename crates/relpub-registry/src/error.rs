//! Registry error types.

use std::path::PathBuf;

/// Errors that can occur while looking up releases or publishing assets.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No credential in the environment.
    #[error("no GitHub token in ${var}; did the workflow forget to pass the secret?")]
    MissingCredential { var: String },

    /// No release is tagged with the package version.
    #[error("release not found for version {version}; create the release before publishing")]
    ReleaseNotFound { version: String },

    /// The API answered with an error status.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Http {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The request never got an answer.
    #[error("{method} {url} failed: {detail}")]
    Transport {
        method: &'static str,
        url: String,
        detail: String,
    },

    /// The API answered with a body we could not decode.
    #[error("unexpected response from {url}: {detail}")]
    Decode { url: String, detail: String },

    /// The uploaded asset does not match what was sent.
    #[error("asset '{name}' was stored with {actual} bytes, sent {expected}")]
    UploadSizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// The output directory could not be created.
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compilation failed.
    #[error(transparent)]
    Build(#[from] relpub_build::BuildError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
