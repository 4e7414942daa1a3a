//! Build error types.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur while compiling a target.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The compiler or a toolchain helper could not be launched.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran and reported failure.
    #[error("'{program}' failed with {status} while building {target}")]
    Failed {
        program: String,
        target: String,
        status: ExitStatus,
    },

    /// The compiler exited successfully but left no executable behind.
    #[error("compiler reported success but {} does not exist", path.display())]
    MissingOutput { path: PathBuf },

    /// A toolchain helper command failed.
    #[error("toolchain setup failed: `{command}` exited with {status}: {stderr}")]
    Toolchain {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// No compiler program configured.
    #[error("compiler command is empty")]
    EmptyCommand,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
