//! Error types for target and host operations.

/// Errors that can occur while detecting the host or building a target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The runtime could not be launched.
    #[error("failed to run '{program}': {source}")]
    RuntimeUnavailable {
        /// The runtime program that was invoked.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The runtime ran but reported something unparseable.
    #[error("unexpected output from '{program}': {output:?}")]
    UnexpectedRuntimeOutput {
        /// The runtime program that was invoked.
        program: String,
        /// Raw output as reported.
        output: String,
    },

    /// A target component was empty or contained a separator.
    #[error("invalid target component {field}: {value:?}")]
    InvalidComponent {
        /// Which component was rejected (platform, arch, version).
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
