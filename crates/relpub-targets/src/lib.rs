//! Target identifier model and host detection for release artifact publishing.
//!
//! A build target is named by a single composite key,
//! `{platform}-{arch}-{runtime-version}`, which doubles as the local file
//! name of the compiled executable and the name of the release asset it is
//! published as.
//!
//! - **Target:** platform alias table and the `TargetId` key
//! - **Host:** detection of the execution environment's platform, CPU
//!   architecture, and runtime version

pub mod error;
pub mod host;
pub mod target;

pub use error::{Result, TargetError};
pub use host::{HostInfo, HostOverrides};
pub use target::{normalize_platform, TargetId};
