//! Compiler abstraction.
//!
//! The `Compiler` trait is the seam between the publish workflow and the
//! external program that turns a script entry point into an executable.

use std::path::{Path, PathBuf};

use relpub_targets::TargetId;

use crate::error::Result;
use crate::toolchain::ToolchainEnv;

/// One compilation: an entry point built for one target.
#[derive(Debug, Clone)]
pub struct CompileJob {
    /// Script entry point to package.
    pub entry_point: PathBuf,
    /// Target to build for; also names the output file.
    pub target: TargetId,
    /// Directory the executable is written to.
    pub output_dir: PathBuf,
    /// Extra environment for the compiler process.
    pub toolchain: ToolchainEnv,
}

impl CompileJob {
    pub fn new(entry_point: impl Into<PathBuf>, target: TargetId, output_dir: impl Into<PathBuf>) -> Self {
        CompileJob {
            entry_point: entry_point.into(),
            target,
            output_dir: output_dir.into(),
            toolchain: ToolchainEnv::empty(),
        }
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainEnv) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Output path handed to the compiler, without any executable suffix.
    pub fn output_stem(&self) -> PathBuf {
        self.output_dir.join(self.target.to_string())
    }

    /// Path of the executable the compiler is expected to produce.
    pub fn executable_path(&self) -> PathBuf {
        self.output_dir.join(self.target.executable_file_name())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// An external compiler capable of building a `CompileJob`.
pub trait Compiler {
    /// Build the job and return the path of the produced executable.
    fn compile(&self, job: &CompileJob) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_follow_target() {
        let job = CompileJob::new("bin/cli.mjs", "linux-x64-20.11.0".parse().unwrap(), "dist");
        assert_eq!(job.output_stem(), Path::new("dist/linux-x64-20.11.0"));
        assert_eq!(job.executable_path(), Path::new("dist/linux-x64-20.11.0"));
        assert!(job.toolchain.is_empty());
    }

    #[test]
    fn windows_executable_has_suffix() {
        let job = CompileJob::new("bin/cli.mjs", "windows-x64-20.11.0".parse().unwrap(), "dist");
        assert_eq!(job.output_stem(), Path::new("dist/windows-x64-20.11.0"));
        assert_eq!(
            job.executable_path(),
            Path::new("dist/windows-x64-20.11.0.exe")
        );
    }
}
