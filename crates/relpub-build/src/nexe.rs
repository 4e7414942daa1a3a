//! `nexe` compiler backend.
//!
//! Runs the `nexe` CLI as a child process with inherited stdio, so its build
//! log streams straight to the console.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::compiler::{CompileJob, Compiler};
use crate::error::{BuildError, Result};

/// Compiler backend driving the `nexe` command-line tool.
#[derive(Debug, Clone)]
pub struct NexeCompiler {
    /// Program and leading arguments, e.g. `["npx", "nexe"]`.
    pub command: Vec<String>,
    /// Python interpreter used by the runtime's build scripts.
    pub python: String,
    /// Pass `--verbose` through.
    pub verbose: bool,
}

impl Default for NexeCompiler {
    fn default() -> Self {
        NexeCompiler {
            command: vec!["npx".to_string(), "nexe".to_string()],
            python: "python3".to_string(),
            verbose: true,
        }
    }
}

impl NexeCompiler {
    pub fn new(command: Vec<String>, python: impl Into<String>) -> Self {
        NexeCompiler {
            command,
            python: python.into(),
            ..Default::default()
        }
    }

    /// The program that will be launched.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Arguments for `job`, after the configured command prefix.
    pub fn job_args(&self, job: &CompileJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--input".into(),
            job.entry_point.clone().into(),
            "--build".into(),
        ];
        if self.verbose {
            args.push("--verbose".into());
        }
        args.push("--no-mangle".into());
        args.push("--python".into());
        args.push(self.python.clone().into());
        args.push("--target".into());
        args.push(job.target.to_string().into());
        args.push("--output".into());
        args.push(job.output_stem().into());
        args
    }
}

impl Compiler for NexeCompiler {
    fn compile(&self, job: &CompileJob) -> Result<PathBuf> {
        let (program, prefix) = self.command.split_first().ok_or(BuildError::EmptyCommand)?;

        let mut command = Command::new(program);
        command.args(prefix).args(self.job_args(job));
        job.toolchain.apply(&mut command);

        tracing::info!(
            target_id = %job.target,
            entry = %job.entry_point.display(),
            toolchain_vars = job.toolchain.len(),
            "running {}",
            self.command.join(" ")
        );

        let status = command.status().map_err(|source| BuildError::Spawn {
            program: program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(BuildError::Failed {
                program: program.clone(),
                target: job.target.to_string(),
                status,
            });
        }

        let path = job.executable_path();
        if !path.is_file() {
            return Err(BuildError::MissingOutput { path });
        }
        Ok(path)
    }
}
