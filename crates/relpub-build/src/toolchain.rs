//! Toolchain environment for the compiler process.
//!
//! Building the runtime from source on Intel Macs needs a Homebrew LLVM
//! instead of the Xcode toolchain. The variables are collected into a
//! `ToolchainEnv` and applied to the compiler process only.

use std::path::Path;
use std::process::Command;

use relpub_targets::TargetId;

use crate::error::{BuildError, Result};

/// Homebrew formula providing the LLVM toolchain.
const LLVM_FORMULA: &str = "llvm@18";

/// Environment variables handed to the compiler process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    vars: Vec<(String, String)>,
}

impl ToolchainEnv {
    /// An empty environment: the compiler inherits ours unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `target` needs the Homebrew LLVM toolchain.
    pub fn needs_llvm(target: &TargetId) -> bool {
        target.platform() == "mac" && target.arch() == "x64"
    }

    /// Assemble the environment for `target`, installing tools as needed.
    ///
    /// Only mac-x64 targets run anything; every other target gets an empty
    /// environment.
    pub fn detect(target: &TargetId) -> Result<Self> {
        if !Self::needs_llvm(target) {
            return Ok(Self::empty());
        }

        tracing::info!("installing {LLVM_FORMULA} for {target}");
        capture("brew", &["install", LLVM_FORMULA])?;
        let prefix = capture("brew", &["--prefix", LLVM_FORMULA])?;
        let sdk_root = capture("xcrun", &["--show-sdk-path"])?;
        tracing::debug!(llvm = %prefix, sdk = %sdk_root, "resolved toolchain");

        Ok(Self::llvm(Path::new(&prefix), &sdk_root))
    }

    /// Variables pointing every compiler, archiver, and flag at the LLVM
    /// installed under `prefix`.
    pub fn llvm(prefix: &Path, sdk_root: &str) -> Self {
        let llvm = prefix.display().to_string();
        let cc = format!("{llvm}/bin/clang");
        let cxx = format!("{llvm}/bin/clang++");

        let mut env = Self::empty();
        env.set("LLVM", &llvm);
        env.set("CC", &cc);
        env.set("CXX", &cxx);
        env.set("AR", format!("{llvm}/bin/llvm-ar"));
        env.set("NM", format!("{llvm}/bin/llvm-nm"));
        env.set("RANLIB", format!("{llvm}/bin/llvm-ranlib"));
        env.set("CPPFLAGS", format!("-I{llvm}/include/c++/v1"));
        env.set("CFLAGS", "-arch x86_64");
        env.set(
            "CXXFLAGS",
            format!("-std=c++20 -stdlib=libc++ -arch x86_64 -nostdinc++ -isystem {llvm}/include/c++/v1"),
        );
        env.set(
            "LDFLAGS",
            format!(
                "-stdlib=libc++ -arch x86_64 -L{llvm}/lib -Wl,-rpath,{llvm}/lib \
                 -Wl,-rpath,{llvm}/lib/c++ -lc++ -lc++abi"
            ),
        );
        env.set("SDKROOT", sdk_root);
        env.set("GYP_DEFINES", "clang=1 use_xcode_clang=0");
        env.set("CC_host", &cc);
        env.set("CXX_host", &cxx);
        env.set("CC_target", &cc);
        env.set("CXX_target", &cxx);
        env
    }

    /// Set a variable, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((name, value)),
        }
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Apply the variables to a command about to be spawned.
    pub fn apply(&self, command: &mut Command) {
        command.envs(self.iter());
    }
}

/// Run a helper and return its trimmed stdout.
fn capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| BuildError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(BuildError::Toolchain {
            command: format!("{program} {}", args.join(" ")),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
