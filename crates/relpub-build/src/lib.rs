//! Native executable compilation for release artifact publishing.
//!
//! The compiler that packages a script entry point into a standalone
//! executable is an external program. This crate describes a compile job,
//! runs the program for it, and assembles the toolchain environment some
//! hosts need before the program can build its runtime from source.

pub mod compiler;
pub mod error;
pub mod nexe;
pub mod toolchain;

pub use compiler::{CompileJob, Compiler};
pub use error::{BuildError, Result};
pub use nexe::NexeCompiler;
pub use toolchain::ToolchainEnv;
