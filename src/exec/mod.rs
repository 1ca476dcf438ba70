//! Command execution: the runner contract and its implementations.

use std::path::{Path, PathBuf};

use crate::cmd::{Args, Env};
use crate::error::GitError;

mod assert;
#[cfg(feature = "exec")]
mod cli;
mod memory;
mod old_git;
mod result;

pub use assert::AssertRunner;
#[cfg(feature = "exec")]
pub use cli::CliRunner;
pub use memory::MemoryRunner;
pub use old_git::{GitVersion, OldGitRunner};
pub use result::RunnerResult;

/// Program name test doubles render their fixture commands with.
pub const FIXTURE_PROGRAM: &str = "git";

/// Executes one git command in a working directory.
///
/// Every call is independent: the directory and environment are passed in,
/// never stored as process-wide state.
pub trait Runner {
    fn run(&self, cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError>;
    fn cwd(&self) -> Result<PathBuf, GitError>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        (**self).run(cwd, args, env)
    }
    fn cwd(&self) -> Result<PathBuf, GitError> { (**self).cwd() }
}

impl<R: Runner + ?Sized> Runner for Box<R> {
    fn run(&self, cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        (**self).run(cwd, args, env)
    }
    fn cwd(&self) -> Result<PathBuf, GitError> { (**self).cwd() }
}
