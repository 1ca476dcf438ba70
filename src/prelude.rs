//! gitcmd::prelude - grab-and-go imports for building and running git commands

pub use crate::cmd::{Arg, Args, CommitId, Env, OptValue, END_OF_OPTIONS};
pub use crate::error::{GitError, Result};
#[cfg(feature = "exec")]
pub use crate::exec::CliRunner;
pub use crate::exec::{AssertRunner, GitVersion, MemoryRunner, OldGitRunner, Runner, RunnerResult};
pub use crate::git_args;
pub use crate::render::{CommandProcessor, Mode};
pub use crate::repo::{Commit, Git, GitConfig, GitRepository};
