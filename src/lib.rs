//! gitcmd: escaped command construction and pluggable runners for the git CLI.

pub mod error;
pub mod cmd;
pub mod render;
pub mod exec;
pub mod repo;
pub mod prelude;
pub mod macros;

pub use error::{GitError, Result};
