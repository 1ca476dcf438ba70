use std::path::{Path, PathBuf};

use tracing::debug;

use super::{extract_repository_name_from_url, GitRepository};
use crate::cmd::{Args, Env};
use crate::error::{GitError, Result};
use crate::exec::Runner;

/// Entry point for creating, cloning and opening repositories.
#[derive(Debug, Default)]
pub struct Git<R> {
    runner: R,
}

impl<R: Runner> Git<R> {
    pub fn new(runner: R) -> Self { Self { runner } }

    pub fn runner(&self) -> &R { &self.runner }

    pub fn open(&self, directory: impl AsRef<Path>) -> Result<GitRepository<&R>> {
        GitRepository::open(directory, &self.runner)
    }

    /// `git init <options> <directory>`, creating the directory if needed.
    /// A relative directory is taken from the runner's working directory.
    pub fn init(&self, directory: impl AsRef<Path>, options: Args) -> Result<GitRepository<&R>> {
        let directory = self.resolve(directory.as_ref())?;
        let directory = directory.as_path();
        if directory.join(".git").is_dir() {
            return Err(GitError::command_failed(format!("Repo already exists in {}.", directory.display())));
        }
        std::fs::create_dir_all(directory).map_err(|e| GitError::CommandFailed {
            message: format!("Unable to create directory '{}'.", directory.display()),
            result: None,
            source: Some(e),
        })?;

        let dir = directory.to_string_lossy();
        let args = Args::new().arg("init").extend(options).end_of_options().arg(&*dir);
        let result = self.runner.run(directory, &args, None)?;
        if !result.is_ok() {
            let message = format!("Git init failed (directory {}).", directory.display());
            return Err(GitError::CommandFailed { message, result: Some(Box::new(result)), source: None });
        }
        self.open(directory)
    }

    /// Clones `url`; without a directory the name is derived from the URL and
    /// created under the runner's working directory. Options default to `-q`.
    pub fn clone_repository(
        &self,
        url: &str,
        directory: Option<&Path>,
        options: Option<Args>,
    ) -> Result<GitRepository<&R>> {
        let cwd = self.runner.cwd()?;
        let directory: PathBuf = match directory {
            None => cwd.join(extract_repository_name_from_url(url)),
            Some(d) => self.resolve(d)?,
        };
        if directory.join(".git").is_dir() {
            return Err(GitError::command_failed(format!("Repo already exists in {}.", directory.display())));
        }

        let options = options.unwrap_or_else(|| Args::new().flag("-q"));
        let dir = directory.to_string_lossy();
        let args = Args::new().arg("clone").extend(options).end_of_options().arg(url).arg(&*dir);
        let result = self.runner.run(&cwd, &args, None)?;
        if !result.is_ok() {
            let mut message = format!("Git clone failed (directory {}).", directory.display());
            if result.has_error_output() {
                message.push('\n');
                message.push_str(result.error_output_as_string());
            }
            return Err(GitError::CommandFailed { message, result: Some(Box::new(result)), source: None });
        }
        self.open(&directory)
    }

    /// Probes a remote without ever prompting for credentials.
    pub fn is_remote_url_readable(&self, url: &str, refs: &[&str]) -> Result<bool> {
        let cwd = self.runner.cwd()?;
        let mut args = Args::new()
            .arg("ls-remote")
            .flag("--heads")
            .flag("--quiet")
            .flag("--exit-code")
            .end_of_options()
            .arg(url);
        for r in refs {
            args.push(*r);
        }
        let env = Env::new().with("GIT_TERMINAL_PROMPT", 0);
        let result = self.runner.run(&cwd, &args, Some(&env))?;
        debug!(%url, exit_code = result.exit_code(), "remote probe finished");
        Ok(result.is_ok())
    }

    fn resolve(&self, directory: &Path) -> Result<PathBuf> {
        if directory.is_absolute() {
            return Ok(directory.to_path_buf());
        }
        Ok(self.runner.cwd()?.join(directory))
    }
}
