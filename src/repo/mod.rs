//! Repository operations built on a [`Runner`].
//!
//! Each method assembles an argument list, runs it in the repository
//! directory and turns a nonzero exit into [`GitError::CommandFailed`]
//! carrying the captured [`RunnerResult`].

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::cmd::{Args, CommitId};
use crate::error::{GitError, Result};
use crate::exec::{Runner, RunnerResult};

mod commit;
mod git;
mod helpers;

use commit::{parse_date, LOG_FORMAT};

pub use commit::Commit;
pub use git::Git;
pub use helpers::{extract_repository_name_from_url, is_absolute};

#[derive(Debug)]
pub struct GitRepository<R> {
    path: PathBuf,
    runner: R,
}

impl<R: Runner> GitRepository<R> {
    /// Opens an existing work tree; a trailing `.git` component is dropped.
    pub fn open(path: impl AsRef<Path>, runner: R) -> Result<Self> {
        let mut repository = path.as_ref();
        if repository.file_name() == Some(OsStr::new(".git")) {
            repository = repository.parent().unwrap_or(repository);
        }
        let path = std::fs::canonicalize(repository).map_err(|e| GitError::CommandFailed {
            message: format!("Repository '{}' not found.", repository.display()),
            result: None,
            source: Some(e),
        })?;
        Ok(Self { path, runner })
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn runner(&self) -> &R { &self.runner }

    // Tags

    /// `git tag <options> <name>`
    pub fn create_tag(&self, name: &str, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("tag").extend(options).end_of_options().arg(name))?;
        Ok(self)
    }

    /// `git tag -d <name>`
    pub fn remove_tag(&self, name: &str) -> Result<&Self> {
        self.run(Args::new().arg("tag").opt("-d", name))?;
        Ok(self)
    }

    /// Points `new` at `old`, then deletes `old`.
    pub fn rename_tag(&self, old: &str, new: &str) -> Result<&Self> {
        self.run(Args::new().arg("tag").end_of_options().arg(new).arg(old))?;
        self.remove_tag(old)
    }

    pub fn tags(&self) -> Result<Option<Vec<String>>> {
        self.extract(Args::new().arg("tag"), |line| Some(line.trim().to_string()))
    }

    // Branches

    /// `git merge <options> <branch>`
    pub fn merge(&self, branch: &str, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("merge").extend(options).end_of_options().arg(branch))?;
        Ok(self)
    }

    pub fn create_branch(&self, name: &str, checkout: bool) -> Result<&Self> {
        self.run(Args::new().arg("branch").end_of_options().arg(name))?;
        if checkout {
            self.checkout(name)?;
        }
        Ok(self)
    }

    /// `git branch -d <name>`
    pub fn remove_branch(&self, name: &str) -> Result<&Self> {
        self.run(Args::new().arg("branch").opt("-d", name))?;
        Ok(self)
    }

    /// Git failures are reported with their result attached; runner errors
    /// pass through unchanged.
    pub fn current_branch_name(&self) -> Result<String> {
        const FAILED: &str = "Getting current branch name failed.";
        let starred = self.extract(Args::new().arg("branch").flag("-a"), |line| {
            line.strip_prefix('*').map(|rest| rest.trim().to_string())
        });
        match starred {
            Ok(names) => names
                .and_then(|n| n.into_iter().next())
                .ok_or_else(|| GitError::command_failed(FAILED)),
            Err(GitError::CommandFailed { result, source, .. }) => {
                Err(GitError::CommandFailed { message: FAILED.into(), result, source })
            }
            Err(e) => Err(e),
        }
    }

    /// Local and remote branches.
    pub fn branches(&self) -> Result<Option<Vec<String>>> {
        self.extract(Args::new().arg("branch").flag("-a"), strip_branch_marker)
    }

    pub fn remote_branches(&self) -> Result<Option<Vec<String>>> {
        self.extract(Args::new().arg("branch").flag("-r"), strip_branch_marker)
    }

    pub fn local_branches(&self) -> Result<Option<Vec<String>>> {
        self.extract(Args::new().arg("branch"), strip_branch_marker)
    }

    pub fn checkout(&self, name: &str) -> Result<&Self> {
        self.run(Args::new().arg("checkout").arg(name))?;
        Ok(self)
    }

    // Files

    /// `git rm <file> -r` for each file.
    pub fn remove_file(&self, files: &[&str]) -> Result<&Self> {
        for file in files {
            self.run(Args::new().arg("rm").arg(*file).flag("-r"))?;
        }
        Ok(self)
    }

    /// Every path must exist, either absolute or relative to the repository.
    pub fn add_file(&self, files: &[&str]) -> Result<&Self> {
        for file in files {
            let path = if is_absolute(file) { PathBuf::from(file) } else { self.path.join(file) };
            if !path.exists() {
                return Err(GitError::command_failed(format!(
                    "The path at '{}' does not represent a valid file.",
                    file
                )));
            }
            self.run(Args::new().arg("add").end_of_options().arg(*file))?;
        }
        Ok(self)
    }

    pub fn add_all_changes(&self) -> Result<&Self> {
        self.run(Args::new().arg("add").flag("--all"))?;
        Ok(self)
    }

    /// `git mv <from> <to>`
    pub fn rename_file(&self, from: &str, to: &str) -> Result<&Self> {
        self.run(Args::new().arg("mv").arg(from).arg(to))?;
        Ok(self)
    }

    /// `git commit <options> -m <message>`
    pub fn commit(&self, message: &str, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("commit").extend(options).opt("-m", message))?;
        Ok(self)
    }

    pub fn last_commit_id(&self) -> Result<CommitId> {
        let result = self.run(Args::new().arg("log").flag("--pretty=format:%H").opt("-n", 1))?;
        let line = result
            .output_last_line()
            .ok_or_else(|| GitError::command_failed("Getting last commit ID failed."))?;
        CommitId::new(line.trim())
    }

    /// Metadata of `id` in one `git log` call.
    pub fn read_commit(&self, id: &CommitId) -> Result<Commit> {
        let result = self.run(Args::new().arg("log").flag("-1").flag(LOG_FORMAT).arg(id))?;
        Commit::parse(id.clone(), &result.output())
    }

    pub fn last_commit(&self) -> Result<Commit> {
        let id = self.last_commit_id()?;
        self.read_commit(&id)
    }

    /// Full message of `id`, or just its subject line when `oneline` is set.
    pub fn commit_message(&self, id: &CommitId, oneline: bool) -> Result<String> {
        let format = if oneline { "--format=%s" } else { "--format=%B" };
        let result = self.run(Args::new().arg("log").flag("-1").flag(format).arg(id))?;
        Ok(result.output().join("\n"))
    }

    /// Committer date of `id`, HEAD when `None`. Unparsable output yields `None`.
    pub fn commit_date(&self, id: Option<&CommitId>) -> Result<Option<DateTime<FixedOffset>>> {
        let args = Args::new()
            .arg("log")
            .flag("-1")
            .arg(id)
            .flag("--pretty=format:%cd")
            .flag("--date=iso-strict");
        let result = self.run(args)?;
        Ok(result.output_last_line().and_then(|line| parse_date(&line).ok()))
    }

    /// Author email of `id`, HEAD when `None`.
    pub fn commit_author(&self, id: Option<&CommitId>) -> Result<Option<String>> {
        let result = self.run(Args::new().arg("log").flag("-1").arg(id).flag("--format=%ae"))?;
        Ok(result.output_last_line())
    }

    /// Refreshes the index first so touched-but-unchanged files don't count.
    pub fn has_changes(&self) -> Result<bool> {
        self.run(Args::new().arg("update-index").flag("-q").flag("--refresh"))?;
        let result = self.run(Args::new().arg("status").flag("--porcelain"))?;
        Ok(result.has_output())
    }

    // Remotes

    pub fn pull(&self, remote: Option<&str>, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("pull").arg(remote).extend(options))?;
        Ok(self)
    }

    pub fn push(&self, remote: Option<&str>, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("push").arg(remote).extend(options))?;
        Ok(self)
    }

    pub fn fetch(&self, remote: Option<&str>, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("fetch").arg(remote).extend(options))?;
        Ok(self)
    }

    pub fn add_remote(&self, name: &str, url: &str, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("remote").arg("add").extend(options).arg(name).arg(url))?;
        Ok(self)
    }

    pub fn rename_remote(&self, old: &str, new: &str) -> Result<&Self> {
        self.run(Args::new().arg("remote").arg("rename").arg(old).arg(new))?;
        Ok(self)
    }

    pub fn remove_remote(&self, name: &str) -> Result<&Self> {
        self.run(Args::new().arg("remote").arg("remove").arg(name))?;
        Ok(self)
    }

    pub fn set_remote_url(&self, name: &str, url: &str, options: Args) -> Result<&Self> {
        self.run(Args::new().arg("remote").arg("set-url").extend(options).arg(name).arg(url))?;
        Ok(self)
    }

    /// Runs arbitrary git arguments in the repository.
    pub fn execute(&self, args: Args) -> Result<RunnerResult> {
        self.run(args)
    }

    pub fn config(&self) -> GitConfig<'_, R> {
        GitConfig { repository: self }
    }

    fn run(&self, args: Args) -> Result<RunnerResult> {
        let result = self.runner.run(&self.path, &args, None)?;
        if !result.is_ok() {
            debug!(command = result.command(), exit_code = result.exit_code(), "git command failed");
            return Err(GitError::from_result(result));
        }
        Ok(result)
    }

    /// Runs `args` and keeps the lines `filter` maps to `Some`; no lines at
    /// all yields `None`.
    fn extract(&self, args: Args, filter: impl Fn(&str) -> Option<String>) -> Result<Option<Vec<String>>> {
        let result = self.run(args)?;
        let lines: Vec<String> = result.output().iter().filter_map(|l| filter(l)).collect();
        Ok(if lines.is_empty() { None } else { Some(lines) })
    }
}

fn strip_branch_marker(line: &str) -> Option<String> {
    let rest = line.get(1..).unwrap_or("");
    Some(rest.trim().to_string())
}

/// `git config` access scoped to one repository.
pub struct GitConfig<'a, R> {
    repository: &'a GitRepository<R>,
}

impl<R: Runner> GitConfig<'_, R> {
    pub fn set(&self, name: &str, value: &str, options: Args) -> Result<&Self> {
        self.repository.run(Args::new().arg("config").extend(options).arg(name).arg(value))?;
        Ok(self)
    }

    /// `None` when git exits nonzero without printing anything, which is how
    /// it reports an unset key.
    pub fn get(&self, name: &str, options: Args) -> Result<Option<String>> {
        match self.repository.run(Args::new().arg("config").extend(options).arg(name)) {
            Ok(result) => Ok(Some(result.output_as_string().trim_end().to_string())),
            Err(e) => match e.runner_result() {
                Some(r) if !r.has_output() && !r.has_error_output() => Ok(None),
                _ => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::AssertRunner;
    use crate::render::{CommandProcessor, Mode};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn repo(dir: &TempDir) -> GitRepository<AssertRunner> {
        let runner = AssertRunner::new(dir.path()).with_processor(CommandProcessor::new(Mode::NonWindows));
        GitRepository::open(dir.path(), runner).unwrap()
    }

    #[rstest]
    fn open_strips_dot_git(dir: TempDir) {
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let r = GitRepository::open(dir.path().join(".git"), AssertRunner::default()).unwrap();
        assert_eq!(r.path(), std::fs::canonicalize(dir.path()).unwrap());
    }

    #[rstest]
    fn open_missing_repository_fails(dir: TempDir) {
        let err = GitRepository::open(dir.path().join("nope"), AssertRunner::default()).unwrap_err();
        assert!(err.to_string().starts_with("Repository '"));
    }

    #[rstest]
    fn current_branch_is_starred_line(dir: TempDir) {
        let r = repo(&dir);
        r.runner()
            .assert(&Args::new().arg("branch").flag("-a"), None, &["  dev", "* main", "  remotes/origin/main"], &[], 0)
            .unwrap();
        assert_eq!(r.current_branch_name().unwrap(), "main");
    }

    #[rstest]
    fn current_branch_failure_is_reported(dir: TempDir) {
        let r = repo(&dir);
        r.runner().assert(&Args::new().arg("branch").flag("-a"), None, &[], &["fatal"], 128).unwrap();
        let err = r.current_branch_name().unwrap_err();
        assert_eq!(err.to_string(), "Getting current branch name failed.");
        assert_eq!(err.exit_code(), Some(128));
        assert_eq!(err.runner_result().unwrap().error_output(), vec!["fatal"]);
    }

    #[rstest]
    fn current_branch_without_star_is_reported(dir: TempDir) {
        let r = repo(&dir);
        r.runner().assert(&Args::new().arg("branch").flag("-a"), None, &["  dev"], &[], 0).unwrap();
        let err = r.current_branch_name().unwrap_err();
        assert_eq!(err.to_string(), "Getting current branch name failed.");
        assert!(err.runner_result().is_none());
    }

    #[rstest]
    fn current_branch_keeps_runner_errors(dir: TempDir) {
        let r = repo(&dir);
        let err = r.current_branch_name().unwrap_err();
        assert!(matches!(err, GitError::InvalidState(_)));
    }

    #[rstest]
    fn config_unset_key_is_none(dir: TempDir) {
        let r = repo(&dir);
        r.runner().assert(&Args::new().arg("config").arg("user.signingkey"), None, &[], &[], 1).unwrap();
        assert_eq!(r.config().get("user.signingkey", Args::new()).unwrap(), None);
    }

    #[rstest]
    fn config_real_failure_propagates(dir: TempDir) {
        let r = repo(&dir);
        r.runner()
            .assert(&Args::new().arg("config").arg("bad"), None, &[], &["error: key does not contain a section: bad"], 1)
            .unwrap();
        let err = r.config().get("bad", Args::new()).unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.to_string(), "Command 'git config bad' failed (exit-code 1).");
    }
}
