use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{Runner, RunnerResult};
use crate::cmd::{Args, Env};
use crate::error::GitError;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"git version (\d+)\.(\d+)(?:\.(\d+))?").expect("version regex is valid")
});

/// Adapts any runner for git releases that do not know `--end-of-options`.
#[derive(Debug, Clone, Default)]
pub struct OldGitRunner<R> {
    runner: R,
}

impl<R: Runner> OldGitRunner<R> {
    pub fn new(runner: R) -> Self { Self { runner } }
    pub fn inner(&self) -> &R { &self.runner }
    pub fn into_inner(self) -> R { self.runner }
}

impl<R: Runner> Runner for OldGitRunner<R> {
    fn run(&self, cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        match args.iter().position(|a| a.is_end_of_options()) {
            Some(pos) => {
                trace!(pos, "dropping end-of-options marker");
                let mut stripped = args.clone();
                stripped.0.remove(pos);
                self.runner.run(cwd, &stripped, env)
            }
            None => self.runner.run(cwd, args, env),
        }
    }

    fn cwd(&self) -> Result<PathBuf, GitError> { self.runner.cwd() }
}

/// Version triple parsed from `git --version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// First release that accepts `--end-of-options`.
    pub const END_OF_OPTIONS: GitVersion = GitVersion { major: 2, minor: 24, patch: 0 };

    /// Accepts output like `git version 2.39.3 (Apple Git-145)`.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(output)?;
        let num = |i: usize| -> Option<u32> { caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok()) };
        Some(GitVersion { major: num(1)?, minor: num(2)?, patch: num(3)? })
    }

    pub fn supports_end_of_options(&self) -> bool {
        *self >= Self::END_OF_OPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::Arg;
    use crate::exec::AssertRunner;
    use crate::render::{CommandProcessor, Mode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::RefCell;

    /// Records what the wrapped runner was handed.
    #[derive(Default)]
    struct Recorder { seen: RefCell<Vec<Args>> }

    impl Runner for Recorder {
        fn run(&self, _cwd: &Path, args: &Args, _env: Option<&Env>) -> Result<RunnerResult, GitError> {
            self.seen.borrow_mut().push(args.clone());
            Ok(RunnerResult::new("git", 0, "", ""))
        }
        fn cwd(&self) -> Result<PathBuf, GitError> { Ok(PathBuf::from("/recorded")) }
    }

    #[test]
    fn strips_only_the_marker() {
        let runner = OldGitRunner::new(Recorder::default());
        let args = Args::new().arg("branch").opt("-m", "x").end_of_options().arg("main").arg(None::<&str>);
        runner.run(Path::new("/repo"), &args, None).unwrap();

        let seen = runner.inner().seen.borrow();
        assert_eq!(seen[0].0, vec![
            Arg::Value("branch".into()),
            Arg::opt("-m", "x"),
            Arg::Value("main".into()),
            Arg::Omitted,
        ]);
    }

    #[test]
    fn forwards_untouched_without_marker() {
        let runner = OldGitRunner::new(Recorder::default());
        let args = Args::new().arg("status").flag("--porcelain");
        runner.run(Path::new("/repo"), &args, None).unwrap();
        assert_eq!(runner.inner().seen.borrow()[0], args);
        assert_eq!(runner.cwd().unwrap(), PathBuf::from("/recorded"));
    }

    #[test]
    fn wraps_test_doubles() {
        let inner = AssertRunner::new("/repo").with_processor(CommandProcessor::new(Mode::NonWindows));
        inner.expect(&Args::new().arg("checkout").arg("main")).unwrap();
        let runner = OldGitRunner::new(inner);
        runner
            .run(Path::new("/repo"), &Args::new().arg("checkout").end_of_options().arg("main"), None)
            .unwrap();
        assert_eq!(runner.inner().remaining(), 0);
    }

    #[rstest]
    #[case("git version 2.39.3 (Apple Git-145)", GitVersion { major: 2, minor: 39, patch: 3 }, true)]
    #[case("git version 2.24.0", GitVersion { major: 2, minor: 24, patch: 0 }, true)]
    #[case("git version 2.23.4.windows.1", GitVersion { major: 2, minor: 23, patch: 4 }, false)]
    #[case("git version 1.8\n", GitVersion { major: 1, minor: 8, patch: 0 }, false)]
    fn parses_versions(#[case] raw: &str, #[case] expected: GitVersion, #[case] eoo: bool) {
        let v = GitVersion::parse(raw).unwrap();
        assert_eq!(v, expected);
        assert_eq!(v.supports_end_of_options(), eoo);
    }

    #[test]
    fn garbage_is_not_a_version() {
        assert_eq!(GitVersion::parse("hg version 6.1"), None);
    }
}
