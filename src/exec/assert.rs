use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::{Runner, RunnerResult, FIXTURE_PROGRAM};
use crate::cmd::{Args, Env};
use crate::error::GitError;
use crate::render::CommandProcessor;

/// Expects commands in a fixed order and panics on the first one that
/// differs from the head of the queue.
#[derive(Debug, Default)]
pub struct AssertRunner {
    cwd: PathBuf,
    processor: CommandProcessor,
    asserts: RefCell<VecDeque<RunnerResult>>,
}

impl AssertRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into(), processor: CommandProcessor::default(), asserts: RefCell::default() }
    }

    pub fn with_processor(mut self, processor: CommandProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn assert(
        &self,
        expected_args: &Args,
        expected_env: Option<&Env>,
        output: &[&str],
        error_output: &[&str],
        exit_code: i32,
    ) -> Result<&Self, GitError> {
        let cmd = self.processor.process(FIXTURE_PROGRAM, expected_args, expected_env)?;
        self.asserts
            .borrow_mut()
            .push_back(RunnerResult::from_lines(cmd, exit_code, output, error_output));
        Ok(self)
    }

    /// Shorthand for a successful call without output.
    pub fn expect(&self, expected_args: &Args) -> Result<&Self, GitError> {
        self.assert(expected_args, None, &[], &[], 0)
    }

    pub fn reset_asserts(&self) -> &Self {
        self.asserts.borrow_mut().clear();
        self
    }

    pub fn remaining(&self) -> usize { self.asserts.borrow().len() }
}

impl Runner for AssertRunner {
    fn run(&self, _cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        let cmd = self.processor.process(FIXTURE_PROGRAM, args, env)?;
        let Some(expected) = self.asserts.borrow_mut().pop_front() else {
            return Err(GitError::InvalidState("Missing asserts, use AssertRunner::assert().".into()));
        };
        assert_eq!(expected.command(), cmd, "unexpected git command");
        Ok(expected)
    }

    fn cwd(&self) -> Result<PathBuf, GitError> { Ok(self.cwd.clone()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Mode;
    use pretty_assertions::assert_eq;

    fn runner() -> AssertRunner {
        AssertRunner::new("/repo").with_processor(CommandProcessor::new(Mode::NonWindows))
    }

    #[test]
    fn returns_results_in_order() {
        let r = runner();
        let a = Args::new().arg("tag");
        let b = Args::new().arg("branch");
        r.assert(&a, None, &["v1"], &[], 0).unwrap().assert(&b, None, &["* main"], &[], 0).unwrap();

        assert_eq!(r.run(Path::new("/repo"), &a, None).unwrap().output(), vec!["v1"]);
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.run(Path::new("/repo"), &b, None).unwrap().output(), vec!["* main"]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "unexpected git command")]
    fn out_of_order_call_panics() {
        let r = runner();
        let a = Args::new().arg("tag");
        let b = Args::new().arg("branch");
        r.expect(&a).unwrap().expect(&b).unwrap();
        let _ = r.run(Path::new("/repo"), &b, None);
    }

    #[test]
    fn empty_queue_is_invalid_state() {
        let r = runner();
        let err = r.run(Path::new("/repo"), &Args::new().arg("tag"), None).unwrap_err();
        assert!(matches!(&err, GitError::InvalidState(m) if m == "Missing asserts, use AssertRunner::assert()."));

        r.expect(&Args::new().arg("tag")).unwrap();
        r.run(Path::new("/repo"), &Args::new().arg("tag"), None).unwrap();
        assert!(r.run(Path::new("/repo"), &Args::new().arg("tag"), None).is_err());
    }

    #[test]
    fn reset_drops_pending_expectations() {
        let r = runner();
        r.expect(&Args::new().arg("tag")).unwrap();
        r.reset_asserts();
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn failing_exit_codes_are_returned_not_raised() {
        let r = runner();
        let args = Args::new().arg("push");
        r.assert(&args, None, &[], &["rejected"], 1).unwrap();
        let got = r.run(Path::new("/repo"), &args, None).unwrap();
        assert!(!got.is_ok());
        assert_eq!(got.error_output(), vec!["rejected"]);
    }
}
