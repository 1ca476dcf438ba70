use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Runner, RunnerResult, FIXTURE_PROGRAM};
use crate::cmd::{Args, Env};
use crate::error::GitError;
use crate::render::CommandProcessor;

/// Answers commands from pre-registered results, keyed by the rendered
/// command line. Unknown commands are an error, never an empty result.
#[derive(Debug, Default)]
pub struct MemoryRunner {
    cwd: PathBuf,
    processor: CommandProcessor,
    results: RefCell<HashMap<String, RunnerResult>>,
}

impl MemoryRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into(), processor: CommandProcessor::default(), results: RefCell::default() }
    }

    pub fn with_processor(mut self, processor: CommandProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn set_result(
        &self,
        args: &Args,
        env: Option<&Env>,
        output: &str,
        error_output: &str,
        exit_code: i32,
    ) -> Result<&Self, GitError> {
        let cmd = self.processor.process(FIXTURE_PROGRAM, args, env)?;
        let result = RunnerResult::new(cmd.clone(), exit_code, output, error_output);
        self.results.borrow_mut().insert(cmd, result);
        Ok(self)
    }
}

impl Runner for MemoryRunner {
    fn run(&self, _cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        let cmd = self.processor.process(FIXTURE_PROGRAM, args, env)?;
        self.results
            .borrow()
            .get(&cmd)
            .cloned()
            .ok_or_else(|| GitError::InvalidState(format!("Missing result for command '{}'.", cmd)))
    }

    fn cwd(&self) -> Result<PathBuf, GitError> { Ok(self.cwd.clone()) }
}
