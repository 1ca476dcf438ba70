use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, instrument};

use super::{Runner, RunnerResult};
use crate::cmd::{Args, Env};
use crate::error::GitError;
use crate::render::{CommandProcessor, Mode};

/// Runs the real git binary as a child process.
#[derive(Debug, Clone)]
pub struct CliRunner {
    git_binary: String,
    processor: CommandProcessor,
    inherit_env: bool,
}

impl Default for CliRunner {
    fn default() -> Self { Self::new() }
}

impl CliRunner {
    pub fn new() -> Self { Self::with_binary("git") }

    pub fn with_binary(git_binary: impl Into<String>) -> Self {
        Self { git_binary: git_binary.into(), processor: CommandProcessor::new(Mode::Detect), inherit_env: true }
    }

    /// Quoting rules for the command text reported in results and errors.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.processor = CommandProcessor::new(mode);
        self
    }

    /// When false, the child sees only the variables passed to `run`.
    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    pub fn git_binary(&self) -> &str { &self.git_binary }
}

impl Runner for CliRunner {
    #[instrument(skip_all, fields(cwd = %cwd.display()))]
    fn run(&self, cwd: &Path, args: &Args, env: Option<&Env>) -> Result<RunnerResult, GitError> {
        if !cwd.is_dir() {
            return Err(GitError::command_failed(format!("Directory '{}' not found", cwd.display())));
        }

        let command = self.processor.process(&self.git_binary, args, None)?;
        let argv = self.processor.argv(args)?;

        let mut cmd = Command::new(&self.git_binary);
        cmd.args(&argv)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if !self.inherit_env {
            cmd.env_clear();
        }
        if let Some(env) = env {
            cmd.envs(env.iter());
        }

        debug!(%command, "spawning git");
        let mut child = cmd.spawn().map_err(|e| GitError::CommandFailed {
            message: format!("Executing of command '{}' failed (directory {}).", command, cwd.display()),
            result: None,
            source: Some(e),
        })?;

        // Nothing is ever written; closing stdin makes prompts fail fast.
        drop(child.stdin.take());

        let drained = drain(&mut child);
        if drained.is_err() {
            let _ = child.kill();
        }
        let status = child.wait();
        let (stdout, stderr) = drained.map_err(|e| io_failure(&command, e))?;
        let status = status.map_err(|e| io_failure(&command, e))?;

        // Killed by a signal: no exit code.
        let exit_code = status.code().unwrap_or(-1);
        debug!(%command, exit_code, "git exited");
        Ok(RunnerResult::from_bytes(command, exit_code, &stdout, &stderr))
    }

    fn cwd(&self) -> Result<PathBuf, GitError> {
        std::env::current_dir().map_err(|_| GitError::InvalidState("Getting of CWD failed.".into()))
    }
}

/// Reads stdout and stderr to EOF at the same time so a full pipe on one
/// side never blocks the child while we wait on the other.
fn drain(child: &mut Child) -> std::io::Result<(Vec<u8>, Vec<u8>)> {
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    thread::scope(|s| {
        let err_reader = s.spawn(move || -> std::io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr.as_mut() {
                pipe.read_to_end(&mut buf)?;
            }
            Ok(buf)
        });

        let mut out = Vec::new();
        let out_res = match stdout.as_mut() {
            Some(pipe) => pipe.read_to_end(&mut out).map(|_| ()),
            None => Ok(()),
        };
        let err = err_reader
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stderr reader panicked")));
        out_res?;
        Ok((out, err?))
    })
}

fn io_failure(command: &str, e: std::io::Error) -> GitError {
    GitError::CommandFailed {
        message: format!("Reading output of command '{}' failed.", command),
        result: None,
        source: Some(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_reported() {
        let runner = CliRunner::new();
        let err = runner
            .run(Path::new("/definitely/not/here"), &Args::new().arg("status"), None)
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.runner_result().is_none());
    }

    #[test]
    fn spawn_failure_is_command_failed() {
        let dir = tempfile::tempdir().unwrap();
        let runner = CliRunner::with_binary("gitcmd-no-such-binary").mode(Mode::NonWindows);
        let err = runner.run(dir.path(), &Args::new().arg("status"), None).unwrap_err();
        match err {
            GitError::CommandFailed { message, source, .. } => {
                assert!(message.contains("gitcmd-no-such-binary status"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cwd_is_process_directory() {
        assert_eq!(CliRunner::new().cwd().unwrap(), std::env::current_dir().unwrap());
    }
}
