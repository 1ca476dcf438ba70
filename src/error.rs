use crate::exec::RunnerResult;

pub type Result<T> = std::result::Result<T, GitError>;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("{message}")]
    CommandFailed {
        message: String,
        result: Option<Box<RunnerResult>>,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl GitError {
    pub fn command_failed(message: impl Into<String>) -> Self {
        GitError::CommandFailed { message: message.into(), result: None, source: None }
    }

    /// Failure of a process that ran to completion; keeps the captured result.
    pub fn from_result(result: RunnerResult) -> Self {
        let message = format!(
            "Command '{}' failed (exit-code {}).",
            result.command(),
            result.exit_code()
        );
        GitError::CommandFailed { message, result: Some(Box::new(result)), source: None }
    }

    pub fn runner_result(&self) -> Option<&RunnerResult> {
        match self {
            GitError::CommandFailed { result, .. } => result.as_deref(),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.runner_result().map(RunnerResult::exit_code)
    }
}
