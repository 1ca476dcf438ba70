use std::fmt;

/// Captured outcome of one finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerResult {
    command: String,
    exit_code: i32,
    output: String,
    error_output: String,
}

impl RunnerResult {
    pub fn new(command: impl Into<String>, exit_code: i32, output: impl Into<String>, error_output: impl Into<String>) -> Self {
        Self { command: command.into(), exit_code, output: output.into(), error_output: error_output.into() }
    }

    pub fn from_lines<S: AsRef<str>>(command: impl Into<String>, exit_code: i32, output: &[S], error_output: &[S]) -> Self {
        Self::new(command, exit_code, join_lines(output), join_lines(error_output))
    }

    /// Decodes raw pipe contents; invalid UTF-8 is replaced.
    pub fn from_bytes(command: impl Into<String>, exit_code: i32, output: &[u8], error_output: &[u8]) -> Self {
        Self::new(
            command,
            exit_code,
            String::from_utf8_lossy(output).into_owned(),
            String::from_utf8_lossy(error_output).into_owned(),
        )
    }

    pub fn is_ok(&self) -> bool { self.exit_code == 0 }
    pub fn command(&self) -> &str { &self.command }
    pub fn exit_code(&self) -> i32 { self.exit_code }

    pub fn output(&self) -> Vec<String> { split_output(&self.output) }
    pub fn output_as_string(&self) -> &str { &self.output }
    pub fn output_last_line(&self) -> Option<String> { self.output().pop() }
    pub fn has_output(&self) -> bool { !self.output.trim().is_empty() }

    pub fn error_output(&self) -> Vec<String> { split_output(&self.error_output) }
    pub fn error_output_as_string(&self) -> &str { &self.error_output }
    pub fn has_error_output(&self) -> bool { !self.error_output.trim().is_empty() }

    pub fn to_text(&self) -> String {
        format!(
            "$ {}\n\n---- STDOUT: \n\n{}\n\n---- STDERR: \n\n{}\n\n=> {}\n\n",
            self.command,
            self.output().join("\n"),
            self.error_output().join("\n"),
            self.exit_code,
        )
    }
}

impl fmt::Display for RunnerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n")
}

fn split_output(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim_end_matches('\n');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}
