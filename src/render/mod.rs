//! Rendering of argument lists into escaped command lines.

use std::fmt;
use std::str::FromStr;

use crate::cmd::{Arg, Args, Env, OptValue};
use crate::error::GitError;

/// Which quoting rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Inspect the host OS when the processor is built.
    #[default]
    Detect,
    Windows,
    NonWindows,
}

impl FromStr for Mode {
    type Err = GitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detect" => Ok(Mode::Detect),
            "windows" => Ok(Mode::Windows),
            "non-windows" => Ok(Mode::NonWindows),
            other => Err(GitError::InvalidArgument(format!("Invalid mode '{}'.", other))),
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = GitError;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Mode::Detect),
            1 => Ok(Mode::Windows),
            2 => Ok(Mode::NonWindows),
            other => Err(GitError::InvalidArgument(format!("Invalid mode '{}'.", other))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Detect => "detect",
            Mode::Windows => "windows",
            Mode::NonWindows => "non-windows",
        })
    }
}

/// Builds a single escaped command line out of a program, its arguments
/// and an optional environment prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandProcessor { windows: bool }

impl Default for CommandProcessor {
    fn default() -> Self { Self::new(Mode::Detect) }
}

/// A rendered piece of the command line; `verbatim` pieces skip escaping.
struct Token<'a> { text: &'a str, verbatim: bool }

impl CommandProcessor {
    pub fn new(mode: Mode) -> Self {
        let windows = match mode {
            Mode::Windows => true,
            Mode::NonWindows => false,
            Mode::Detect => cfg!(windows),
        };
        Self { windows }
    }

    pub fn is_windows(&self) -> bool { self.windows }

    pub fn process(&self, program: &str, args: &Args, env: Option<&Env>) -> Result<String, GitError> {
        if program.is_empty() {
            return Err(GitError::InvalidArgument("program empty".into()));
        }

        let mut out = String::new();
        if let Some(env) = env {
            for (k, v) in env.iter() {
                if self.windows {
                    out.push_str(&format!("set {}={} && ", k, v));
                } else {
                    out.push_str(&format!("{}={} ", k, v));
                }
            }
        }

        out.push_str(&self.quote_prog(program));
        for t in tokens(args)? {
            out.push(' ');
            if t.verbatim {
                out.push_str(t.text);
            } else {
                out.push_str(&self.escape_argument(t.text));
            }
        }
        Ok(out)
    }

    /// The unescaped process arguments, one element per argv slot.
    pub fn argv(&self, args: &Args) -> Result<Vec<String>, GitError> {
        Ok(tokens(args)?.into_iter().map(|t| t.text.to_string()).collect())
    }

    pub fn escape_argument(&self, value: &str) -> String {
        if is_safe_token(value) {
            return value.to_string();
        }
        if self.windows { quote_win(value) } else { quote_sh(value) }
    }

    fn quote_prog(&self, p: &str) -> String {
        if is_simple_word(p) { p.to_string() } else if self.windows { quote_win(p) } else { quote_sh(p) }
    }
}

fn tokens(args: &Args) -> Result<Vec<Token<'_>>, GitError> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Arg::Flag(s) | Arg::Value(s) => out.push(Token { text: s, verbatim: false }),
            Arg::Id(id) => out.push(Token { text: id.as_str(), verbatim: true }),
            Arg::Omitted => {}
            Arg::Opt { name, value } => {
                let value = match value {
                    OptValue::Omitted => continue,
                    OptValue::Str(s) => Token { text: s, verbatim: false },
                    OptValue::Bool(true) => Token { text: "1", verbatim: true },
                    OptValue::Bool(false) => Token { text: "0", verbatim: true },
                    OptValue::Id(id) => Token { text: id.as_str(), verbatim: true },
                };
                if !is_option_name(name) {
                    return Err(GitError::InvalidState(format!("Unknown option name '{}'.", name)));
                }
                out.push(Token { text: name, verbatim: true });
                out.push(value);
            }
        }
    }
    Ok(out)
}

/// `^[A-Za-z0-9._-]+$`
pub fn is_safe_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.'))
}

fn is_option_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '=' | ':' | '/'))
}

fn is_simple_word(s: &str) -> bool {
    s.chars().all(|c| matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/' | '\\' | ':' | '+' | '@' | ','))
}

fn quote_sh(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn quote_win(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
