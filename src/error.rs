use std::{fmt, io};

use crate::executor::ExecError;

#[derive(Debug)]
pub enum ShellError {
    Io(io::Error),
    Readline(rustyline::error::ReadlineError),
    Exec(ExecError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Io(e) => write!(f, "io error: {}", e),
            ShellError::Readline(e) => write!(f, "readline error: {}", e),
            ShellError::Exec(e) => write!(f, "execution error: {}", e),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Io(e) => Some(e),
            ShellError::Readline(e) => Some(e),
            ShellError::Exec(e) => Some(e),
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> Self {
        ShellError::Io(e)
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(e)
    }
}

impl From<ExecError> for ShellError {
    fn from(e: ExecError) -> Self {
        ShellError::Exec(e)
    }
}
