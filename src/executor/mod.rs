//! Process spawning: single external commands and pipelines.

mod command;
mod path_resolver;
mod pipeline;

pub use command::run_external;
pub use path_resolver::{is_executable, PathResolver};
pub use pipeline::run_pipeline;

use std::{fmt, io};

#[derive(Debug)]
pub enum ExecError {
    Io(io::Error),
    Sys(nix::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Io(e) => write!(f, "io error: {}", e),
            ExecError::Sys(e) => write!(f, "system error: {}", e),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            ExecError::Sys(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Sys(e)
    }
}
