//! Extraction of redirection directives from a token sequence.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;

use crate::lexer::Token;

/// One redirection target: the file path and whether to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: String,
    pub append: bool,
}

impl RedirectTarget {
    /// Opens the target write-only, creating it with mode 0644, truncating
    /// or appending as requested.
    pub fn open(&self) -> io::Result<File> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).mode(0o644);
        if self.append {
            opts.append(true);
        } else {
            opts.truncate(true);
        }
        opts.open(&self.path)
    }
}

/// The redirections of a single command: at most one stdout target and one
/// stderr target. A later operator for the same stream overrides an earlier
/// one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectPlan {
    pub stdout: Option<RedirectTarget>,
    pub stderr: Option<RedirectTarget>,
}

impl RedirectPlan {
    /// Scans the tokens for the six operator words (`>`, `1>`, `>>`, `1>>`,
    /// `2>`, `2>>`), consuming each operator together with the token after
    /// it as the target path. Only words typed without quoting count as
    /// operators. An operator with nothing after it stays in the argv
    /// untouched. Returns the plan and the residual argv in original order.
    pub fn parse(tokens: &[Token]) -> (RedirectPlan, Vec<String>) {
        let mut plan = RedirectPlan::default();
        let mut argv = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let operator = if token.quoted {
                None
            } else {
                match token.text.as_str() {
                    ">" | "1>" => Some((false, false)),
                    ">>" | "1>>" => Some((false, true)),
                    "2>" => Some((true, false)),
                    "2>>" => Some((true, true)),
                    _ => None,
                }
            };
            let (stream_is_stderr, append) = match operator {
                Some(op) => op,
                None => {
                    argv.push(token.text.clone());
                    i += 1;
                    continue;
                }
            };
            match tokens.get(i + 1) {
                Some(path) => {
                    let target = RedirectTarget {
                        path: path.text.clone(),
                        append,
                    };
                    if stream_is_stderr {
                        plan.stderr = Some(target);
                    } else {
                        plan.stdout = Some(target);
                    }
                    i += 2;
                }
                None => {
                    argv.push(token.text.clone());
                    i += 1;
                }
            }
        }
        (plan, argv)
    }

    pub fn open_stdout(&self) -> io::Result<Option<File>> {
        self.stdout.as_ref().map(RedirectTarget::open).transpose()
    }

    pub fn open_stderr(&self) -> io::Result<Option<File>> {
        self.stderr.as_ref().map(RedirectTarget::open).transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }
}
