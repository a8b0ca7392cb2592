//! Pipeline execution: pipes, forks, fd wiring, and reaping.

use std::os::fd::{AsRawFd, OwnedFd};
use std::process;

use log::debug;
use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult};

use super::command::{apply_redirects, exec_program};
use super::{ExecError, PathResolver};
use crate::builtins;
use crate::lexer;
use crate::redirect::RedirectPlan;

/// Runs the stages of a pipeline concurrently, one child per stage, with an
/// anonymous pipe between each pair of neighbors. Children are reaped in
/// spawn order; a non-zero child exit does not abort anything.
pub fn run_pipeline(stages: &[String]) -> Result<(), ExecError> {
    let stage_tokens: Vec<Vec<lexer::Token>> =
        stages.iter().map(|s| lexer::tokenize(s.trim())).collect();
    let n = stage_tokens.len();

    let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(n.saturating_sub(1));
    for _ in 1..n {
        pipes.push(unistd::pipe()?);
    }
    debug!("pipeline with {} stages", n);

    let mut children = Vec::with_capacity(n);
    let mut spawn_err = None;
    for (i, tokens) in stage_tokens.iter().enumerate() {
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Child) => {
                if i > 0 {
                    let _ = unistd::dup2(pipes[i - 1].0.as_raw_fd(), libc::STDIN_FILENO);
                }
                if i < n - 1 {
                    let _ = unistd::dup2(pipes[i].1.as_raw_fd(), libc::STDOUT_FILENO);
                }
                // The duplicated descriptors survive; every inherited pipe
                // end must go away or downstream readers never see EOF.
                drop(pipes);
                run_stage(tokens)
            }
            Ok(ForkResult::Parent { child }) => children.push(child),
            Err(e) => {
                spawn_err = Some(e);
                break;
            }
        }
    }

    // Same on the parent side: close all pipe ends before waiting.
    drop(pipes);
    for child in children {
        let _ = waitpid(child, None);
    }
    match spawn_err {
        Some(e) => Err(ExecError::Sys(e)),
        None => Ok(()),
    }
}

/// Stage body run in the forked child. Applies the stage's own redirections
/// (these override the pipe wiring), then runs an in-child builtin or execs
/// an external program.
fn run_stage(tokens: &[lexer::Token]) -> ! {
    let (plan, argv) = RedirectPlan::parse(tokens);
    if let Err(e) = apply_redirects(&plan) {
        eprintln!("minish: redirection failed: {}", e);
        process::exit(1);
    }
    if argv.is_empty() {
        process::exit(0);
    }
    if let Some(code) = builtins::run_stage_builtin(&argv[0], &argv[1..]) {
        process::exit(code);
    }
    let name = &argv[0];
    match PathResolver.resolve(name) {
        Some(path) => exec_program(&path, &argv),
        None => {
            eprintln!("{}: command not found", name);
            process::exit(1);
        }
    }
}
