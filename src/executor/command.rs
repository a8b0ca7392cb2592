//! Running one external command: fork, wire redirections, exec, wait.

use std::ffi::CString;
use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;
use std::process;

use log::debug;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult};

use super::{ExecError, PathResolver};
use crate::redirect::RedirectPlan;

/// Spawns an external command and waits for it. A resolver miss is reported
/// on stderr and is not an error; the prompt comes back either way.
pub fn run_external(argv: &[String], plan: &RedirectPlan) -> Result<i32, ExecError> {
    let name = &argv[0];
    let path = match PathResolver.resolve(name) {
        Some(p) => p,
        None => {
            eprintln!("{}: command not found", name);
            return Ok(127);
        }
    };
    debug!("spawning {}", path.display());

    match unsafe { unistd::fork() }? {
        ForkResult::Child => {
            if let Err(e) = apply_redirects(plan) {
                eprintln!("minish: redirection failed: {}", e);
                process::exit(1);
            }
            exec_program(&path, argv)
        }
        ForkResult::Parent { child } => {
            let status = waitpid(child, None)?;
            Ok(exit_code(status))
        }
    }
}

/// Points stdout/stderr at the plan's targets. The opened files are dropped
/// once duplicated onto the standard descriptors.
pub(crate) fn apply_redirects(plan: &RedirectPlan) -> io::Result<()> {
    if let Some(file) = plan.open_stdout()? {
        unistd::dup2(file.as_raw_fd(), libc::STDOUT_FILENO).map_err(io_from_errno)?;
    }
    if let Some(file) = plan.open_stderr()? {
        unistd::dup2(file.as_raw_fd(), libc::STDERR_FILENO).map_err(io_from_errno)?;
    }
    Ok(())
}

/// Replaces the current process image. Only returns by terminating the
/// process, so this is for forked children.
pub(crate) fn exec_program(path: &Path, argv: &[String]) -> ! {
    use std::os::unix::ffi::OsStrExt;

    let prog = match CString::new(path.as_os_str().as_bytes()) {
        Ok(c) => c,
        Err(_) => {
            eprintln!("{}: invalid path", path.display());
            process::exit(1);
        }
    };
    let args: Result<Vec<CString>, _> = argv.iter().map(|a| CString::new(a.as_str())).collect();
    let args = match args {
        Ok(v) => v,
        Err(_) => {
            eprintln!("{}: invalid argument", argv[0]);
            process::exit(1);
        }
    };
    let _ = unistd::execv(&prog, &args);
    eprintln!("{}: failed to execute", path.display());
    process::exit(1);
}

pub(crate) fn exit_code(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
        _ => 1,
    }
}

fn io_from_errno(e: nix::Error) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}
