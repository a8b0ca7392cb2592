//! The shell builtins and their dispatch.

use std::env;
use std::io::{self, Write};

use crate::executor::PathResolver;
use crate::history::HistoryStore;
use crate::redirect::RedirectPlan;

/// Names recognized as builtins, for dispatch and completion.
pub const BUILTIN_NAMES: [&str; 6] = ["cd", "echo", "exit", "history", "pwd", "type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Echo,
    Exit,
    History,
    Pwd,
    Type,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "cd" => Some(Builtin::Cd),
            "echo" => Some(Builtin::Echo),
            "exit" => Some(Builtin::Exit),
            "history" => Some(Builtin::History),
            "pwd" => Some(Builtin::Pwd),
            "type" => Some(Builtin::Type),
            _ => None,
        }
    }
}

/// What the REPL does after a builtin ran.
#[derive(Debug, PartialEq, Eq)]
pub enum BuiltinOutcome {
    Continue,
    Exit(i32),
}

/// Runs a builtin in-process, with its stdout/stderr pointed at the plan's
/// targets when present. A target that cannot be opened is reported and the
/// command is skipped; the prompt comes back.
pub fn run(
    builtin: Builtin,
    args: &[String],
    plan: &RedirectPlan,
    history: &mut HistoryStore,
) -> BuiltinOutcome {
    let mut out_file = None;
    if let Some(target) = &plan.stdout {
        match target.open() {
            Ok(f) => out_file = Some(f),
            Err(e) => {
                eprintln!("minish: {}: {}", target.path, e);
                return BuiltinOutcome::Continue;
            }
        }
    }
    let mut err_file = None;
    if let Some(target) = &plan.stderr {
        match target.open() {
            Ok(f) => err_file = Some(f),
            Err(e) => {
                eprintln!("minish: {}: {}", target.path, e);
                return BuiltinOutcome::Continue;
            }
        }
    }

    let mut out: Box<dyn Write> = match out_file {
        Some(f) => Box::new(f),
        None => Box::new(io::stdout().lock()),
    };
    let mut err: Box<dyn Write> = match err_file {
        Some(f) => Box::new(f),
        None => Box::new(io::stderr().lock()),
    };

    let outcome = match builtin {
        Builtin::Echo => {
            echo(args, &mut *out);
            BuiltinOutcome::Continue
        }
        Builtin::Type => {
            type_of(args, &mut *out);
            BuiltinOutcome::Continue
        }
        Builtin::Pwd => {
            pwd(&mut *out, &mut *err);
            BuiltinOutcome::Continue
        }
        Builtin::Cd => {
            cd(args, &mut *err);
            BuiltinOutcome::Continue
        }
        Builtin::History => {
            history_cmd(args, &mut *out, history);
            BuiltinOutcome::Continue
        }
        Builtin::Exit => exit_shell(args),
    };
    let _ = out.flush();
    let _ = err.flush();
    outcome
}

/// Builtins that also work inside a pipeline stage, run from the forked
/// child with its descriptors already wired. Returns the child's exit code,
/// or `None` when the name must go through the external path.
pub fn run_stage_builtin(name: &str, args: &[String]) -> Option<i32> {
    match name {
        "echo" => {
            let mut out = io::stdout().lock();
            echo(args, &mut out);
            let _ = out.flush();
            Some(0)
        }
        "type" => {
            let mut out = io::stdout().lock();
            type_of(args, &mut out);
            let _ = out.flush();
            Some(0)
        }
        _ => None,
    }
}

fn echo(args: &[String], out: &mut dyn Write) {
    let _ = writeln!(out, "{}", args.join(" "));
}

fn type_of(args: &[String], out: &mut dyn Write) {
    let name = match args.first() {
        Some(n) => n,
        None => {
            let _ = writeln!(out, "type: missing argument");
            return;
        }
    };
    if Builtin::from_name(name).is_some() {
        let _ = writeln!(out, "{} is a shell builtin", name);
    } else if let Some(path) = PathResolver.resolve(name) {
        let _ = writeln!(out, "{} is {}", name, path.display());
    } else {
        let _ = writeln!(out, "{}: not found", name);
    }
}

fn pwd(out: &mut dyn Write, err: &mut dyn Write) {
    match env::current_dir() {
        Ok(dir) => {
            let _ = writeln!(out, "{}", dir.display());
        }
        Err(e) => {
            let _ = writeln!(err, "pwd: {}", e);
        }
    }
}

fn cd(args: &[String], err: &mut dyn Write) {
    let target = match args.first() {
        Some(t) => t,
        None => return,
    };
    let dest = if target == "~" {
        env::var("HOME").ok()
    } else {
        Some(target.clone())
    };
    let changed = match &dest {
        Some(d) => env::set_current_dir(d).is_ok(),
        None => false,
    };
    if !changed {
        let _ = writeln!(err, "cd: {}: No such file or directory", target);
    }
}

fn history_cmd(args: &[String], out: &mut dyn Write, history: &mut HistoryStore) {
    match args.first().map(|s| s.as_str()) {
        Some("-r") => {
            if let Some(path) = args.get(1) {
                let _ = history.load(path);
            }
        }
        Some("-w") => {
            if let Some(path) = args.get(1) {
                let _ = history.write(path);
            }
        }
        Some("-a") => {
            if let Some(path) = args.get(1) {
                let _ = history.append_since(path);
            }
        }
        arg => {
            let last = arg.and_then(|s| s.parse::<usize>().ok());
            list_history(history, last, out);
        }
    }
}

fn list_history(history: &HistoryStore, last: Option<usize>, out: &mut dyn Write) {
    let total = history.len();
    let start = match last {
        Some(n) if n < total => total - n,
        _ => 0,
    };
    for (i, line) in history.entries().iter().enumerate().skip(start) {
        let _ = writeln!(out, "    {}  {}", i + 1, line);
    }
}

fn exit_shell(args: &[String]) -> BuiltinOutcome {
    match args.first() {
        None => BuiltinOutcome::Exit(0),
        Some(arg) => match arg.parse::<i32>() {
            Ok(code) => BuiltinOutcome::Exit(code),
            Err(_) => {
                eprintln!("exit: {}: numeric argument required", arg);
                BuiltinOutcome::Exit(2)
            }
        },
    }
}
