//! The read-dispatch loop.

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};

use crate::builtins::{self, Builtin, BuiltinOutcome};
use crate::completion::ShellHelper;
use crate::config::Config;
use crate::error::ShellError;
use crate::executor;
use crate::lexer;
use crate::redirect::RedirectPlan;
use crate::state::ShellState;

pub struct Repl {
    state: ShellState,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        Repl {
            state: ShellState::new(config),
        }
    }

    /// Runs until EOF or `exit`, returning the shell's exit status. History
    /// is loaded from `$HISTFILE` up front and written back on the way out.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        let editor_config = rustyline::Config::builder()
            .completion_type(CompletionType::List)
            .build();
        let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::with_config(editor_config)?;
        editor.set_helper(Some(ShellHelper));

        if let Some(path) = self.state.config.histfile.clone() {
            let _ = self.state.history.load(&path);
            self.state.history.mark_persisted();
            // Seed the editor so arrow-key recall covers earlier sessions.
            for entry in self.state.history.entries() {
                let _ = editor.add_history_entry(entry.as_str());
            }
        }

        let code = loop {
            match editor.readline(&self.state.config.prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line.as_str());
                    self.state.history.append(&line);
                    if let Some(code) = self.dispatch(&line) {
                        break code;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break 0,
                Err(e) => {
                    eprintln!("minish: {}", e);
                    break 1;
                }
            }
        };

        self.flush_history();
        Ok(code)
    }

    /// Executes one line. `Some(code)` means the shell should terminate
    /// with that status.
    fn dispatch(&mut self, line: &str) -> Option<i32> {
        let stages = lexer::split_stages(line);
        if stages.len() > 1 {
            debug!("dispatching pipeline of {} stages", stages.len());
            if let Err(e) = executor::run_pipeline(&stages) {
                eprintln!("minish: {}", e);
            }
            return None;
        }

        let tokens = lexer::tokenize(line);
        if tokens.is_empty() {
            return None;
        }
        let (plan, argv) = RedirectPlan::parse(&tokens);
        if argv.is_empty() {
            return None;
        }

        match Builtin::from_name(&argv[0]) {
            Some(builtin) => {
                match builtins::run(builtin, &argv[1..], &plan, &mut self.state.history) {
                    BuiltinOutcome::Continue => None,
                    BuiltinOutcome::Exit(code) => Some(code),
                }
            }
            None => {
                if let Err(e) = executor::run_external(&argv, &plan) {
                    eprintln!("minish: {}", e);
                }
                None
            }
        }
    }

    fn flush_history(&mut self) {
        if let Some(path) = self.state.config.histfile.clone() {
            let _ = self.state.history.write(&path);
        }
    }
}
