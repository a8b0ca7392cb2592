//! The long-lived shell state threaded through the REPL.

use crate::config::Config;
use crate::history::HistoryStore;

pub struct ShellState {
    pub config: Config,
    pub history: HistoryStore,
}

impl ShellState {
    pub fn new(config: Config) -> Self {
        ShellState {
            config,
            history: HistoryStore::new(),
        }
    }
}
