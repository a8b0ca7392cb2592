//! Startup configuration, captured once from the environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    /// History persistence target; `None` disables load and save.
    pub histfile: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let histfile = env::var("HISTFILE").ok().filter(|path| !path.is_empty());
        Config {
            prompt: "$ ".to_string(),
            histfile,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "$ ".to_string(),
            histfile: None,
        }
    }
}
