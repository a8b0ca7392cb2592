//! Tab completion for the first word of the line.

use std::env;
use std::io::{self, Write};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

use crate::builtins::BUILTIN_NAMES;
use crate::executor::is_executable;

/// Collects every command name starting with `prefix`: the builtins plus
/// the executable entries of each directory on the given `:`-separated
/// search list. The result is sorted and free of duplicates.
pub fn complete_command(prefix: &str, search: &str) -> Vec<String> {
    let mut matches: Vec<String> = BUILTIN_NAMES
        .iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| name.to_string())
        .collect();

    for dir in search.split(':') {
        if dir.is_empty() {
            continue;
        }
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name.starts_with(prefix) && is_executable(&entry.path()) {
                matches.push(name);
            }
        }
    }

    matches.sort();
    matches.dedup();
    matches
}

/// The line editor helper. Completion runs only when the word being
/// completed starts at column 0; an empty candidate set rings the terminal
/// bell instead.
pub struct ShellHelper;

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map_or(0, |i| i + 1);
        if start != 0 {
            return Ok((pos, Vec::new()));
        }

        let search = env::var("PATH").unwrap_or_default();
        let names = complete_command(&line[..pos], &search);
        if names.is_empty() {
            print!("\x07");
            let _ = io::stdout().flush();
            return Ok((start, Vec::new()));
        }
        let candidates = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: format!("{} ", name),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    struct TempBin {
        root: PathBuf,
    }

    impl TempBin {
        fn new(tag: &str) -> Self {
            let root =
                std::env::temp_dir().join(format!("minish-comp-{}-{}", tag, std::process::id()));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            TempBin { root }
        }

        fn add(&self, name: &str, mode: u32) {
            let p = self.root.join(name);
            File::create(&p).unwrap();
            let mut perms = fs::metadata(&p).unwrap().permissions();
            perms.set_mode(mode);
            fs::set_permissions(&p, perms).unwrap();
        }

        fn search(&self) -> String {
            self.root.display().to_string()
        }
    }

    impl Drop for TempBin {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_builtins_complete_by_prefix() {
        let names = complete_command("ec", "");
        assert_eq!(names, vec!["echo"]);
    }

    #[test]
    fn test_executables_merge_with_builtins_sorted() {
        let bin = TempBin::new("merge");
        bin.add("ember", 0o755);
        bin.add("eagle", 0o755);
        let names = complete_command("e", &bin.search());
        assert_eq!(names, vec!["eagle", "echo", "ember", "exit"]);
    }

    #[test]
    fn test_non_executables_are_skipped() {
        let bin = TempBin::new("mode");
        bin.add("runnable", 0o755);
        bin.add("readable", 0o644);
        let names = complete_command("r", &bin.search());
        assert_eq!(names, vec!["runnable"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let bin = TempBin::new("dup");
        bin.add("echo", 0o755);
        let names = complete_command("echo", &bin.search());
        assert_eq!(names, vec!["echo"]);
    }

    #[test]
    fn test_result_is_strictly_increasing() {
        let bin = TempBin::new("sorted");
        bin.add("aa", 0o755);
        bin.add("ab", 0o755);
        bin.add("ac", 0o755);
        let names = complete_command("", &bin.search());
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_match_is_empty() {
        let names = complete_command("zzzz-nothing", "");
        assert!(names.is_empty());
    }
}
