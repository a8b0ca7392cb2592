//! In-memory command history with incremental-append persistence.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// An append-only list of entered lines plus a cursor recording how many of
/// them the most recent flush already persisted. `history -a` uses the
/// cursor to write only the new tail.
///
/// Invariant: `last_appended <= entries.len()`.
pub struct HistoryStore {
    entries: Vec<String>,
    last_appended: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore {
            entries: Vec::new(),
            last_appended: 0,
        }
    }

    /// Records a line exactly as entered. Blank lines are not recorded.
    pub fn append(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.entries.push(line.to_string());
    }

    /// Appends the lines of a file to the in-memory list. The cursor does
    /// not move.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let file = File::open(path)?;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                self.entries.push(line);
            }
        }
        Ok(())
    }

    /// Marks everything currently in memory as persisted. Used after the
    /// startup load so a later `history -a` appends only session entries.
    pub fn mark_persisted(&mut self) {
        self.last_appended = self.entries.len();
    }

    /// Writes the complete history, truncating the file, and advances the
    /// cursor to the end.
    pub fn write<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        for line in &self.entries {
            writeln!(file, "{}", line)?;
        }
        self.last_appended = self.entries.len();
        Ok(())
    }

    /// Appends the entries past the cursor, creating the file if absent,
    /// and advances the cursor to the end.
    pub fn append_since<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        for line in &self.entries[self.last_appended..] {
            writeln!(file, "{}", line)?;
        }
        self.last_appended = self.entries.len();
        Ok(())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_appended(&self) -> usize {
        self.last_appended
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        HistoryStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("minish-hist-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_append_skips_blank_lines() {
        let mut h = HistoryStore::new();
        h.append("echo hi");
        h.append("");
        h.append("   \t");
        h.append("pwd");
        assert_eq!(h.entries(), &["echo hi".to_string(), "pwd".to_string()]);
    }

    #[test]
    fn test_append_preserves_line_verbatim() {
        let mut h = HistoryStore::new();
        h.append("echo  two   spaces ");
        assert_eq!(h.entries(), &["echo  two   spaces ".to_string()]);
    }

    #[test]
    fn test_cursor_invariant_and_write() {
        let path = temp_path("write");
        let mut h = HistoryStore::new();
        h.append("one");
        h.append("two");
        assert_eq!(h.last_appended(), 0);
        h.write(&path).unwrap();
        assert_eq!(h.last_appended(), h.len());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_since_writes_only_new_entries() {
        let path = temp_path("append");
        let _ = fs::remove_file(&path);
        let mut h = HistoryStore::new();
        h.append("one");
        h.append("two");
        h.append_since(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        // Nothing new: the second flush writes zero bytes.
        h.append_since(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        h.append("three");
        h.append_since(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
        assert!(h.last_appended() <= h.len());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_appends_and_keeps_cursor() {
        let path = temp_path("load");
        fs::write(&path, "a\nb\n").unwrap();
        let mut h = HistoryStore::new();
        h.append("session");
        h.load(&path).unwrap();
        assert_eq!(
            h.entries(),
            &["session".to_string(), "a".to_string(), "b".to_string()]
        );
        assert_eq!(h.last_appended(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mark_persisted_sets_cursor_to_len() {
        let mut h = HistoryStore::new();
        h.append("x");
        h.mark_persisted();
        assert_eq!(h.last_appended(), 1);
    }
}
