//! Locating external commands on `PATH`.

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct PathResolver;

impl PathResolver {
    /// Resolves a command name to the path that would be executed.
    ///
    /// A name containing `/` is returned untouched; execution surfaces any
    /// error. Otherwise the `PATH` directories are probed in order and the
    /// first executable non-directory entry wins.
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.contains('/') {
            return Some(PathBuf::from(command));
        }
        let search = env::var("PATH").ok()?;
        self.resolve_in(command, &search)
    }

    /// Same lookup against an explicit `:`-separated search list. Empty
    /// list elements are misses, not the current directory.
    pub fn resolve_in(&self, command: &str, search: &str) -> Option<PathBuf> {
        for dir in search.split(':') {
            if dir.is_empty() {
                continue;
            }
            let candidate = Path::new(dir).join(command);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// A path counts as executable when it exists, is not a directory, and has
/// the owner-execute bit set.
pub fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => !meta.is_dir() && meta.permissions().mode() & 0o100 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::PathBuf;

    struct TempTree {
        root: PathBuf,
    }

    impl TempTree {
        fn new(tag: &str) -> Self {
            let root =
                std::env::temp_dir().join(format!("minish-path-{}-{}", tag, std::process::id()));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            TempTree { root }
        }

        fn dir(&self, name: &str) -> PathBuf {
            let d = self.root.join(name);
            fs::create_dir_all(&d).unwrap();
            d
        }

        fn executable(&self, dir: &str, name: &str) {
            let p = self.dir(dir).join(name);
            File::create(&p).unwrap();
            let mut perms = fs::metadata(&p).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&p, perms).unwrap();
        }

        fn plain_file(&self, dir: &str, name: &str) {
            let p = self.dir(dir).join(name);
            File::create(&p).unwrap();
            let mut perms = fs::metadata(&p).unwrap().permissions();
            perms.set_mode(0o644);
            fs::set_permissions(&p, perms).unwrap();
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_slash_names_pass_through() {
        let r = PathResolver;
        assert_eq!(
            r.resolve("/no/such/binary"),
            Some(PathBuf::from("/no/such/binary"))
        );
        assert_eq!(r.resolve("./rel"), Some(PathBuf::from("./rel")));
    }

    #[test]
    fn test_first_path_entry_wins() {
        let tree = TempTree::new("order");
        tree.executable("a", "tool");
        tree.executable("b", "tool");
        let search = format!(
            "{}:{}",
            tree.root.join("a").display(),
            tree.root.join("b").display()
        );
        let r = PathResolver;
        assert_eq!(
            r.resolve_in("tool", &search),
            Some(tree.root.join("a").join("tool"))
        );
    }

    #[test]
    fn test_non_executable_and_directories_are_misses() {
        let tree = TempTree::new("mode");
        tree.plain_file("a", "tool");
        fs::create_dir_all(tree.root.join("b").join("tool")).unwrap();
        tree.executable("c", "tool");
        let search = format!(
            "{}:{}:{}",
            tree.root.join("a").display(),
            tree.root.join("b").display(),
            tree.root.join("c").display()
        );
        let r = PathResolver;
        assert_eq!(
            r.resolve_in("tool", &search),
            Some(tree.root.join("c").join("tool"))
        );
    }

    #[test]
    fn test_empty_path_element_is_a_miss() {
        let r = PathResolver;
        assert_eq!(r.resolve_in("anything", ""), None);
        assert_eq!(r.resolve_in("anything", "::"), None);
    }

    #[test]
    fn test_miss_when_absent() {
        let tree = TempTree::new("miss");
        let search = tree.dir("a").display().to_string();
        let r = PathResolver;
        assert_eq!(r.resolve_in("nope", &search), None);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let tree = TempTree::new("det");
        tree.executable("a", "tool");
        let search = tree.root.join("a").display().to_string();
        let r = PathResolver;
        assert_eq!(r.resolve_in("tool", &search), r.resolve_in("tool", &search));
    }
}
