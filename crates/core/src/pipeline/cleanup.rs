use std::{
    fs::{create_dir_all, remove_dir, remove_file, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, warn};

/// Files written into the output directory by one job.
///
/// Unless [`commit`](Self::commit) is called, dropping the guard removes every
/// file written through it, and every directory the guard created on the way
/// to the output directory.
#[derive(Debug)]
pub(crate) struct OutputGuard {
    dir: PathBuf,
    /// Outermost directory that did not exist before the first write.
    created_root: Option<PathBuf>,
    written: Vec<PathBuf>,
    committed: bool,
}

impl OutputGuard {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), created_root: None, written: Vec::new(), committed: false }
    }

    pub fn write(&mut self, name: &str, data: &[u8]) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.dir.join(name);
        self.written.push(path.clone());
        write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn commit(&mut self) {
        self.committed = true;
    }

    fn ensure_dir(&mut self) -> Result<()> {
        if self.dir.is_dir() {
            return Ok(());
        }
        if self.created_root.is_none() {
            self.created_root = self
                .dir
                .ancestors()
                .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
                .last()
                .map(Path::to_path_buf);
        }
        create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create output directory: {}", self.dir.display())
        })
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.written {
            remove(path);
        }
        if let Some(root) = &self.created_root {
            remove_created_dirs(&self.dir, root);
        }
    }
}

/// Remove `dir` and its parents up to and including `root`, innermost first.
fn remove_created_dirs(dir: &Path, root: &Path) {
    for level in dir.ancestors() {
        if level.is_dir() {
            if let Err(err) = remove_dir(level) {
                warn!("Failed to remove {}: {err}", level.display());
                return;
            }
            debug!("Removed output directory {}", level.display());
        }
        if level == root {
            return;
        }
    }
}

fn remove(path: &Path) {
    if !path.exists() {
        return;
    }
    match remove_file(path) {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(err) => warn!("Failed to remove {}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncommitted_outputs_removed() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("out");
        let path = {
            let mut guard = OutputGuard::new(&dir);
            guard.write("merged_font.ttf", b"data").unwrap()
        };
        assert!(!path.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_nested_created_dirs_removed() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b").join("out");
        {
            let mut guard = OutputGuard::new(&dir);
            guard.write("merged_font.ttf", b"data").unwrap();
            assert!(dir.is_dir());
        }
        assert!(!root.path().join("a").exists());
        assert!(root.path().is_dir());
    }

    #[test]
    fn test_preexisting_parent_survives() {
        let root = tempfile::tempdir().unwrap();
        let parent = root.path().join("a");
        std::fs::create_dir(&parent).unwrap();
        let dir = parent.join("b").join("out");
        {
            let mut guard = OutputGuard::new(&dir);
            guard.write("merged_font.ttf", b"data").unwrap();
        }
        assert!(!parent.join("b").exists());
        assert!(parent.is_dir());
    }

    #[test]
    fn test_committed_outputs_kept() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let mut guard = OutputGuard::new(root.path());
            let path = guard.write("merged_font.ttf", b"data").unwrap();
            guard.commit();
            path
        };
        assert!(path.exists());
    }

    #[test]
    fn test_existing_dir_and_other_files_survive() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("keep.txt"), b"mine").unwrap();
        {
            let mut guard = OutputGuard::new(root.path());
            guard.write("merged_font.ttf", b"data").unwrap();
        }
        assert!(root.path().join("keep.txt").exists());
        assert!(!root.path().join("merged_font.ttf").exists());
    }
}
