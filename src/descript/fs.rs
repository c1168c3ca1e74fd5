//! File-system boundary used by the store.
//!
//! The store never touches `std::fs` directly; it goes through [`FileSystem`]
//! so tests and embedders can substitute their own storage.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use log::trace;

/// Raw byte access beneath the codec.
pub trait FileSystem {
    /// Reads a whole file. `Ok(None)` when it does not exist.
    fn read_bytes(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Replaces a file's content, creating parent directories as needed.
    ///
    /// Must not fail merely because an existing target is marked hidden.
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Whether `name` exists as a file or directory directly under `dir`.
    ///
    /// Names that are not a single path component (absolute paths, `..`,
    /// anything with a separator) never exist.
    fn entry_exists(&self, dir: &Path, name: &str) -> bool;
}

/// Whether `name` can only resolve to a direct child of a directory.
pub fn is_leaf_name(name: &str) -> bool {
    if name.is_empty() || name.chars().any(std::path::is_separator) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_bytes(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Open existing files with neither a create nor a truncate disposition
        // (OPEN_EXISTING on Windows). TRUNCATE_EXISTING and CREATE_ALWAYS are
        // refused for hidden files, so the content is cut with set_len instead.
        let mut file = match OpenOptions::new().write(true).open(path) {
            Ok(file) => {
                file.set_len(0)?;
                file
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("Creating {}", path.display());
                OpenOptions::new().write(true).create_new(true).open(path)?
            }
            Err(e) => return Err(e),
        };
        file.write_all(bytes)?;
        file.flush()
    }

    fn entry_exists(&self, dir: &Path, name: &str) -> bool {
        if !is_leaf_name(name) {
            trace!("{:?} is not a plain entry name", name);
            return false;
        }
        dir.join(name).try_exists().unwrap_or(false)
    }
}

/// In-memory [`FileSystem`] for tests and sandboxed callers.
///
/// Paths are compared exactly; directory entries are registered explicitly
/// or implied by stored files.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<HashSet<PathBuf>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a file with the given content.
    pub fn with_file(self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.borrow_mut().insert(path.into(), bytes.into());
        self
    }

    /// Registers a directory so [`FileSystem::entry_exists`] can see it.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    /// Makes every subsequent read fail with `PermissionDenied`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes every subsequent write fail with `PermissionDenied`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let removed_file = self.files.borrow_mut().remove(path).is_some();
        let removed_dir = self.dirs.borrow_mut().remove(path);
        removed_file || removed_dir
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_bytes(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        if self.fail_reads.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read of {} refused", path.display()),
            ));
        }
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write to {} refused", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            self.dirs.borrow_mut().insert(parent.to_path_buf());
        }
        self.files.borrow_mut().insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn entry_exists(&self, dir: &Path, name: &str) -> bool {
        if !is_leaf_name(name) {
            return false;
        }
        let path = dir.join(name);
        self.files.borrow().contains_key(&path) || self.dirs.borrow().contains(&path)
    }
}
