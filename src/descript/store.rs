use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::codec::encoding;
use super::format::document;
use super::fs::{FileSystem, LocalFileSystem};
use super::mapping::{self, CommentMap};
use super::options::StoreOptions;
use super::types::error::{DescriptError, Result};
use super::types::models::{Dialect, DialectMode, Entry, TextEncoding};
use super::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreState {
    Unloaded,
    Loaded,
}

/// The comments of one directory, backed by its descript.ion file.
///
/// A store owns its mapping, dialect and encoding. Nothing is written until
/// [`save`](Self::save) is called.
///
/// # Example
/// ```no_run
/// # use descript_ion::DescriptionStore;
/// let mut store = DescriptionStore::open("/data/photos")?;
/// store.load()?;
/// store.set_comment("beach.jpg", "Summer 2024\nNice weather")?;
/// store.save()?;
/// # Ok::<(), descript_ion::DescriptError>(())
/// ```
#[derive(Debug)]
pub struct DescriptionStore<F: FileSystem = LocalFileSystem> {
    dir: PathBuf,
    path: PathBuf,
    options: StoreOptions,
    fs: F,

    entries: CommentMap,
    dialect: Dialect,
    /// `None` until a file is loaded; saves then default to UTF-8 with BOM.
    encoding: Option<TextEncoding>,
    state: StoreState,
}

impl DescriptionStore<LocalFileSystem> {
    /// Binds a store to `dir` with default options.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(dir, StoreOptions::default())
    }

    pub fn with_options(dir: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        Self::with_file_system(dir, options, LocalFileSystem)
    }
}

impl<F: FileSystem> DescriptionStore<F> {
    /// Binds a store to `dir`, doing all disk access through `fs`.
    ///
    /// # Errors
    /// `InvalidArgument` if `dir` is empty or the configured file name is
    /// empty or contains a path separator.
    pub fn with_file_system(dir: impl AsRef<Path>, options: StoreOptions, fs: F) -> Result<Self> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(DescriptError::InvalidArgument("Directory path is empty".to_string()));
        }
        if options.file_name.is_empty() || options.file_name.contains(['/', '\\']) {
            return Err(DescriptError::InvalidArgument(format!(
                "Invalid description file name: {:?}",
                options.file_name
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            path: dir.join(&options.file_name),
            dialect: options.initial_dialect(),
            options,
            fs,
            entries: CommentMap::new(),
            encoding: None,
            state: StoreState::Unloaded,
        })
    }

    /// Replaces the in-memory state with the content of the description file.
    ///
    /// Returns `false` when there is no file. That is not an error: the mapping
    /// is cleared, the encoding is unset and an `AutoDetect` request resolves
    /// to Total Commander.
    ///
    /// # Errors
    /// I/O failures are returned unchanged and leave the previous state intact.
    pub fn load(&mut self) -> Result<bool> {
        let Some(bytes) = self.fs.read_bytes(&self.path)? else {
            info!("No description file at {}", self.path.display());
            self.entries.clear();
            self.encoding = None;
            self.dialect = self.options.initial_dialect();
            self.state = StoreState::Loaded;
            return Ok(false);
        };

        let text_encoding = encoding::sniff(&bytes, self.options.fallback_encoding());
        debug!("Sniffed encoding {} for {}", text_encoding, self.path.display());
        let text = encoding::decode(&bytes, text_encoding);
        let eot_marker = encoding::eot_marker(text_encoding);
        let parsed = document::parse(&text, self.options.dialect, &eot_marker);

        if self.options.dialect == DialectMode::AutoDetect {
            debug!("Dialect auto-detected as {}", parsed.dialect);
        }
        info!(
            "Loaded {} entries from {} ({}, {}, {} dropped)",
            parsed.entries.len(),
            self.path.display(),
            text_encoding,
            parsed.dialect,
            parsed.dropped
        );

        self.entries = parsed.entries;
        self.dialect = parsed.dialect;
        self.encoding = Some(text_encoding);
        self.state = StoreState::Loaded;
        Ok(true)
    }

    /// The exact bytes [`save`](Self::save) would write.
    pub fn render(&self) -> Vec<u8> {
        let text_encoding = self.encoding.unwrap_or_default();
        let text = document::render(
            &self.entries,
            self.dialect,
            self.options.line_terminator,
            &encoding::eot_marker(text_encoding),
        );
        encoding::encode(&text, text_encoding)
    }

    /// Writes every entry to the description file, creating the directory
    /// if needed. An empty mapping produces an empty file, not a deletion.
    ///
    /// # Errors
    /// I/O failures are returned unchanged; the in-memory state is untouched.
    pub fn save(&self) -> Result<()> {
        let bytes = self.render();
        self.fs.write_bytes(&self.path, &bytes)?;
        info!(
            "Saved {} entries to {} ({}, {})",
            self.entries.len(),
            self.path.display(),
            self.encoding.unwrap_or_default(),
            self.dialect
        );
        Ok(())
    }

    /// Looks a comment up by name, ignoring case.
    pub fn get_comment(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.comment.as_str())
    }

    /// Sets or replaces a comment. CRLF and CR line breaks become `\n`.
    ///
    /// # Errors
    /// `InvalidArgument` if `name` is empty or contains a line break.
    pub fn set_comment(&mut self, name: &str, comment: &str) -> Result<()> {
        validate_name(name)?;
        self.entries
            .insert(Entry::new(name, utils::normalize_line_breaks(comment)));
        Ok(())
    }

    /// Removes a comment. Returns whether one was present.
    pub fn remove_comment(&mut self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.entries.remove(name).is_some())
    }

    /// Drops entries whose file or directory no longer exists.
    ///
    /// Existence is checked now, not cached. Returns the number removed.
    pub fn remove_orphaned_entries(&mut self) -> usize {
        let removed = self
            .entries
            .retain(|entry| self.fs.entry_exists(&self.dir, &entry.name));
        if removed > 0 {
            debug!("Removed {} orphaned entries from {}", removed, self.dir.display());
        }
        removed
    }

    /// Sorts entries by name with [`natural_name_order`](mapping::natural_name_order).
    pub fn sort(&mut self) {
        self.entries.sort_by(mapping::natural_name_order);
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&str, &str) -> Ordering) {
        self.entries.sort_by(compare);
    }

    pub fn entries(&self) -> &CommentMap {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether [`load`](Self::load) has completed at least once.
    pub fn is_loaded(&self) -> bool {
        self.state == StoreState::Loaded
    }

    /// The concrete dialect used by the next save.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Overrides the dialect for subsequent saves.
    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    /// The encoding detected by the last load, if a file was found.
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    /// Overrides the encoding for subsequent saves.
    ///
    /// # Errors
    /// `UnsupportedEncoding` for a `Legacy` encoding `encoding_rs` cannot
    /// encode into.
    pub fn set_encoding(&mut self, encoding: TextEncoding) -> Result<()> {
        if let TextEncoding::Legacy(legacy) = encoding {
            utils::check_legacy_encoding(legacy)?;
        }
        debug!("Encoding overridden to {}", encoding);
        self.encoding = Some(encoding);
        Ok(())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The bound directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the description file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DescriptError::InvalidArgument("Name is empty".to_string()));
    }
    if name.contains(['\r', '\n']) {
        return Err(DescriptError::InvalidArgument(format!(
            "Name contains a line break: {:?}",
            name
        )));
    }
    Ok(())
}
