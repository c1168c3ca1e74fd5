//! One-call helpers that take the path of a commented file or folder.
//!
//! Each call splits the path into (parent directory, leaf name), binds a
//! short-lived [`DescriptionStore`] to the parent, loads it, and saves only
//! when the mapping actually changed.

use std::path::Path;

use log::debug;

use super::options::StoreOptions;
use super::store::DescriptionStore;
use super::types::error::{DescriptError, Result};

fn split_path(path: &Path) -> Result<(&Path, &str)> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            DescriptError::InvalidArgument(format!("Path has no usable file name: {}", path.display()))
        })?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, name))
}

/// Reads the comment attached to `path`, if any.
pub fn read_comment(path: impl AsRef<Path>) -> Result<Option<String>> {
    read_comment_with(path, StoreOptions::default())
}

pub fn read_comment_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Option<String>> {
    let (dir, name) = split_path(path.as_ref())?;
    let mut store = DescriptionStore::with_options(dir, options)?;
    store.load()?;
    Ok(store.get_comment(name).map(str::to_string))
}

/// Attaches `comment` to `path`, creating the description file if needed.
pub fn write_comment(path: impl AsRef<Path>, comment: &str) -> Result<()> {
    write_comment_with(path, comment, StoreOptions::default())
}

pub fn write_comment_with(path: impl AsRef<Path>, comment: &str, options: StoreOptions) -> Result<()> {
    let (dir, name) = split_path(path.as_ref())?;
    let mut store = DescriptionStore::with_options(dir, options)?;
    store.load()?;
    if store.get_comment(name) == Some(comment) {
        debug!("Comment for {} unchanged, not saving", name);
        return Ok(());
    }
    store.set_comment(name, comment)?;
    store.save()
}

/// Removes the comment attached to `path`. Returns whether one existed.
pub fn remove_comment(path: impl AsRef<Path>) -> Result<bool> {
    remove_comment_with(path, StoreOptions::default())
}

pub fn remove_comment_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<bool> {
    let (dir, name) = split_path(path.as_ref())?;
    let mut store = DescriptionStore::with_options(dir, options)?;
    if !store.load()? {
        return Ok(false);
    }
    let removed = store.remove_comment(name)?;
    if removed {
        store.save()?;
    }
    Ok(removed)
}
