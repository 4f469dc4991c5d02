//! Per-book reading position and the last opened book.
//!
//! Each book gets a directory under the configured cache root named by a
//! hash of its path, so arbitrary file names never reach the filesystem.
//! Positions are tiny TOML files; write failures are logged and ignored.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const POSITION_FILE: &str = "position.toml";
const LAST_BOOK_FILE: &str = "last-book.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPosition {
    pub section: usize,
    /// Ordinal of the last activated word unit within the section.
    #[serde(default)]
    pub unit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
struct LastBook {
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BookCache {
    root: PathBuf,
}

impl BookCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hash_dir(&self, book: &Path) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(book.as_os_str().to_string_lossy().as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(hash)
    }

    pub fn load_position(&self, book: &Path) -> Option<ReadingPosition> {
        let path = self.hash_dir(book).join(POSITION_FILE);
        let data = fs::read_to_string(path).ok()?;
        toml::from_str(&data).ok()
    }

    pub fn save_position(&self, book: &Path, position: ReadingPosition) {
        let path = self.hash_dir(book).join(POSITION_FILE);
        write_toml(&path, &position);
        debug!(book = %book.display(), section = position.section, unit = ?position.unit, "Saved position");
    }

    pub fn load_last_book(&self) -> Option<PathBuf> {
        let data = fs::read_to_string(self.root.join(LAST_BOOK_FILE)).ok()?;
        let entry: LastBook = toml::from_str(&data).ok()?;
        Some(entry.path)
    }

    pub fn save_last_book(&self, book: &Path) {
        let entry = LastBook {
            path: book.to_path_buf(),
        };
        write_toml(&self.root.join(LAST_BOOK_FILE), &entry);
    }
}

fn write_toml<T: Serialize>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "Failed to create cache dir: {err}");
            return;
        }
    }
    match toml::to_string(value) {
        Ok(contents) => {
            if let Err(err) = fs::write(path, contents) {
                warn!(path = %path.display(), "Failed to write cache file: {err}");
            }
        }
        Err(err) => warn!("Failed to serialize cache entry: {err}"),
    }
}
