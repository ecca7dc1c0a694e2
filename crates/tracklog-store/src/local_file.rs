// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Durable local-file backend
//!
//! The backing store is a plain text file, one processed hash per line, in
//! no guaranteed order. A companion `.lock` file next to it is the lease
//! marker: its mere existence means the set is leased, its content is
//! irrelevant. Marks accumulate in an in-memory mirror that is flushed to
//! disk only when the lease is cancelled, so a crash mid-run re-processes
//! the whole run rather than silently losing part of it.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::{Backend, LeaseToken};

/// Suffix appended to the backing path to derive the lock-marker path
const LOCK_SUFFIX: &str = ".lock";

/// Processed-set backend over a newline-delimited local file
pub struct LocalFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    hashes: HashSet<String>,
}

impl LocalFileStore {
    /// Open the store, loading any existing backing file
    ///
    /// A missing backing file loads as an empty set, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backing file exists but cannot be
    /// read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let lock_path = lock_path_for(&path);
        let hashes = load_hashes(&path)?;

        debug!(path = %path.display(), hashes = hashes.len(), "Opened local file store");
        Ok(Self {
            path,
            lock_path,
            hashes,
        })
    }

    /// The backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lock-marker path derived from the backing path
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Backend for LocalFileStore {
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError> {
        // create_new fails closed when the marker already exists, even if
        // two runs race on the check
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.lock_path)
        {
            Ok(_) => {
                info!(lock = %self.lock_path.display(), "Acquired run lease");
                Ok(LeaseToken::new())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StoreError::LeaseHeld {
                detail: self.lock_path.display().to_string(),
            }),
            Err(e) => Err(StoreError::io("create lock marker", &self.lock_path, e)),
        }
    }

    fn extend_lease(&mut self, _token: &LeaseToken) -> Result<(), StoreError> {
        // The lock marker does not expire; holding it is the lease.
        Ok(())
    }

    fn cancel_lease(&mut self) -> Result<(), StoreError> {
        save_hashes(&self.path, &self.hashes)?;

        match fs::remove_file(&self.lock_path) {
            Ok(()) => {}
            // Tolerated so cancel stays safe after a failed acquisition
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io("remove lock marker", &self.lock_path, e)),
        }

        info!(
            path = %self.path.display(),
            hashes = self.hashes.len(),
            "Flushed processed set and released lease"
        );
        Ok(())
    }

    fn is_processed(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.hashes.contains(hash))
    }

    fn mark_processed(&mut self, hash: &str) -> Result<(), StoreError> {
        self.hashes.insert(hash.to_string());
        Ok(())
    }
}

/// Derive the lock-marker path from the backing path
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Load the backing file into a set; a missing file is an empty set
fn load_hashes(path: &Path) -> Result<HashSet<String>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(StoreError::io("read processed set", path, e)),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rewrite the backing file from the in-memory set, one hash per line
fn save_hashes(path: &Path, hashes: &HashSet<String>) -> Result<(), StoreError> {
    let mut content = String::with_capacity(hashes.len() * 41);
    for hash in hashes {
        content.push_str(hash);
        content.push('\n');
    }

    fs::write(path, content).map_err(|e| StoreError::io("write processed set", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_lock_path_appends_suffix() {
        let lock = lock_path_for(Path::new("/tmp/processed.txt"));
        assert_eq!(lock, PathBuf::from("/tmp/processed.txt.lock"));
    }

    #[test]
    fn test_missing_backing_file_is_empty_set() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LocalFileStore::open(dir.path().join("absent.txt")).expect("open");
        assert!(!store.is_processed("abc").expect("query"));
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("processed.txt");
        fs::write(&path, "abc\n\n  \ndef\n").expect("write");

        let store = LocalFileStore::open(&path).expect("open");
        assert!(store.is_processed("abc").expect("query"));
        assert!(store.is_processed("def").expect("query"));
        assert!(!store.is_processed("").expect("query"));
    }
}
