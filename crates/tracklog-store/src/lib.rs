// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tracklog-store: processed-set backends and run leasing
//!
//! This library crate records which commit hashes a run has already acted
//! upon, and enforces cross-process mutual exclusion through a cooperative
//! lease. Four backends implement one capability trait: a durable local
//! file, a remote key/value service, an in-memory set, and a no-op.
//!
//! # Example
//!
//! ```no_run
//! use tracklog_store::{Backend, local_file::LocalFileStore};
//!
//! let mut store = LocalFileStore::open("processed.txt").expect("open store");
//! let token = store.acquire_lease().expect("acquire lease");
//! if !store.is_processed("abc123").expect("query") {
//!     store.mark_processed("abc123").expect("mark");
//! }
//! store.extend_lease(&token).expect("extend");
//! store.cancel_lease().expect("cancel");
//! ```

#![warn(missing_docs)]

use std::fmt;
use std::path::Path;

use uuid::Uuid;

pub mod error;
pub mod local_file;
pub mod memory;
pub mod noop;
pub mod remote;

pub use error::StoreError;
pub use local_file::LocalFileStore;
pub use memory::InMemoryStore;
pub use noop::NoOpStore;
pub use remote::RemoteStore;

/// An opaque token proving a lease is held
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseToken(String);

impl LeaseToken {
    /// Generate a fresh token
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The token value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LeaseToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeaseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability surface over the processed-set, shared by every backend
///
/// The set grows monotonically and is owned exclusively by the store; all
/// mutation goes through [`Backend::mark_processed`]. The lease is a
/// cooperative cross-process exclusion marker: acquisition fails closed when
/// another run's marker is present.
pub trait Backend {
    /// Acquire the run lease, failing with `StoreError::LeaseHeld` if
    /// another run currently holds it
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LeaseHeld` when a lease marker already exists,
    /// or a backend-specific error when the marker cannot be created.
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError>;

    /// Renew or validate an already-held lease
    ///
    /// A no-op for local backends; remote backends round-trip to the
    /// service. Transient network failures are reported, not retried.
    ///
    /// # Errors
    ///
    /// Returns an error when the lease can no longer be confirmed.
    fn extend_lease(&mut self, token: &LeaseToken) -> Result<(), StoreError>;

    /// Release the lease, flushing pending state for durable backends
    ///
    /// Safe to call even when nothing was marked during the run.
    ///
    /// # Errors
    ///
    /// Returns an error when pending state cannot be flushed or the marker
    /// cannot be removed.
    fn cancel_lease(&mut self) -> Result<(), StoreError>;

    /// Whether the given commit hash has already been processed
    ///
    /// # Errors
    ///
    /// Returns a backend-specific error when the query cannot be answered.
    fn is_processed(&self, hash: &str) -> Result<bool, StoreError>;

    /// Record the given commit hash as processed
    ///
    /// # Errors
    ///
    /// Returns a backend-specific error when the hash cannot be recorded.
    fn mark_processed(&mut self, hash: &str) -> Result<(), StoreError>;
}

/// Backend variants selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Durable newline-delimited file with a `.lock` marker
    LocalFile,
    /// Durable remote key/value service over HTTP
    Remote,
    /// Process-lifetime set with trivially succeeding leases
    InMemory,
    /// Never processed, marks discarded
    NoOp,
}

/// Construct a backend from configuration
///
/// `file` is required for the local-file variant and `url` for the remote
/// variant; the other variants ignore both.
///
/// # Errors
///
/// Returns `StoreError::InvalidConfig` when a required parameter is missing,
/// or the variant's own error when it cannot be opened.
pub fn from_config(
    kind: BackendKind,
    file: Option<&Path>,
    url: Option<&str>,
) -> Result<Box<dyn Backend>, StoreError> {
    match kind {
        BackendKind::LocalFile => {
            let path = file.ok_or_else(|| {
                StoreError::InvalidConfig("local-file backend requires a file path".to_string())
            })?;
            Ok(Box::new(LocalFileStore::open(path)?))
        }
        BackendKind::Remote => {
            let url = url.ok_or_else(|| {
                StoreError::InvalidConfig("remote backend requires a service URL".to_string())
            })?;
            Ok(Box::new(RemoteStore::new(url)?))
        }
        BackendKind::InMemory => Ok(Box::new(InMemoryStore::new())),
        BackendKind::NoOp => Ok(Box::new(NoOpStore)),
    }
}
