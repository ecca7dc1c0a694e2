// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tracklog-store

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur against a processed-set backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another run's lease marker is present
    #[error("lease already held: {detail}")]
    LeaseHeld {
        /// What marker blocked acquisition (lock path or remote set)
        detail: String,
    },

    /// The presented lease token is no longer valid
    #[error("lease token {token} is no longer valid")]
    StaleLease {
        /// The rejected token value
        token: String,
    },

    /// A filesystem operation failed
    #[error("failed to {op} {path}: {source}")]
    Io {
        /// The operation that failed
        op: &'static str,
        /// The file the operation targeted
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A request to the remote service failed in transport
    #[error("remote store request failed: {0}")]
    Remote(#[from] reqwest::Error),

    /// The remote service answered with an unexpected status
    #[error("remote store {op} returned unexpected status {status}")]
    UnexpectedStatus {
        /// The operation that was attempted
        op: &'static str,
        /// The HTTP status code received
        status: u16,
    },

    /// The backend configuration is incomplete or contradictory
    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Wrap an I/O error with operation and target-path context
    #[must_use]
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
