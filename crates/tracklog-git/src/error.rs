// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tracklog-git

use thiserror::Error;

/// Errors that can occur during git operations and log decoding
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Repository has no working directory
    #[error("Repository at {path} is bare; a working directory is required")]
    BareRepository {
        /// The path of the bare repository
        path: String,
    },

    /// Cloning the repository failed
    #[error("Failed to clone {url}: {source}")]
    CloneFailed {
        /// The URL that was being cloned
        url: String,
        /// The underlying git2 error
        source: git2::Error,
    },

    /// The git log subprocess could not be spawned
    #[error("Failed to run git log: {source}")]
    LogCommand {
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The git log subprocess exited unsuccessfully
    #[error("git log of branch {branch} failed: {stderr}")]
    LogFailed {
        /// The branch that was being queried
        branch: String,
        /// Captured stderr from the git subprocess
        stderr: String,
    },

    /// The git log output was not valid UTF-8
    #[error("git log output was not valid UTF-8: {0}")]
    NonUtf8Output(#[from] std::string::FromUtf8Error),

    /// A log record did not split into the expected number of fields
    #[error("malformed log record (expected {expected} fields, found {found}): {record}")]
    MalformedRecord {
        /// The number of fields a record must have
        expected: usize,
        /// The number of fields actually found
        found: usize,
        /// A truncated snippet of the offending record
        record: String,
    },

    /// A log record carried an unparseable commit timestamp
    #[error("malformed timestamp {value:?} in log record: {record}")]
    MalformedTimestamp {
        /// The raw timestamp field
        value: String,
        /// A truncated snippet of the offending record
        record: String,
        /// The underlying parse error
        source: std::num::ParseIntError,
    },
}
