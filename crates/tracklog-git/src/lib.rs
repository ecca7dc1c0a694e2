// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tracklog-git: Git log retrieval and decoding for tracklog
//!
//! This library crate clones or opens a git repository, runs the sentinel-
//! delimited log query along the first-parent chain of the primary branch,
//! and decodes the output into [`Commit`] records in oldest-first order.
//!
//! # Example
//!
//! ```no_run
//! use tracklog_git::Repo;
//!
//! let repo = Repo::open(".").expect("open repo");
//! for commit in repo.log("master").expect("read log") {
//!     println!("{} - {}", commit.short_hash(), commit.subject());
//! }
//! ```

#![warn(missing_docs)]

pub mod commit;
pub mod decoder;
pub mod error;
pub mod repo;

pub use commit::Commit;
pub use decoder::{FIELD_SEPARATOR, RECORD_SEPARATOR, decode_log};
pub use error::GitError;
pub use repo::Repo;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::decoder::decode_log;
    pub use crate::error::GitError;
    pub use crate::repo::Repo;
}
