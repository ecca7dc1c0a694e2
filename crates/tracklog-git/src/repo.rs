// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access and the git log query
//!
//! Repositories are cloned or opened through the `git2` crate. The log
//! query itself shells out to the `git` binary: libgit2 has no equivalent
//! of `--pretty=format:`, and the sentinel-delimited stream is exactly what
//! that flag produces.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};
use uuid::Uuid;

use crate::commit::Commit;
use crate::decoder::{FIELD_SEPARATOR, RECORD_SEPARATOR, decode_log};
use crate::error::GitError;

/// A git repository the log query can be run against
///
/// Cloned repositories live in a unique directory under the system temp
/// directory and are removed when the value is dropped.
pub struct Repo {
    workdir: PathBuf,
    /// Set only for cloned repositories; removed on drop
    temp_dir: Option<PathBuf>,
}

impl Repo {
    /// Open an existing repository at or above the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not inside a
    /// git repository, or `GitError::BareRepository` if the repository has
    /// no working directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = git2::Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::BareRepository {
                path: path.display().to_string(),
            })?
            .to_path_buf();

        Ok(Self {
            workdir,
            temp_dir: None,
        })
    }

    /// Clone a remote repository into a unique temporary directory
    ///
    /// # Errors
    ///
    /// Returns `GitError::CloneFailed` if the clone does not complete.
    pub fn clone(url: &str) -> Result<Self, GitError> {
        let dest = std::env::temp_dir().join(format!("tracklog-{}", Uuid::new_v4()));

        info!(url, dest = %dest.display(), "Cloning repository");
        git2::build::RepoBuilder::new()
            .clone(url, &dest)
            .map_err(|source| GitError::CloneFailed {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            workdir: dest.clone(),
            temp_dir: Some(dest),
        })
    }

    /// The working directory of the repository
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Read the commit log of a branch, oldest first
    ///
    /// Runs `git log --first-parent --reverse` over the given branch with
    /// the sentinel-delimited pretty format and decodes the output. The
    /// first-parent, oldest-first ordering is established here and must be
    /// preserved, never recomputed, by downstream consumers.
    ///
    /// # Errors
    ///
    /// Returns an error if the subprocess cannot run, exits unsuccessfully,
    /// emits non-UTF-8 output, or produces a stream that fails to decode.
    pub fn log(&self, branch: &str) -> Result<Vec<Commit>, GitError> {
        let output = Command::new("git")
            .args(["--no-pager", "log", "--first-parent", branch, "--reverse"])
            .arg(format!("--pretty=format:{}", log_format()))
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::LogCommand { source })?;

        if !output.status.success() {
            return Err(GitError::LogFailed {
                branch: branch.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        debug!(branch, bytes = text.len(), "Read git log");
        decode_log(&text)
    }
}

impl Drop for Repo {
    fn drop(&mut self) {
        if let Some(ref temp_dir) = self.temp_dir {
            let _ = fs::remove_dir_all(temp_dir);
        }
    }
}

/// Build the `--pretty=format:` string from the sentinel constants
fn log_format() -> String {
    format!(
        "%H{fs}%B{fs}%aN{fs}%aE{fs}%ad{fs}%at{rs}",
        fs = FIELD_SEPARATOR,
        rs = RECORD_SEPARATOR,
    )
}
