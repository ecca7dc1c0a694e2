// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Composition of one tracklog run
//!
//! Builds the collaborators the processor needs - repository, processed-set
//! backend, commenter - from the configuration, and hands them to
//! [`process`](crate::process::process).

use anyhow::{Context, bail};
use tracing::{info, warn};

use tracklog_git::Repo;
use tracklog_targetprocess::Api;

use crate::config::Config;
use crate::process::{Commenter, ProcessOptions, RunStats, process};

/// Commenter backed by the TargetProcess API
struct TargetProcessCommenter(Api);

impl Commenter for TargetProcessCommenter {
    fn comment(&self, entity_id: i64, message: &str) -> anyhow::Result<()> {
        self.0.comment(entity_id, message)?;
        Ok(())
    }
}

/// Commenter used in dry-run mode; the processor never invokes it
struct DisabledCommenter;

impl Commenter for DisabledCommenter {
    fn comment(&self, _entity_id: i64, _message: &str) -> anyhow::Result<()> {
        bail!("commenting is disabled in dry-run mode")
    }
}

/// Execute one run against the configured repository and backend
///
/// # Errors
///
/// Returns an error for invalid configuration, repository/log failures,
/// backend failures, and fatal processing errors (lease, mark). Individual
/// comment-post failures do not fail the run; they are reported in the
/// returned stats.
pub fn run(config: &Config) -> anyhow::Result<RunStats> {
    config.validate()?;

    let repo = if config.repo_is_url() {
        Repo::clone(&config.repo).with_context(|| format!("cloning {}", config.repo))?
    } else {
        Repo::open(&config.repo).with_context(|| format!("opening {}", config.repo))?
    };

    let mut commits = repo
        .log(&config.branch)
        .with_context(|| format!("reading the log of branch {}", config.branch))?;
    info!(
        branch = %config.branch,
        commits = commits.len(),
        "Read commit log"
    );

    if let Some(ref hash) = config.hash {
        commits.retain(|c| &c.hash == hash);
        if commits.is_empty() {
            warn!(hash = %hash, "No commit in the log matches the hash filter");
        }
    }

    let mut store = tracklog_store::from_config(
        config.backend.into(),
        Some(config.backend_file.as_path()),
        config.backend_url.as_deref(),
    )
    .context("constructing the processed-set backend")?;

    let commenter: Box<dyn Commenter> = if config.dry_run {
        Box::new(DisabledCommenter)
    } else {
        let api = Api::new(&config.url, config.auth()?).context("building TargetProcess client")?;
        Box::new(TargetProcessCommenter(api))
    };

    let options = ProcessOptions {
        commit_url_prefix: config.effective_commit_url_prefix(),
        max_comments: config.max_comments,
        dry_run: config.dry_run,
    };

    let stats = process(&commits, store.as_mut(), commenter.as_ref(), &options)?;
    Ok(stats)
}
