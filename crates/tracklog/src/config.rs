// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the tracklog CLI
//!
//! All process-wide settings live in one immutable `Config` value built at
//! startup and passed down; the processing code never reads ambient state.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tracklog_store::BackendKind;
use tracklog_targetprocess::Auth;

/// tracklog - comment on TargetProcess tickets referenced by git commits
#[derive(Parser, Debug, Clone)]
#[command(name = "tracklog")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Repository to process: a remote URL to clone or a local path to open
    #[arg(short, long, env = "TRACKLOG_REPO", default_value = ".")]
    pub repo: String,

    /// Branch whose first-parent history is walked, oldest first
    #[arg(short, long, env = "TRACKLOG_BRANCH", default_value = "master")]
    pub branch: String,

    /// Root address of the TargetProcess account,
    /// e.g. https://example.tpondemand.com
    #[arg(long, env = "TRACKLOG_TP_URL", default_value = "")]
    pub url: String,

    /// Username for TargetProcess basic authentication
    #[arg(long, env = "TRACKLOG_TP_USERNAME")]
    pub username: Option<String>,

    /// Password for TargetProcess basic authentication
    #[arg(long, env = "TRACKLOG_TP_PASSWORD")]
    pub password: Option<String>,

    /// TargetProcess access token (takes precedence over username/password)
    #[arg(long, env = "TRACKLOG_TP_TOKEN")]
    pub token: Option<String>,

    /// Backend recording which commits were already processed
    #[arg(long, value_enum, default_value_t = BackendChoice::LocalFile)]
    pub backend: BackendChoice,

    /// Backing file for the local-file backend
    #[arg(long, env = "TRACKLOG_BACKEND_FILE", default_value = "tracklog.processed")]
    pub backend_file: PathBuf,

    /// Base URL of the remote key/value backend
    #[arg(long, env = "TRACKLOG_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Dry run: report what would be commented without posting anything.
    /// Pass --dry-run=false to go live.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub dry_run: bool,

    /// Process only the commit with this hash
    #[arg(long)]
    pub hash: Option<String>,

    /// Maximum comment posts per run; commits over the budget are deferred
    /// to the next run
    #[arg(long, default_value_t = 25)]
    pub max_comments: usize,

    /// Prefix joined with a commit hash to form the commit URL in comments.
    /// Defaults to "{repo}/commit/" when the repo is a URL.
    #[arg(long)]
    pub commit_url_prefix: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Backend variants selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Durable newline-delimited file next to a .lock marker
    LocalFile,
    /// Durable remote key/value service
    Remote,
    /// Process-lifetime set, for externally serialized environments
    InMemory,
    /// Record nothing; every commit looks unprocessed
    NoOp,
}

impl From<BackendChoice> for BackendKind {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::LocalFile => BackendKind::LocalFile,
            BackendChoice::Remote => BackendKind::Remote,
            BackendChoice::InMemory => BackendKind::InMemory,
            BackendChoice::NoOp => BackendKind::NoOp,
        }
    }
}

impl Config {
    /// Whether the repo argument is a remote URL rather than a local path
    #[must_use]
    pub fn repo_is_url(&self) -> bool {
        self.repo.starts_with("http://")
            || self.repo.starts_with("https://")
            || self.repo.starts_with("git://")
            || self.repo.starts_with("ssh://")
    }

    /// The prefix joined with a commit hash to form the commit URL
    ///
    /// Falls back to `{repo}/commit/` for remote repos and to the bare hash
    /// for local paths.
    #[must_use]
    pub fn effective_commit_url_prefix(&self) -> String {
        if let Some(ref prefix) = self.commit_url_prefix {
            return prefix.clone();
        }
        if self.repo_is_url() {
            return format!("{}/commit/", self.repo.trim_end_matches('/'));
        }
        String::new()
    }

    /// The TargetProcess authentication method from the configured secrets
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when neither a token nor a
    /// username/password pair is configured.
    pub fn auth(&self) -> Result<Auth, ConfigError> {
        if let Some(ref token) = self.token {
            return Ok(Auth::Token {
                token: token.clone(),
            });
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            return Ok(Auth::Password {
                username: username.clone(),
                password: password.clone(),
            });
        }
        Err(ConfigError::MissingCredentials)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - live mode is requested without a TargetProcess URL or credentials
    /// - the remote backend is selected without a backend URL
    /// - only one of username/password is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_some() != self.password.is_some() {
            return Err(ConfigError::PartialCredentials);
        }

        if !self.dry_run {
            if self.url.is_empty() {
                return Err(ConfigError::MissingUrl);
            }
            self.auth()?;
        }

        if self.backend == BackendChoice::Remote && self.backend_url.is_none() {
            return Err(ConfigError::MissingBackendUrl);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Live mode without a TargetProcess URL
    #[error("a TargetProcess URL is required unless --dry-run=true")]
    MissingUrl,

    /// Live mode without any credentials
    #[error("TargetProcess credentials are required: --token, or --username and --password")]
    MissingCredentials,

    /// Only one half of a username/password pair was configured
    #[error("--username and --password must be set together")]
    PartialCredentials,

    /// Remote backend without a service URL
    #[error("--backend-url is required with --backend remote")]
    MissingBackendUrl,
}
