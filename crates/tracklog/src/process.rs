// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The idempotent commit-processing loop
//!
//! Takes commits in oldest-first order (an ordering established by the log
//! query and preserved here, never recomputed), skips the ones a previous
//! run already handled, posts one comment per referenced ticket, and marks
//! each completed commit in the processed-set store. The whole run happens
//! under the store's lease: acquired before the first commit, cancelled
//! exactly once afterwards, also when the run aborts.
//!
//! Failure semantics follow the severity of what broke. A single failed
//! comment post is logged and counted, and the run moves on: the external
//! system sees at-least-once delivery. A failed processed-mark aborts the
//! whole run: continuing would risk commenting the same commit again on
//! every future run.

use thiserror::Error;
use tracing::{debug, info, warn};

use tracklog_git::Commit;
use tracklog_store::{Backend, LeaseToken, StoreError};

use crate::extract::extract;

/// How many commits are iterated between lease extensions
const LEASE_EXTEND_INTERVAL: usize = 50;

/// Capability the processor uses to post a ticket comment
///
/// Authentication, transport, and response-status mapping belong to the
/// implementation; the processor only sees success or failure per id.
pub trait Commenter {
    /// Post `message` as a comment on the ticket with the given id
    ///
    /// # Errors
    ///
    /// Returns an error when the comment could not be posted; the processor
    /// logs it and continues with the remaining ids.
    fn comment(&self, entity_id: i64, message: &str) -> anyhow::Result<()>;
}

/// Fatal processing errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The run lease could not be acquired
    #[error("failed to acquire run lease: {0}")]
    Lease(#[source] StoreError),

    /// The run lease could not be extended mid-run
    #[error("failed to extend run lease: {0}")]
    ExtendLease(#[source] StoreError),

    /// The store could not answer a processed-set query
    #[error("failed to query processed state of {hash}: {source}")]
    Query {
        /// The commit hash being queried
        hash: String,
        /// The underlying store error
        source: StoreError,
    },

    /// The store could not record a processed mark
    #[error("failed to mark {hash} as processed: {source}")]
    Mark {
        /// The commit hash being marked
        hash: String,
        /// The underlying store error
        source: StoreError,
    },

    /// The lease could not be released after a completed run
    #[error("failed to release run lease: {0}")]
    CancelLease(#[source] StoreError),
}

/// Immutable per-run options, built once from the CLI configuration
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Prefix joined with a commit hash to form the commit URL in comments
    pub commit_url_prefix: String,
    /// Comment budget: once attempts exceed this, later commits are deferred
    pub max_comments: usize,
    /// When set, no comments are posted but commits are still marked
    pub dry_run: bool,
}

/// Statistics from one processing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Commits iterated
    pub commits_seen: usize,
    /// Commits skipped because a previous run already processed them
    pub commits_skipped: usize,
    /// Commits marked processed by this run
    pub commits_processed: usize,
    /// Commits left unmarked because the comment budget was exhausted
    pub commits_deferred: usize,
    /// Comments successfully posted
    pub comments_posted: usize,
    /// Comment posts that failed and were skipped
    pub comment_failures: usize,
}

/// Process commits under the store's lease
///
/// Acquires the lease (fatal if it is already held), iterates the commits,
/// and cancels the lease exactly once, also on the abort path. A cancel
/// failure after an otherwise successful run is a run-level error; after an
/// aborted run it is logged and the original error is returned.
///
/// # Errors
///
/// Returns `ProcessError` for lease acquisition/extension failures, store
/// query/mark failures, and cancel failures. Individual comment-post
/// failures are absorbed into [`RunStats::comment_failures`].
pub fn process(
    commits: &[Commit],
    store: &mut dyn Backend,
    commenter: &dyn Commenter,
    options: &ProcessOptions,
) -> Result<RunStats, ProcessError> {
    let token = store.acquire_lease().map_err(ProcessError::Lease)?;

    let outcome = run_commits(commits, store, commenter, &token, options);
    let cancel = store.cancel_lease();

    match (outcome, cancel) {
        (Ok(stats), Ok(())) => {
            info!(
                seen = stats.commits_seen,
                skipped = stats.commits_skipped,
                processed = stats.commits_processed,
                deferred = stats.commits_deferred,
                posted = stats.comments_posted,
                failed = stats.comment_failures,
                "Run complete"
            );
            Ok(stats)
        }
        (Ok(_), Err(e)) => Err(ProcessError::CancelLease(e)),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cancel_err)) => {
            warn!(error = %cancel_err, "Failed to release lease after aborted run");
            Err(e)
        }
    }
}

/// Iterate the commits; fatal errors abort, comment failures do not
fn run_commits(
    commits: &[Commit],
    store: &mut dyn Backend,
    commenter: &dyn Commenter,
    token: &LeaseToken,
    options: &ProcessOptions,
) -> Result<RunStats, ProcessError> {
    let mut stats = RunStats::default();
    let mut attempts = 0usize;

    for (idx, commit) in commits.iter().enumerate() {
        if idx > 0 && idx % LEASE_EXTEND_INTERVAL == 0 {
            store
                .extend_lease(token)
                .map_err(ProcessError::ExtendLease)?;
        }

        stats.commits_seen += 1;

        let processed = store
            .is_processed(&commit.hash)
            .map_err(|source| ProcessError::Query {
                hash: commit.hash.clone(),
                source,
            })?;
        if processed {
            debug!(hash = %commit.short_hash(), "Already processed, skipping");
            stats.commits_skipped += 1;
            continue;
        }

        // Zero ids is not an error; the commit is still marked below
        let ids = extract(&commit.body);

        if options.dry_run {
            if !ids.is_empty() {
                info!(
                    hash = %commit.short_hash(),
                    ids = ?ids,
                    "Dry run: would comment"
                );
            }
        } else if !ids.is_empty() {
            // Budget check at commit granularity, so a commit's ids are
            // never half-posted. Deferred commits stay unmarked and the
            // next run posts their comments.
            if attempts > options.max_comments {
                debug!(hash = %commit.short_hash(), "Comment budget exhausted, deferring");
                stats.commits_deferred += 1;
                continue;
            }

            let message = comment_message(commit, &options.commit_url_prefix);
            for &id in &ids {
                attempts += 1;
                match commenter.comment(id, &message) {
                    Ok(()) => {
                        info!(hash = %commit.short_hash(), ticket = id, "Posted comment");
                        stats.comments_posted += 1;
                    }
                    Err(e) => {
                        warn!(
                            hash = %commit.short_hash(),
                            ticket = id,
                            error = format!("{e:#}"),
                            "Failed to post comment, continuing"
                        );
                        stats.comment_failures += 1;
                    }
                }
            }
        }

        store
            .mark_processed(&commit.hash)
            .map_err(|source| ProcessError::Mark {
                hash: commit.hash.clone(),
                source,
            })?;
        stats.commits_processed += 1;
    }

    Ok(stats)
}

/// Build the comment message for a commit
///
/// Commit URL, calendar date, author email, and the full body, separated by
/// blank lines.
fn comment_message(commit: &Commit, commit_url_prefix: &str) -> String {
    format!(
        "Commit: {prefix}{hash}\n\nDate: {date}\n\nAuthor: {email}\n\n{body}",
        prefix = commit_url_prefix,
        hash = commit.hash,
        date = commit.date().to_rfc2822(),
        email = commit.author_email,
        body = commit.body,
    )
}
