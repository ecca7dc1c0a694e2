// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Scenario tests for the commit processor
//!
//! These drive the full processing loop with an in-memory backend and a
//! recording fake commenter, pinning the run semantics: idempotent skips,
//! dry-run behavior, comment failure isolation, the comment budget, and the
//! fatality of processed-mark failures.

use std::cell::RefCell;

use similar_asserts::assert_eq;
use tracklog::process::{Commenter, ProcessError, ProcessOptions, process};
use tracklog_git::Commit;
use tracklog_store::{Backend, InMemoryStore, LeaseToken, StoreError};

// ============================================================================
// Test Doubles
// ============================================================================

/// Commenter that records every invocation and fails on request
#[derive(Default)]
struct RecordingCommenter {
    calls: RefCell<Vec<(i64, String)>>,
    fail_ids: Vec<i64>,
}

impl RecordingCommenter {
    fn failing_on(ids: &[i64]) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_ids: ids.to_vec(),
        }
    }

    fn commented_ids(&self) -> Vec<i64> {
        self.calls.borrow().iter().map(|(id, _)| *id).collect()
    }
}

impl Commenter for RecordingCommenter {
    fn comment(&self, entity_id: i64, message: &str) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push((entity_id, message.to_string()));
        if self.fail_ids.contains(&entity_id) {
            anyhow::bail!("simulated post failure for ticket {entity_id}");
        }
        Ok(())
    }
}

/// Backend wrapper that observes lifecycle calls and can inject failures
struct ObservedStore {
    inner: InMemoryStore,
    fail_mark_for: Option<String>,
    lease_held: bool,
    fail_extend: bool,
    extend_calls: usize,
    cancel_calls: usize,
}

impl ObservedStore {
    fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_mark_for: None,
            lease_held: false,
            fail_extend: false,
            extend_calls: 0,
            cancel_calls: 0,
        }
    }

    fn failing_mark_on(hash: &str) -> Self {
        Self {
            fail_mark_for: Some(hash.to_string()),
            ..Self::new()
        }
    }

    fn with_lease_held() -> Self {
        Self {
            lease_held: true,
            ..Self::new()
        }
    }

    fn failing_extend() -> Self {
        Self {
            fail_extend: true,
            ..Self::new()
        }
    }
}

impl Backend for ObservedStore {
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError> {
        if self.lease_held {
            return Err(StoreError::LeaseHeld {
                detail: "test marker".to_string(),
            });
        }
        self.inner.acquire_lease()
    }

    fn extend_lease(&mut self, token: &LeaseToken) -> Result<(), StoreError> {
        self.extend_calls += 1;
        if self.fail_extend {
            return Err(StoreError::StaleLease {
                token: token.to_string(),
            });
        }
        self.inner.extend_lease(token)
    }

    fn cancel_lease(&mut self) -> Result<(), StoreError> {
        self.cancel_calls += 1;
        self.inner.cancel_lease()
    }

    fn is_processed(&self, hash: &str) -> Result<bool, StoreError> {
        self.inner.is_processed(hash)
    }

    fn mark_processed(&mut self, hash: &str) -> Result<(), StoreError> {
        if self.fail_mark_for.as_deref() == Some(hash) {
            return Err(StoreError::InvalidConfig(
                "simulated mark failure".to_string(),
            ));
        }
        self.inner.mark_processed(hash)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn commit(hash: &str, body: &str) -> Commit {
    Commit {
        hash: hash.to_string(),
        body: body.to_string(),
        author_name: "Author".to_string(),
        author_email: "author@example.com".to_string(),
        timestamp: 1_500_000_000,
    }
}

fn options(dry_run: bool, max_comments: usize) -> ProcessOptions {
    ProcessOptions {
        commit_url_prefix: "https://example.com/commit/".to_string(),
        max_comments,
        dry_run,
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_live_run_comments_and_marks() {
    let commits = vec![
        commit("aaa", "TP-1893, TP-1895 setup TLS certificates"),
        commit("bbb", "no ticket here"),
    ];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    assert_eq!(commenter.commented_ids(), vec![1893, 1895]);
    assert!(store.is_processed("aaa").expect("query"));
    assert!(store.is_processed("bbb").expect("query"));
    assert_eq!(stats.commits_seen, 2);
    assert_eq!(stats.commits_processed, 2);
    assert_eq!(stats.comments_posted, 2);
    assert_eq!(stats.comment_failures, 0);
    assert_eq!(store.cancel_calls, 1);
}

#[test]
fn test_comment_message_carries_commit_context() {
    let commits = vec![commit("abc123", "TP-42 fix the build\n\nlong description")];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    let calls = commenter.calls.borrow();
    let (_, message) = &calls[0];
    assert!(message.contains("https://example.com/commit/abc123"));
    assert!(message.contains("author@example.com"));
    assert!(message.contains("TP-42 fix the build\n\nlong description"));
    // Sections are blank-line separated
    assert!(message.matches("\n\n").count() >= 3);
}

#[test]
fn test_dry_run_never_comments_but_still_marks() {
    let commits = vec![
        commit("aaa", "TP-100 work"),
        commit("bbb", "TP-200 more work"),
    ];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(true, 25)).expect("run");

    assert!(commenter.calls.borrow().is_empty());
    assert!(store.is_processed("aaa").expect("query"));
    assert!(store.is_processed("bbb").expect("query"));
    assert_eq!(stats.comments_posted, 0);
    assert_eq!(stats.commits_processed, 2);
}

#[test]
fn test_already_processed_commits_are_skipped() {
    let commits = vec![
        commit("aaa", "TP-100 work"),
        commit("bbb", "TP-200 more work"),
    ];
    let mut store = ObservedStore::new();
    store.mark_processed("aaa").expect("pre-mark");
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    // No re-extraction, no re-comment, no re-mark for the first commit
    assert_eq!(commenter.commented_ids(), vec![200]);
    assert_eq!(stats.commits_skipped, 1);
    assert_eq!(stats.commits_processed, 1);
}

#[test]
fn test_commit_with_no_references_is_still_marked() {
    let commits = vec![commit("aaa", "refactor only, no tickets")];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    assert!(commenter.calls.borrow().is_empty());
    assert!(store.is_processed("aaa").expect("query"));
    assert_eq!(stats.commits_processed, 1);
}

#[test]
fn test_single_comment_failure_does_not_abort_the_run() {
    let commits = vec![
        commit("aaa", "TP-1 TP-2 TP-3 batch"),
        commit("bbb", "TP-4 follow-up"),
    ];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::failing_on(&[2]);

    let stats = process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    // The failing id was attempted, the rest still went through
    assert_eq!(commenter.commented_ids(), vec![1, 2, 3, 4]);
    assert_eq!(stats.comments_posted, 3);
    assert_eq!(stats.comment_failures, 1);
    // A failed comment never blocks the processed mark
    assert!(store.is_processed("aaa").expect("query"));
    assert!(store.is_processed("bbb").expect("query"));
}

#[test]
fn test_budget_exhaustion_defers_later_commits() {
    let commits = vec![
        commit("aaa", "TP-1, TP-2 first commit"),
        commit("bbb", "TP-3 second commit"),
        commit("ccc", "TP-4 third commit"),
        commit("ddd", "no tickets referenced"),
    ];
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(false, 1)).expect("run");

    // The first commit's ids all go out; afterwards attempts (2) exceed the
    // budget (1), so later referencing commits are deferred unmarked for the
    // next run. A commit without references has nothing to post and is
    // marked regardless.
    assert_eq!(commenter.commented_ids(), vec![1, 2]);
    assert!(store.is_processed("aaa").expect("query"));
    assert!(!store.is_processed("bbb").expect("query"));
    assert!(!store.is_processed("ccc").expect("query"));
    assert!(store.is_processed("ddd").expect("query"));
    assert_eq!(stats.commits_deferred, 2);
    assert_eq!(stats.commits_processed, 2);
    assert_eq!(stats.comments_posted, 2);
}

#[test]
fn test_deferred_commits_are_picked_up_by_the_next_run() {
    let commits = vec![
        commit("aaa", "TP-1, TP-2 first commit"),
        commit("bbb", "TP-3 second commit"),
    ];
    let mut store = ObservedStore::new();

    let first = RecordingCommenter::default();
    process(&commits, &mut store, &first, &options(false, 1)).expect("first run");
    assert_eq!(first.commented_ids(), vec![1, 2]);

    let second = RecordingCommenter::default();
    process(&commits, &mut store, &second, &options(false, 1)).expect("second run");

    // The first commit is now skipped; the deferred one gets its comment
    assert_eq!(second.commented_ids(), vec![3]);
    assert!(store.is_processed("bbb").expect("query"));
}

#[test]
fn test_mark_failure_aborts_the_run() {
    let commits = vec![
        commit("aaa", "TP-1 first"),
        commit("bbb", "TP-2 second"),
        commit("ccc", "TP-3 third"),
    ];
    let mut store = ObservedStore::failing_mark_on("bbb");
    let commenter = RecordingCommenter::default();

    let err = process(&commits, &mut store, &commenter, &options(false, 25))
        .expect_err("mark failure must abort");

    match err {
        ProcessError::Mark { hash, .. } => assert_eq!(hash, "bbb"),
        other => panic!("expected Mark error, got {other:?}"),
    }
    // Comments already posted are not undone, the third commit is never
    // reached, and the lease is still released exactly once
    assert_eq!(commenter.commented_ids(), vec![1, 2]);
    assert!(store.is_processed("aaa").expect("query"));
    assert!(!store.is_processed("ccc").expect("query"));
    assert_eq!(store.cancel_calls, 1);
}

#[test]
fn test_held_lease_aborts_before_any_processing() {
    let commits = vec![commit("aaa", "TP-1 work")];
    let mut store = ObservedStore::with_lease_held();
    let commenter = RecordingCommenter::default();

    let err = process(&commits, &mut store, &commenter, &options(false, 25))
        .expect_err("held lease must abort");

    assert!(matches!(err, ProcessError::Lease(_)));
    assert!(commenter.calls.borrow().is_empty());
    assert!(!store.is_processed("aaa").expect("query"));
    // No lease was acquired, so none is cancelled
    assert_eq!(store.cancel_calls, 0);
}

#[test]
fn test_lease_is_extended_for_long_runs() {
    let commits: Vec<Commit> = (0..120)
        .map(|i| commit(&format!("hash-{i:03}"), "no tickets"))
        .collect();
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&commits, &mut store, &commenter, &options(false, 25)).expect("run");

    assert_eq!(stats.commits_processed, 120);
    // Extended at commits 50 and 100
    assert_eq!(store.extend_calls, 2);
}

#[test]
fn test_extension_failure_aborts_the_run() {
    let commits: Vec<Commit> = (0..60)
        .map(|i| commit(&format!("hash-{i:03}"), "no tickets"))
        .collect();
    let mut store = ObservedStore::failing_extend();
    let commenter = RecordingCommenter::default();

    let err = process(&commits, &mut store, &commenter, &options(false, 25))
        .expect_err("extension failure must abort");

    assert!(matches!(err, ProcessError::ExtendLease(_)));
    // The first 50 commits were marked before the extension was attempted;
    // the run stops there and the lease is still released exactly once
    assert!(store.is_processed("hash-049").expect("query"));
    assert!(!store.is_processed("hash-050").expect("query"));
    assert_eq!(store.extend_calls, 1);
    assert_eq!(store.cancel_calls, 1);
}

#[test]
fn test_empty_commit_list_completes_cleanly() {
    let mut store = ObservedStore::new();
    let commenter = RecordingCommenter::default();

    let stats = process(&[], &mut store, &commenter, &options(false, 25)).expect("run");

    assert_eq!(stats.commits_seen, 0);
    assert_eq!(store.cancel_calls, 1);
}
