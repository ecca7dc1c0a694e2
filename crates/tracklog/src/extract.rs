// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Ticket reference extraction from commit message bodies
//!
//! A reference is a numeric run immediately preceded, on the same line, by
//! the case-insensitive literal `TP` (optionally followed by one separator:
//! a hyphen, a colon, or a run of spaces), or by a `#` at the start of a
//! line. The leading-`#` restriction keeps "pull request #34" mentions
//! mid-line from turning into ticket ids.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `TP-123`, `TP 123`, `Tp:123`, `TP123`, and line-leading `#123`
static TICKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:\btp(?:-|:| +)?|^#)(\d+)").expect("ticket pattern compiles")
});

/// Extract the deduplicated, first-occurrence-ordered ticket ids from a
/// commit message body
///
/// The whole multi-line body is scanned. Numeric literals that overflow
/// `i64` are dropped per match; they never fail the scan.
#[must_use]
pub fn extract(body: &str) -> Vec<i64> {
    let mut ids = Vec::new();

    for captures in TICKET_PATTERN.captures_iter(body) {
        // Overflowing literals are not ticket ids; skip the match
        let Ok(id) = captures[1].parse::<i64>() else {
            continue;
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    ids
}
