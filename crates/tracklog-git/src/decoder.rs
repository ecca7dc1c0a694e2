// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Sentinel-delimited git log decoding
//!
//! Commit message bodies are unconstrained free text, so the log query
//! delimits fields and records with long hash-like sentinel tokens rather
//! than punctuation a body could plausibly contain. The decoder splits on
//! those sentinels and refuses to skip malformed records: a record that does
//! not decode almost always means the log format and the decoder have
//! drifted apart, which would corrupt every following record as well.

use crate::commit::Commit;
use crate::error::GitError;
use tracing::debug;

/// Sentinel placed between the six fields of one log record
pub const FIELD_SEPARATOR: &str = ":ec0c7bc17e1ef95b57f47e6ee9f63f54ac187325:";

/// Sentinel placed after the last field of each log record
pub const RECORD_SEPARATOR: &str = ":7e7dd4cbeda4c5f65b46e9d55ac526f63fa9a7c9:";

/// Fields per record: hash, body, author name, author email, date, timestamp
const RECORD_FIELDS: usize = 6;

/// Maximum length of the record snippet carried in decode errors
const SNIPPET_LEN: usize = 120;

/// Decode raw log output into an ordered sequence of commits
///
/// The log's own order is preserved. Chunks that trim to empty are
/// discarded; this covers trailing content after the final record separator
/// and the newline `git log --pretty=format:` inserts between records.
///
/// # Errors
///
/// Returns `GitError::MalformedRecord` if any record does not split into
/// exactly six fields, or `GitError::MalformedTimestamp` if a timestamp
/// field is not a base-10 signed integer. Either error fails the whole
/// batch.
pub fn decode_log(output: &str) -> Result<Vec<Commit>, GitError> {
    let mut commits = Vec::new();

    for chunk in output.split(RECORD_SEPARATOR) {
        if chunk.trim().is_empty() {
            continue;
        }
        commits.push(decode_record(chunk)?);
    }

    debug!(commits = commits.len(), "Decoded git log");
    Ok(commits)
}

/// Decode a single field-separated record
fn decode_record(record: &str) -> Result<Commit, GitError> {
    let parts: Vec<&str> = record.split(FIELD_SEPARATOR).collect();

    if parts.len() != RECORD_FIELDS {
        return Err(GitError::MalformedRecord {
            expected: RECORD_FIELDS,
            found: parts.len(),
            record: snippet(record),
        });
    }

    // parts[4] is the human-readable date; it exists for operators reading
    // the raw stream and is ignored in favour of the Unix timestamp.
    let raw_timestamp = parts[5].trim();
    let timestamp = raw_timestamp
        .parse::<i64>()
        .map_err(|source| GitError::MalformedTimestamp {
            value: raw_timestamp.to_string(),
            record: snippet(record),
            source,
        })?;

    Ok(Commit {
        hash: parts[0].trim().to_string(),
        body: parts[1].trim().to_string(),
        author_name: parts[2].trim().to_string(),
        author_email: parts[3].trim().to_string(),
        timestamp,
    })
}

/// Truncate a record to a printable snippet for error messages
fn snippet(record: &str) -> String {
    let trimmed = record.trim();
    if trimmed.len() <= SNIPPET_LEN {
        return trimmed.to_string();
    }
    let mut end = SNIPPET_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
