//! Git commit types and operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single decoded commit from the git log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit hash (hex string)
    pub hash: String,
    /// Full commit message body
    pub body: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp as Unix seconds
    pub timestamp: i64,
}

impl Commit {
    /// Validate that a hash is a 40-character hex string
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..7.min(self.hash.len())]
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.body.lines().next().unwrap_or("")
    }

    /// Convert the Unix timestamp into a calendar timestamp
    ///
    /// Timestamps outside the representable range fall back to the epoch.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy to generate valid 40-character hex hash strings
    fn hash_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[0-9a-f]{40}").expect("valid regex")
    }

    /// Strategy to generate arbitrary Commit values
    fn commit_strategy() -> impl Strategy<Value = Commit> {
        (
            hash_strategy(),
            ".*",                      // body
            "[A-Za-z ]{1,50}",         // author name
            "[a-z]+@[a-z]+\\.[a-z]+",  // author email
            0i64..2_000_000_000i64,    // timestamp as unix seconds
        )
            .prop_map(|(hash, body, author_name, author_email, timestamp)| Commit {
                hash,
                body,
                author_name,
                author_email,
                timestamp,
            })
    }

    proptest! {
        /// Property: Any generated Commit should have a valid hash
        #[test]
        fn prop_commit_hash_is_valid(commit in commit_strategy()) {
            prop_assert!(Commit::is_valid_hash(&commit.hash));
        }

        /// Property: short_hash returns between 1 and 7 characters
        #[test]
        fn prop_short_hash_length(commit in commit_strategy()) {
            let short = commit.short_hash();
            prop_assert!(short.len() <= 7);
            prop_assert!(!short.is_empty());
        }

        /// Property: subject is always a prefix of the body
        #[test]
        fn prop_subject_is_prefix_of_body(commit in commit_strategy()) {
            prop_assert!(commit.body.starts_with(commit.subject()));
        }

        /// Property: date round-trips the in-range Unix timestamp
        #[test]
        fn prop_date_roundtrips_timestamp(commit in commit_strategy()) {
            prop_assert_eq!(commit.date().timestamp(), commit.timestamp);
        }
    }
}
