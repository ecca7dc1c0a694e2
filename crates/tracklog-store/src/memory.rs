// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! In-memory backend
//!
//! The set lives only for the process lifetime and lease calls succeed
//! trivially. Used in tests and in environments where the surrounding
//! system already guarantees runs never overlap.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::{Backend, LeaseToken};

/// Process-lifetime processed-set backend
#[derive(Debug, Default)]
pub struct InMemoryStore {
    hashes: HashSet<String>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for InMemoryStore {
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError> {
        Ok(LeaseToken::new())
    }

    fn extend_lease(&mut self, _token: &LeaseToken) -> Result<(), StoreError> {
        Ok(())
    }

    fn cancel_lease(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_processed(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.hashes.contains(hash))
    }

    fn mark_processed(&mut self, hash: &str) -> Result<(), StoreError> {
        self.hashes.insert(hash.to_string());
        Ok(())
    }
}
