// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! No-op backend
//!
//! Every query reports "not processed" and every mark is discarded. Used
//! when no durable dedup is wanted, such as a CI system that already
//! guarantees each commit is processed exactly once.

use crate::error::StoreError;
use crate::{Backend, LeaseToken};

/// Backend that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpStore;

impl Backend for NoOpStore {
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError> {
        Ok(LeaseToken::new())
    }

    fn extend_lease(&mut self, _token: &LeaseToken) -> Result<(), StoreError> {
        Ok(())
    }

    fn cancel_lease(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_processed(&self, _hash: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn mark_processed(&mut self, _hash: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
