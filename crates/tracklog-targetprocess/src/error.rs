// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tracklog-targetprocess

use thiserror::Error;

/// Errors that can occur talking to the TargetProcess API
#[derive(Debug, Error)]
pub enum TargetProcessError {
    /// The request failed in transport
    #[error("TargetProcess request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an unexpected status
    #[error("TargetProcess API returned status {status}, expected 201 Created. Body was: {body}")]
    UnexpectedStatus {
        /// The HTTP status code received
        status: u16,
        /// The response body, for diagnosis
        body: String,
    },
}
