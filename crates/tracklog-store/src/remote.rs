// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Remote key/value service backend
//!
//! The same processed-set contract backed by a durable HTTP key/value
//! service. The base URL identifies one processed set, so one service can
//! host many repositories under distinct prefixes. Marks are durable per
//! call; cancelling the lease has nothing left to flush. Transient network
//! failures are reported to the caller, never retried here.
//!
//! Wire contract:
//! - `PUT    {base}/v1/lease` with `{"token": …}` acquires; `409` means held
//! - `POST   {base}/v1/lease/{token}` extends; `404` means the token is stale
//! - `DELETE {base}/v1/lease` cancels
//! - `GET    {base}/v1/hashes/{hash}` queries; `200`/`404` is the answer
//! - `PUT    {base}/v1/hashes/{hash}` marks

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::{Backend, LeaseToken};

/// Per-request timeout for the remote service
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Acquisition request body
#[derive(Debug, Serialize)]
struct LeaseRequest<'a> {
    token: &'a str,
}

/// Processed-set backend over a remote HTTP key/value service
pub struct RemoteStore {
    base_url: String,
    client: Client,
}

impl RemoteStore {
    /// Create a store against the given service base URL
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Remote` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn lease_url(&self) -> String {
        format!("{}/v1/lease", self.base_url)
    }

    fn hash_url(&self, hash: &str) -> String {
        format!("{}/v1/hashes/{hash}", self.base_url)
    }
}

impl Backend for RemoteStore {
    fn acquire_lease(&mut self) -> Result<LeaseToken, StoreError> {
        let token = LeaseToken::new();
        let response = self
            .client
            .put(self.lease_url())
            .json(&LeaseRequest {
                token: token.as_str(),
            })
            .send()?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                info!(url = %self.base_url, "Acquired run lease");
                Ok(token)
            }
            StatusCode::CONFLICT => Err(StoreError::LeaseHeld {
                detail: self.lease_url(),
            }),
            status => Err(StoreError::UnexpectedStatus {
                op: "acquire lease",
                status: status.as_u16(),
            }),
        }
    }

    fn extend_lease(&mut self, token: &LeaseToken) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.lease_url(), token.as_str());
        let response = self.client.post(url).send()?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                debug!(url = %self.base_url, "Extended run lease");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(StoreError::StaleLease {
                token: token.to_string(),
            }),
            status => Err(StoreError::UnexpectedStatus {
                op: "extend lease",
                status: status.as_u16(),
            }),
        }
    }

    fn cancel_lease(&mut self) -> Result<(), StoreError> {
        let response = self.client.delete(self.lease_url()).send()?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                info!(url = %self.base_url, "Released run lease");
                Ok(())
            }
            status => Err(StoreError::UnexpectedStatus {
                op: "cancel lease",
                status: status.as_u16(),
            }),
        }
    }

    fn is_processed(&self, hash: &str) -> Result<bool, StoreError> {
        let response = self.client.get(self.hash_url(hash)).send()?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StoreError::UnexpectedStatus {
                op: "query hash",
                status: status.as_u16(),
            }),
        }
    }

    fn mark_processed(&mut self, hash: &str) -> Result<(), StoreError> {
        let response = self.client.put(self.hash_url(hash)).send()?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(StoreError::UnexpectedStatus {
                op: "mark hash",
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let store = RemoteStore::new("http://example.com/repo/").expect("build store");
        assert_eq!(store.lease_url(), "http://example.com/repo/v1/lease");
        assert_eq!(
            store.hash_url("abc123"),
            "http://example.com/repo/v1/hashes/abc123"
        );
    }
}
