// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tracklog-targetprocess: TargetProcess comment API client
//!
//! A small client for the TargetProcess REST API, covering the one call
//! tracklog needs: posting a comment to an entity. Authentication is either
//! basic auth or an `access_token` query parameter.
//!
//! # Example
//!
//! ```no_run
//! use tracklog_targetprocess::{Api, Auth};
//!
//! let api = Api::new(
//!     "https://example.tpondemand.com",
//!     Auth::Token { token: "secret".to_string() },
//! ).expect("build client");
//! api.comment(1893, "Commit abc referenced this ticket").expect("post comment");
//! ```

#![warn(missing_docs)]

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

pub mod error;

pub use error::TargetProcessError;

/// Per-request timeout for the TargetProcess API
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How to authenticate against TargetProcess
#[derive(Debug, Clone)]
pub enum Auth {
    /// HTTP basic authentication
    Password {
        /// Account username
        username: String,
        /// Account password
        password: String,
    },
    /// `access_token` query-string authentication
    Token {
        /// The access token value
        token: String,
    },
}

/// A comment on a TargetProcess entity, in the API's wire shape
#[derive(Debug, Serialize)]
struct Comment<'a> {
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "General")]
    general: General,
}

/// The TargetProcess General entity a comment attaches to
#[derive(Debug, Serialize)]
struct General {
    #[serde(rename = "Id")]
    id: i64,
}

/// A TargetProcess API endpoint
pub struct Api {
    base_url: String,
    auth: Auth,
    client: Client,
}

impl Api {
    /// Create a client for the given account base URL
    ///
    /// A trailing slash on the URL is normalized away.
    ///
    /// # Errors
    ///
    /// Returns `TargetProcessError::Http` if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self, TargetProcessError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            client,
        })
    }

    /// Post a comment to the entity with the given id
    ///
    /// # Errors
    ///
    /// Returns `TargetProcessError::Http` on transport failure, or
    /// `TargetProcessError::UnexpectedStatus` (carrying the response body)
    /// when the API answers with anything other than `201 Created`.
    pub fn comment(&self, entity_id: i64, message: &str) -> Result<(), TargetProcessError> {
        let url = format!("{}/api/v1/comments", self.base_url);
        let body = Comment {
            description: message,
            general: General { id: entity_id },
        };

        let request = self.client.post(url).json(&body);
        let request = match &self.auth {
            Auth::Password { username, password } => request.basic_auth(username, Some(password)),
            Auth::Token { token } => request.query(&[("access_token", token.as_str())]),
        };

        let response = request.send()?;
        let status = response.status();

        if status != StatusCode::CREATED {
            return Err(TargetProcessError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        debug!(entity_id, "Posted TargetProcess comment");
        Ok(())
    }
}
