// Bookstore
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! HTTP basic authentication against a single, preconfigured set of credentials.

use crate::env::get_required_var;
use crate::rest::{RestError, RestResult, get_unique_header};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose;
use derivative::Derivative;
use log::debug;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Validates that the `Authorization` HTTP header contains a textual payload for the `Basic`
/// scheme and returns it.
fn get_authorization_header(headers: &HeaderMap) -> RestResult<&str> {
    let authz = match get_unique_header(headers, "Authorization") {
        Ok(Some(value)) => value,
        Ok(None) => return Err(RestError::Unauthorized("Missing Authorization header".to_owned())),
        Err(e) => return Err(RestError::Unauthorized(e.to_string())),
    };

    let authz = authz.to_str().map_err(|e| {
        RestError::Unauthorized(format!("Bad encoding in Authorization header: {}", e))
    })?;

    let (scheme, payload) = match authz.split_once(' ') {
        Some((scheme, _)) if scheme.is_empty() => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing scheme".to_owned(),
            ));
        }
        Some(fields) => fields,
        None if authz.is_empty() => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing scheme".to_owned(),
            ));
        }
        None => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing payload".to_owned(),
            ));
        }
    };

    if scheme != "Basic" {
        return Err(RestError::Unauthorized("Unsupported scheme".to_owned()));
    }

    Ok(payload)
}

/// Assumes that the `headers` contain basic authentication credentials and extracts them as a
/// username/password pair.
pub fn get_basic_auth(headers: &HeaderMap) -> RestResult<(String, String)> {
    let base64_payload = get_authorization_header(headers)?;

    let payload = general_purpose::STANDARD.decode(base64_payload).map_err(|e| {
        RestError::Unauthorized(format!("Bad base64 encoding in payload: {}", e))
    })?;

    // Both the username and the password have to be strings, so it is easier to convert the
    // payload first in one go instead of doing two conversion after splitting the bytes.
    let payload = String::from_utf8(payload)
        .map_err(|e| RestError::Unauthorized(format!("Bad UTF-8 encoding in payload: {}", e)))?;

    match payload.split_once(':') {
        Some((username, password)) => Ok((username.to_owned(), password.to_owned())),
        None => Err(RestError::Unauthorized("Bad content".to_owned())),
    }
}

/// The only username/password pair that is allowed through `require_basic_auth`.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct BasicAuthCredentials {
    /// Expected username.
    username: String,

    /// Expected password.
    #[derivative(Debug = "ignore")]
    password: String,
}

impl BasicAuthCredentials {
    /// Creates a new set of credentials.
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Initializes the credentials from the `<prefix>_USERNAME` and `<prefix>_PASSWORD`
    /// environment variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
        })
    }

    /// Checks if the given `username` and `password` match the expected ones.
    ///
    /// Both values are always compared in full so that the time taken by this check does not
    /// reveal which of the two was wrong nor how long a matching prefix is.
    fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (username_ok & password_ok).into()
    }
}

/// Middleware that only lets requests with the expected basic `credentials` through.
///
/// Rejected requests never reach the wrapped handler and get a 401 response instead.
pub async fn require_basic_auth(
    State(credentials): State<Arc<BasicAuthCredentials>>,
    request: Request,
    next: Next,
) -> Response {
    match get_basic_auth(request.headers()) {
        Ok((username, password)) if credentials.matches(&username, &password) => {
            next.run(request).await
        }
        Ok((username, _password)) => {
            debug!("Rejecting request for user {}: invalid credentials", username);
            RestError::Unauthorized("Invalid credentials".to_owned()).into_response()
        }
        Err(e) => {
            debug!("Rejecting request: {:?}", e);
            e.into_response()
        }
    }
}
