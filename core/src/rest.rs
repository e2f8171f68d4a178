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

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in this module that returns the `Router` for the
//! application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! Every response, successful or not, is wrapped in an envelope that repeats the HTTP status: see
//! `SuccessResponse` and `FailureResponse`.

use crate::driver::DriverError;
use async_trait::async_trait;
use axum::Json;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::http::header::AsHeaderName;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use log::warn;
use serde::{Deserialize, Serialize};

mod basic_auth;
pub use basic_auth::{BasicAuthCredentials, get_basic_auth, require_basic_auth};

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Indicates an error in the contents of the request, such as an undecodable body or a
    /// malformed identifier in the path.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity or endpoint does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates that the business logic or the store failed to process the request.  The
    /// payload is the message of the underlying error, which is returned to the client as is.
    #[error("{0}")]
    StoreFailure(String),

    /// Indicates an authentication problem.  The payload describes the problem for logging
    /// purposes only and is never returned to the client.
    #[error("Unauthorized")]
    Unauthorized(String),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(_) => RestError::StoreFailure(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status;
        let mut headers = HeaderMap::new();
        match self {
            RestError::InvalidRequest(_) => {
                status = StatusCode::BAD_REQUEST;
            }
            RestError::NotFound(_) => {
                status = StatusCode::NOT_FOUND;
            }
            RestError::PayloadNotEmpty => {
                status = StatusCode::PAYLOAD_TOO_LARGE;
            }
            RestError::StoreFailure(ref message) => {
                warn!("Returning store failure to client: {}", message);
                status = StatusCode::FORBIDDEN;
            }
            RestError::Unauthorized(_) => {
                status = StatusCode::UNAUTHORIZED;
                headers.insert("WWW-Authenticate", HeaderValue::from_static("Basic"));
            }
        };

        let response = FailureResponse::new(status, self.to_string());

        (status, headers, Json(response)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Returns the textual representation of `status`, or the empty string if it has none.
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

/// Envelope of a successful response.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct SuccessResponse<T> {
    /// Textual representation of the HTTP status code.
    pub status: String,

    /// The HTTP status code, repeated from the response.
    pub status_code: u16,

    /// The payload of the response.
    pub data: T,
}

impl<T> SuccessResponse<T> {
    /// Creates a new envelope for `data` that goes out with `status`.
    pub fn new(status: StatusCode, data: T) -> Self {
        Self { status: reason_phrase(status), status_code: status.as_u16(), data }
    }
}

impl<T: Serialize> IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Envelope of a failed response.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct FailureResponse {
    /// Textual representation of the HTTP status code.
    pub status: String,

    /// The HTTP status code, repeated from the response.
    pub status_code: u16,

    /// Textual representation of the error message.
    pub message: String,
}

impl FailureResponse {
    /// Creates a new envelope for the error `message` that goes out with `status`.
    pub fn new<M: Into<String>>(status: StatusCode, message: M) -> Self {
        Self {
            status: reason_phrase(status),
            status_code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Wraps `data` in a success envelope to be returned with `status`.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> SuccessResponse<T> {
    SuccessResponse::new(status, data)
}

/// Parses the raw entity identifier `raw` as extracted from a request path.
pub fn parse_id(raw: &str) -> RestResult<i64> {
    raw.parse::<i64>()
        .map_err(|e| RestError::InvalidRequest(format!("Invalid id '{}': {}", raw, e)))
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Extracts the header `name` from `headers` and ensures it has at most one value.
pub fn get_unique_header<K: AsHeaderName + Copy>(
    headers: &HeaderMap,
    name: K,
) -> RestResult<Option<&HeaderValue>> {
    let mut iter = headers.get_all(name).iter();
    let value = iter.next();
    if iter.next().is_some() {
        return Err(RestError::InvalidRequest(format!(
            "Header {} cannot have more than one value",
            name.as_str()
        )));
    }
    Ok(value)
}

/// Common test code for the REST server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http::{self, HeaderName};
    use base64::Engine;
    use base64::engine::general_purpose;
    use serde::de::DeserializeOwned;
    use std::fmt;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the API server.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Adds basic authentication to the request.
        pub fn with_basic_auth<U, P>(mut self, username: U, password: P) -> Self
        where
            U: fmt::Display,
            P: fmt::Display,
        {
            let value = format!(
                "Basic {}",
                general_purpose::STANDARD.encode(format!("{}:{}", username, password))
            );
            self.builder = self.builder.header(http::header::AUTHORIZATION, value);
            self
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a JSON payload.
        pub async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = hyper::Response<axum::body::Body>;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Ensures that the response claims to carry JSON.
        fn verify_json_content_type(&self) {
            let content_type = self
                .response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .expect("Response lacks a Content-Type header");
            assert_eq!(mime::APPLICATION_JSON.as_ref(), content_type.to_str().unwrap());
        }

        /// Consumes the response and returns its raw body.
        async fn take_body(self) -> Vec<u8> {
            axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap().to_vec()
        }

        /// Finishes checking the response and expects its body to be a `FailureResponse` whose
        /// message matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            self.verify();
            self.verify_json_content_type();

            let exp_status = self.exp_status;
            let body = self.take_body().await;
            let response: FailureResponse = match serde_json::from_slice(&body) {
                Ok(response) => response,
                Err(e) => {
                    let body = String::from_utf8(body).unwrap();
                    panic!("Invalid error response due to {}; content was {}", e, body);
                }
            };
            assert_eq!(FailureResponse::new(exp_status, response.message.clone()), response);

            if exp_re.is_empty() {
                assert!(
                    response.message.is_empty(),
                    "Response content '{:?}' is not empty",
                    response
                );
            } else {
                let re = regex::Regex::new(exp_re).unwrap();
                assert!(
                    re.is_match(&response.message),
                    "Response content '{:?}' does not match re '{}'",
                    response,
                    exp_re
                );
            }
        }

        /// Finishes checking the response and expects its body to be a `SuccessResponse`
        /// carrying data of type `T`, which is returned.
        pub async fn expect_data<T: DeserializeOwned>(self) -> T {
            self.verify();
            self.verify_json_content_type();

            let exp_status = self.exp_status;
            let body = self.take_body().await;
            let response: SuccessResponse<T> = match serde_json::from_slice(&body) {
                Ok(response) => response,
                Err(e) => {
                    let body = String::from_utf8(body).unwrap();
                    panic!("Invalid success response due to {}; content was {}", e, body);
                }
            };
            assert_eq!(reason_phrase(exp_status), response.status);
            assert_eq!(exp_status.as_u16(), response.status_code);
            response.data
        }

        /// Finishes checking the response and expects it to contain a valid JSON object of
        /// type `T`.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            self.verify();
            self.verify_json_content_type();

            let body = self.take_body().await;
            serde_json::from_slice::<T>(&body).unwrap()
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> HttpResponse {
            self.verify();

            self.response
        }
    }

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    ///
    /// The optional `username` and `password` are used to get past authentication.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr $(, $username:expr, $password:expr)? ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;

    /// Generates a test to verify that an API that expects JSON fails when it gets something else.
    ///
    /// The optional `username` and `password` are used to get past authentication.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr $(, $username:expr, $password:expr)? ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("expected ident")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .send_empty()
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("EOF while parsing")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test to verify that an API rejects requests without valid basic credentials.
    ///
    /// `username` is a valid username for the API and is used to verify that a bad password with
    /// a good username is rejected too.
    #[macro_export]
    macro_rules! test_requires_basic_auth {
        ( $app:expr, $route:expr, $username:expr ) => {
            #[tokio::test]
            async fn test_requires_basic_auth() {
                let response = $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_empty()
                    .await
                    .expect_status(axum::http::StatusCode::UNAUTHORIZED)
                    .take_response()
                    .await;
                assert_eq!(
                    "Basic",
                    response.headers().get("WWW-Authenticate").unwrap().to_str().unwrap()
                );

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .with_basic_auth($username, "not the password")
                    .send_empty()
                    .await
                    .expect_status(axum::http::StatusCode::UNAUTHORIZED)
                    .expect_error("^Unauthorized$")
                    .await;
            }
        };
    }

    pub use test_requires_basic_auth;
}
