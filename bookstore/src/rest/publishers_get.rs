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

//! API to list all publishers.

use crate::driver::PublisherUsecase;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookstore_core::rest::{EmptyBody, RestResult, success};
use std::sync::Arc;

/// API handler.
pub(crate) async fn handler(
    State(usecase): State<Arc<dyn PublisherUsecase + Send + Sync>>,
    _: EmptyBody,
) -> RestResult<Response> {
    let publishers = usecase.list().await?;
    if publishers.is_empty() {
        return Ok(success(StatusCode::OK, "Publisher is empty").into_response());
    }
    Ok(success(StatusCode::OK, publishers).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bookstore_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/bookstore/publisher".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_data::<String>()
            .await;
        assert_eq!("Publisher is empty", response);
    }

    #[tokio::test]
    async fn test_some() {
        let context = TestContext::setup().await;
        let first = context.create_publisher("Penguin").await;
        let second = context.create_publisher("Vintage").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_data::<Vec<Publisher>>()
            .await;
        assert_eq!(vec![first, second], response);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;
        context.drop_table("publishers").await;

        OneShotBuilder::new(context.into_app(), route())
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("no such table: publishers")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(), USERNAME, PASSWORD);

    test_requires_basic_auth!(TestContext::setup().await.into_app(), route(), USERNAME);
}
