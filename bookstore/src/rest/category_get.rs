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

//! API to get a single category.

use crate::driver::CategoryUsecase;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bookstore_core::rest::{EmptyBody, RestError, RestResult, parse_id, success};
use std::sync::Arc;

/// API handler.
pub(crate) async fn handler(
    State(usecase): State<Arc<dyn CategoryUsecase + Send + Sync>>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    match usecase.get(id).await? {
        Some(category) => Ok(success(StatusCode::OK, category)),
        None => Err(RestError::NotFound(format!("Category ID {} Was Not Found", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bookstore_core::rest::testutils::*;

    fn route<I: std::fmt::Display>(id: I) -> (http::Method, String) {
        (http::Method::GET, format!("/bookstore/category/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_category("Classics").await;
        let exp_category = context.create_category("Poetry").await;

        let response = OneShotBuilder::new(context.into_app(), route(exp_category.id()))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_data::<Category>()
            .await;
        assert_eq!(exp_category, response);
    }

    #[tokio::test]
    async fn test_json_layout() {
        let context = TestContext::setup().await;
        context.create_category("Classics").await;

        let response = OneShotBuilder::new(context.into_app(), route(1))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_json::<serde_json::Value>()
            .await;
        assert_eq!(
            serde_json::json!({
                "status": "OK",
                "status_code": 200,
                "data": {
                    "id": 1,
                    "name": "Classics",
                    "created_at": "2023-09-26T20:03:45Z",
                    "updated_at": "2023-09-26T20:03:45Z",
                },
            }),
            response
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(42))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Category ID 42 Was Not Found$")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("abc"))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid id 'abc'")
            .await;
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;
        context.drop_table("categories").await;

        OneShotBuilder::new(context.into_app(), route(1))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("no such table: categories")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(1),
        USERNAME,
        PASSWORD
    );

    test_requires_basic_auth!(TestContext::setup().await.into_app(), route(1), USERNAME);
}
