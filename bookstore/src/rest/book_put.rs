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

//! API to update an existing book.

use crate::driver::BookUsecase;
use crate::model::BookFields;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bookstore_core::rest::{RestResult, parse_id, success};
use std::sync::Arc;

/// API handler.
pub(crate) async fn handler(
    State(usecase): State<Arc<dyn BookUsecase + Send + Sync>>,
    Path(id): Path<String>,
    body: Bytes,
) -> RestResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let fields: BookFields = serde_json::from_slice(&body)?;
    usecase.update(id, fields).await?;
    Ok(success(StatusCode::OK, "Book Has Been Updated"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use bookstore_core::rest::testutils::*;
    use serde_json::json;

    fn route<I: std::fmt::Display>(id: I) -> (http::Method, String) {
        (http::Method::PUT, format!("/bookstore/book/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let before = context.create_book("Cosmicomics").await;
        let other = context.create_book("Baron in the Trees").await;

        let request = json!({
            "publisher_id": 3,
            "category_id": 6,
            "title": "Invisible Cities",
            "author": "Italo Calvino",
            "year_of_publication": 1972,
            "stock": 0,
            "price": 1200,
        });
        let response = OneShotBuilder::new(context.app(), route(before.id()))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_json(request)
            .await
            .expect_data::<String>()
            .await;
        assert_eq!("Book Has Been Updated", response);

        let after = context.get_book(*before.id()).await.unwrap();
        assert_eq!(3, after.fields().publisher_id);
        assert_eq!(6, after.fields().category_id);
        assert_eq!("Invisible Cities", after.fields().title);
        assert_eq!(1972, after.fields().year_of_publication);
        assert_eq!(0, after.fields().stock);
        assert_eq!(1200, after.fields().price);
        assert_eq!(before.created_at(), after.created_at());

        assert_eq!(Some(other.clone()), context.get_book(*other.id()).await);
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_an_error() {
        let context = TestContext::setup().await;

        let request = json!({
            "publisher_id": 3,
            "category_id": 6,
            "title": "Invisible Cities",
            "author": "Italo Calvino",
            "year_of_publication": 1972,
            "stock": 0,
            "price": 1200,
        });
        OneShotBuilder::new(context.app(), route(42))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_json(request)
            .await
            .expect_data::<String>()
            .await;

        assert!(context.get_book(42).await.is_none());
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        let request = json!({
            "publisher_id": 3,
            "category_id": 6,
            "title": "Invisible Cities",
            "author": "Italo Calvino",
            "year_of_publication": 1972,
            "stock": 0,
            "price": 1200,
        });
        OneShotBuilder::new(context.into_app(), route("1.5"))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid id '1.5'")
            .await;
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;
        context.drop_table("books").await;

        let request = json!({
            "publisher_id": 3,
            "category_id": 6,
            "title": "Invisible Cities",
            "author": "Italo Calvino",
            "year_of_publication": 1972,
            "stock": 0,
            "price": 1200,
        });
        OneShotBuilder::new(context.into_app(), route(1))
            .with_basic_auth(USERNAME, PASSWORD)
            .send_json(request)
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("no such table: books")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route(1), USERNAME, PASSWORD);

    test_requires_basic_auth!(TestContext::setup().await.into_app(), route(1), USERNAME);
}
