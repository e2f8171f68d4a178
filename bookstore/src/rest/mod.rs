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

//! Entry point to the REST server.

use crate::driver::{BookUsecase, CategoryUsecase, PublisherUsecase};
use axum::Router;
use axum::middleware;
use axum::routing::get;
use bookstore_core::rest::{BasicAuthCredentials, RestError, require_basic_auth};
use std::sync::Arc;

mod book_delete;
mod book_get;
mod book_put;
mod books_get;
mod books_post;
mod categories_get;
mod categories_post;
mod category_delete;
mod category_get;
mod category_put;
mod health_get;
mod publisher_delete;
mod publisher_get;
mod publisher_put;
mod publishers_get;
mod publishers_post;
#[cfg(test)]
mod testutils;

/// Handler for any request that does not match a known route or method.
async fn not_found() -> RestError {
    RestError::NotFound("Endpoint not found".to_owned())
}

/// Creates the router for the application.
///
/// All entity routes require basic authentication with `credentials`.  The health check does not.
pub(crate) fn app(
    publishers: Arc<dyn PublisherUsecase + Send + Sync>,
    categories: Arc<dyn CategoryUsecase + Send + Sync>,
    books: Arc<dyn BookUsecase + Send + Sync>,
    credentials: BasicAuthCredentials,
) -> Router {
    let publishers = Router::new()
        .route(
            "/bookstore/publisher",
            get(publishers_get::handler).post(publishers_post::handler).fallback(not_found),
        )
        .route(
            "/bookstore/publisher/:id",
            get(publisher_get::handler)
                .put(publisher_put::handler)
                .delete(publisher_delete::handler)
                .fallback(not_found),
        )
        .with_state(publishers);

    let categories = Router::new()
        .route(
            "/bookstore/category",
            get(categories_get::handler).post(categories_post::handler).fallback(not_found),
        )
        .route(
            "/bookstore/category/:id",
            get(category_get::handler)
                .put(category_put::handler)
                .delete(category_delete::handler)
                .fallback(not_found),
        )
        .with_state(categories);

    let books = Router::new()
        .route(
            "/bookstore/book",
            get(books_get::handler).post(books_post::handler).fallback(not_found),
        )
        .route(
            "/bookstore/book/:id",
            get(book_get::handler)
                .put(book_put::handler)
                .delete(book_delete::handler)
                .fallback(not_found),
        )
        .with_state(books);

    Router::new()
        .merge(publishers)
        .merge(categories)
        .merge(books)
        .route_layer(middleware::from_fn_with_state(Arc::new(credentials), require_basic_auth))
        .route("/healthz", get(health_get::handler).fallback(not_found))
        .fallback(not_found)
}
