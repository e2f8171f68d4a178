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

//! API to list all categories.

use crate::driver::CategoryUsecase;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookstore_core::rest::{EmptyBody, RestResult, success};
use std::sync::Arc;

/// API handler.
pub(crate) async fn handler(
    State(usecase): State<Arc<dyn CategoryUsecase + Send + Sync>>,
    _: EmptyBody,
) -> RestResult<Response> {
    let categories = usecase.list().await?;
    if categories.is_empty() {
        return Ok(success(StatusCode::OK, "Category is empty").into_response());
    }
    Ok(success(StatusCode::OK, categories).into_response())
}
