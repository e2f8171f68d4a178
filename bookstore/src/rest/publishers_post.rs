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

//! API to create a new publisher.

use crate::driver::PublisherUsecase;
use crate::model::PublisherFields;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use bookstore_core::rest::{RestResult, success};
use std::sync::Arc;

/// API handler.
pub(crate) async fn handler(
    State(usecase): State<Arc<dyn PublisherUsecase + Send + Sync>>,
    body: Bytes,
) -> RestResult<impl IntoResponse> {
    let fields: PublisherFields = serde_json::from_slice(&body)?;
    let publisher = usecase.create(fields).await?;
    let location = format!("/bookstore/publisher/{}", publisher.id());
    Ok(([(header::LOCATION, location)], success(StatusCode::CREATED, "Created")))
}
