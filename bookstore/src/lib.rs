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

//! REST service to manage the publishers, categories and books of a bookstore.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bookstore_core::clocks::SystemClock;
use bookstore_core::db::Db;
use bookstore_core::rest::BasicAuthCredentials;
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod db;
use db::SqlRepository;
pub mod driver;
use driver::{BookDriver, CategoryDriver, PublisherDriver};
pub mod model;
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// Requests to the entity APIs are only served if they carry the basic `credentials`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    credentials: BasicAuthCredentials,
) -> Result<(), Box<dyn Error>> {
    let repo = Arc::new(SqlRepository::new(db, Arc::new(SystemClock::default())));
    let app = app(
        Arc::new(PublisherDriver::new(repo.clone())),
        Arc::new(CategoryDriver::new(repo.clone())),
        Arc::new(BookDriver::new(repo)),
        credentials,
    );

    let bind_addr = bind_addr.into();
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
