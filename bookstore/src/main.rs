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

//! Entry point to the bookstore service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bookstore::db::init_schema;
use bookstore::serve;
use bookstore_core::db::Db;
use bookstore_core::db::postgres::{PostgresDb, PostgresOptions};
use bookstore_core::env::get_optional_var;
use bookstore_core::rest::BasicAuthCredentials;
use log::{error, info};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process;
use std::sync::Arc;

/// Default port to listen on when `BOOKSTORE_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Gathers the configuration from the environment, prepares the database and serves requests
/// until the server fails.
async fn run() -> Result<(), Box<dyn Error>> {
    let port = get_optional_var::<u16>("BOOKSTORE", "PORT")?.unwrap_or(DEFAULT_PORT);
    let ip = if get_optional_var::<bool>("BOOKSTORE", "BIND_ALL")?.unwrap_or(false) {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };
    let credentials = BasicAuthCredentials::from_env("BOOKSTORE_AUTH")?;
    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    info!("Connecting to database {} at {}:{}", db_opts.database, db_opts.host, db_opts.port);

    let db: Arc<dyn Db + Send + Sync> = Arc::new(PostgresDb::connect(db_opts)?);
    init_schema(&mut db.ex().await?).await?;

    serve(SocketAddr::new(ip, port), db, credentials).await
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine: the configuration may come from the real environment.
    let _ = dotenvy::dotenv();
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}
