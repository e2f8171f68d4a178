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

//! Scaffolding shared by the bookstore web service.
//!
//! The service is split in the following layers, and every layer has a counterpart module in this
//! crate that provides the generic pieces:
//!
//! 1.  `model`: High-level data types that represent the entities of the domain.  There is no
//!     logic in here.  This layer has no generic counterpart.
//!
//! 1.  `db`: The persistence layer, also known as the repository.  Every entity gets a trait that
//!     describes the operations it supports and one implementation that turns those operations
//!     into SQL statements against an `Executor`.
//!
//! 1.  `driver`: The business logic layer, also known as the usecase layer.  It sits between the
//!     REST and the database layers even when all it does is delegate to the database, so that
//!     business rules have an obvious home.
//!
//! 1.  `rest`: The HTTP layer, offering the REST APIs.  Handlers decode requests, call into the
//!     driver, and wrap the results in the envelopes provided by this crate.
//!
//! 1.  `main`: The app launcher.  Its sole purpose is to gather configuration data from
//!     environment variables and hand it to the service's `serve` function.
//!
//! There are result and error types in every layer, such as `DbResult` and `DbError`.  Errors can
//! transparently float to the top of the app using the `?` operator, being translated to HTTP
//! status codes once returned from the REST layer.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod clocks;
pub mod db;
pub mod driver;
pub mod env;
pub mod rest;
