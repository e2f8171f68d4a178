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

//! Database abstraction in terms of the operations needed by the service.
//!
//! Every entity has its own repository trait.  All of them are implemented by `SqlRepository`,
//! which translates each operation into a single SQL statement issued on a connection checked out
//! of the pool for the duration of the operation.

use crate::model::{Book, BookFields, Category, CategoryFields, Publisher, PublisherFields};
use async_trait::async_trait;
use bookstore_core::clocks::Clock;
#[cfg(feature = "postgres")]
use bookstore_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bookstore_core::db::sqlite;
use bookstore_core::db::{Db, DbResult, Executor};
use std::sync::Arc;

mod book;
mod category;
mod publisher;

/// Initializes the database schema.
///
/// Tables are only created if they do not exist yet, so this is safe to call on every startup.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Persistence operations for publishers.
#[async_trait]
pub trait PublisherRepository {
    /// Gets all publishers ordered by their identity.
    async fn list(&self) -> DbResult<Vec<Publisher>>;

    /// Gets the publisher with identity `id`, if any.
    async fn get(&self, id: i64) -> DbResult<Option<Publisher>>;

    /// Creates a new publisher with the given `fields` and returns it.
    async fn create(&self, fields: PublisherFields) -> DbResult<Publisher>;

    /// Rewrites all `fields` of the publisher with identity `id`.  Does nothing if there is no
    /// such publisher.
    async fn update(&self, id: i64, fields: PublisherFields) -> DbResult<()>;

    /// Deletes the publisher with identity `id`.  Does nothing if there is no such publisher.
    async fn delete(&self, id: i64) -> DbResult<()>;
}

/// Persistence operations for categories.
#[async_trait]
pub trait CategoryRepository {
    /// Gets all categories ordered by their identity.
    async fn list(&self) -> DbResult<Vec<Category>>;

    /// Gets the category with identity `id`, if any.
    async fn get(&self, id: i64) -> DbResult<Option<Category>>;

    /// Creates a new category with the given `fields` and returns it.
    async fn create(&self, fields: CategoryFields) -> DbResult<Category>;

    /// Rewrites all `fields` of the category with identity `id`.  Does nothing if there is no
    /// such category.
    async fn update(&self, id: i64, fields: CategoryFields) -> DbResult<()>;

    /// Deletes the category with identity `id`.  Does nothing if there is no such category.
    async fn delete(&self, id: i64) -> DbResult<()>;
}

/// Persistence operations for books.
#[async_trait]
pub trait BookRepository {
    /// Gets all books ordered by their identity.
    async fn list(&self) -> DbResult<Vec<Book>>;

    /// Gets the book with identity `id`, if any.
    async fn get(&self, id: i64) -> DbResult<Option<Book>>;

    /// Creates a new book with the given `fields` and returns it.
    async fn create(&self, fields: BookFields) -> DbResult<Book>;

    /// Rewrites all `fields` of the book with identity `id`.  Does nothing if there is no such
    /// book.
    async fn update(&self, id: i64, fields: BookFields) -> DbResult<()>;

    /// Deletes the book with identity `id`.  Does nothing if there is no such book.
    async fn delete(&self, id: i64) -> DbResult<()>;
}

/// Repository backed by a SQL database.
#[derive(Clone)]
pub struct SqlRepository {
    /// The database that holds all entities.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock to obtain the creation and update timestamps from.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl SqlRepository {
    /// Creates a new repository backed by the given injected components.
    pub fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }
}
