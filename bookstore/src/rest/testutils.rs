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

//! Test utilities for the REST API.

use crate::db::{
    BookRepository, CategoryRepository, PublisherRepository, SqlRepository, init_schema,
};
use crate::driver::{
    BookDriver, BookUsecase, CategoryDriver, CategoryUsecase, PublisherDriver, PublisherUsecase,
};
use crate::model::*;
use crate::rest::app;
use async_trait::async_trait;
use axum::Router;
use bookstore_core::clocks::testutils::SettableClock;
use bookstore_core::db::{Db, Executor};
use bookstore_core::driver::{DriverError, DriverResult};
use bookstore_core::rest::BasicAuthCredentials;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::macros::datetime;

/// Username accepted by the apps created in tests.
pub(crate) const USERNAME: &str = "admin";

/// Password accepted by the apps created in tests.
pub(crate) const PASSWORD: &str = "secret";

/// State of a test for the REST API, backed by an in-memory SQLite database.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    repo: SqlRepository,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(bookstore_core::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2023-09-26 20:03:45 UTC)));
        let repo = SqlRepository::new(db.clone(), clock);

        let repo_arc = Arc::new(repo.clone());
        let app = app(
            Arc::new(PublisherDriver::new(repo_arc.clone())),
            Arc::new(CategoryDriver::new(repo_arc.clone())),
            Arc::new(BookDriver::new(repo_arc)),
            BasicAuthCredentials::new(USERNAME, PASSWORD),
        );
        Self { db, repo, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Drops `table` so that any further operation on it fails in the store.
    pub(crate) async fn drop_table(&self, table: &str) {
        match self.db.ex().await.unwrap() {
            Executor::Sqlite(mut ex) => {
                sqlx::query(&format!("DROP TABLE {}", table)).execute(ex.conn()).await.unwrap();
            }

            #[allow(unreachable_patterns)]
            _ => unreachable!(),
        }
    }

    pub(crate) async fn create_publisher(&self, name: &str) -> Publisher {
        let fields = PublisherFields {
            name: name.to_owned(),
            address: "80 Strand, London".to_owned(),
            phone_number: "555-0100".to_owned(),
        };
        PublisherRepository::create(&self.repo, fields).await.unwrap()
    }

    pub(crate) async fn get_publisher(&self, id: i64) -> Option<Publisher> {
        PublisherRepository::get(&self.repo, id).await.unwrap()
    }

    pub(crate) async fn create_category(&self, name: &str) -> Category {
        let fields = CategoryFields { name: name.to_owned() };
        CategoryRepository::create(&self.repo, fields).await.unwrap()
    }

    pub(crate) async fn get_category(&self, id: i64) -> Option<Category> {
        CategoryRepository::get(&self.repo, id).await.unwrap()
    }

    pub(crate) async fn create_book(&self, title: &str) -> Book {
        let fields = BookFields {
            publisher_id: 1,
            category_id: 1,
            title: title.to_owned(),
            author: "Italo Calvino".to_owned(),
            year_of_publication: 1979,
            stock: 3,
            price: 1500,
        };
        BookRepository::create(&self.repo, fields).await.unwrap()
    }

    pub(crate) async fn get_book(&self, id: i64) -> Option<Book> {
        BookRepository::get(&self.repo, id).await.unwrap()
    }
}

/// Usecase that counts its invocations and fails all of them.
#[derive(Default)]
pub(crate) struct SpyUsecase {
    calls: AtomicUsize,
}

impl SpyUsecase {
    /// Returns the number of operations invoked so far on any entity.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Records one invocation and returns the error every operation fails with.
    fn fail<T>(&self) -> DriverResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DriverError::BackendError("Spy failure".to_owned()))
    }
}

/// Implements one of the usecase traits for `SpyUsecase`.
macro_rules! impl_spy_usecase {
    ( $usecase:ident, $entity:ident, $fields:ident ) => {
        #[async_trait]
        impl $usecase for SpyUsecase {
            async fn list(&self) -> DriverResult<Vec<$entity>> {
                self.fail()
            }

            async fn get(&self, _id: i64) -> DriverResult<Option<$entity>> {
                self.fail()
            }

            async fn create(&self, _fields: $fields) -> DriverResult<$entity> {
                self.fail()
            }

            async fn update(&self, _id: i64, _fields: $fields) -> DriverResult<()> {
                self.fail()
            }

            async fn delete(&self, _id: i64) -> DriverResult<()> {
                self.fail()
            }
        }
    };
}

impl_spy_usecase!(PublisherUsecase, Publisher, PublisherFields);
impl_spy_usecase!(CategoryUsecase, Category, CategoryFields);
impl_spy_usecase!(BookUsecase, Book, BookFields);
