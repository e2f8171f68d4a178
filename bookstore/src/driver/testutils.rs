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

//! Test utilities for the business layer.

use crate::db::{SqlRepository, init_schema};
use bookstore_core::clocks::testutils::SettableClock;
use bookstore_core::db::{Db, Executor};
use std::sync::Arc;
use time::macros::datetime;

/// State of a test for the business layer, backed by an in-memory SQLite database.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    repo: SqlRepository,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(bookstore_core::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2023-09-26 20:03:45 UTC)));
        let repo = SqlRepository::new(db.clone(), clock);
        Self { db, repo }
    }

    /// Returns a repository to seed and inspect the database with.
    pub(crate) fn repo(&self) -> Arc<SqlRepository> {
        Arc::new(self.repo.clone())
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
}
