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

//! Persistence of categories.

use crate::db::{CategoryRepository, SqlRepository};
use crate::model::{Category, CategoryFields};
use async_trait::async_trait;
#[cfg(feature = "postgres")]
use bookstore_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bookstore_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use bookstore_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
#[cfg(feature = "postgres")]
use time::OffsetDateTime;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Category {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        let fields = CategoryFields { name };
        Ok(Category::new(id, fields, created_at, updated_at))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Category {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 = row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let fields = CategoryFields { name };
        Ok(Category::new(
            id,
            fields,
            build_timestamp(created_at_secs, created_at_nsecs)?,
            build_timestamp(updated_at_secs, updated_at_nsecs)?,
        ))
    }
}

#[async_trait]
impl CategoryRepository for SqlRepository {
    async fn list(&self) -> DbResult<Vec<Category>> {
        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let rows = sqlx::query("SELECT * FROM categories ORDER BY id")
                    .fetch_all(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                rows.into_iter().map(Category::try_from).collect()
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let rows = sqlx::query("SELECT * FROM categories ORDER BY id")
                    .fetch_all(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                rows.into_iter().map(Category::try_from).collect()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    async fn get(&self, id: i64) -> DbResult<Option<Category>> {
        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let row = sqlx::query("SELECT * FROM categories WHERE id = $1")
                    .bind(id)
                    .fetch_optional(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.map(Category::try_from).transpose()
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
                    .bind(id)
                    .fetch_optional(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                row.map(Category::try_from).transpose()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    async fn create(&self, fields: CategoryFields) -> DbResult<Category> {
        let now = self.clock.now_utc();

        let mut ex = self.db.ex().await?;
        let id: i64 = match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    INSERT INTO categories (name, created_at, updated_at)
                    VALUES ($1, $2, $3)
                    RETURNING id
                ";
                let row = sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(now)
                    .bind(now)
                    .fetch_one(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.try_get("id").map_err(postgres::map_sqlx_error)?
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let (now_secs, now_nsecs) = unpack_timestamp(now)?;
                let query_str = "
                    INSERT INTO categories (
                        name, created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                    VALUES (?, ?, ?, ?, ?)
                ";
                let done = sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(now_secs)
                    .bind(now_nsecs)
                    .bind(now_secs)
                    .bind(now_nsecs)
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                done.last_insert_rowid()
            }

            #[allow(unused)]
            _ => unreachable!(),
        };

        Ok(Category::new(id, fields, now, now))
    }

    async fn update(&self, id: i64, fields: CategoryFields) -> DbResult<()> {
        let now = self.clock.now_utc();

        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    UPDATE categories
                    SET name = $1, updated_at = $2
                    WHERE id = $3
                ";
                sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(now)
                    .bind(id)
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let (now_secs, now_nsecs) = unpack_timestamp(now)?;
                let query_str = "
                    UPDATE categories
                    SET name = ?, updated_at_secs = ?, updated_at_nsecs = ?
                    WHERE id = ?
                ";
                sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(now_secs)
                    .bind(now_nsecs)
                    .bind(id)
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                sqlx::query("DELETE FROM categories WHERE id = $1")
                    .bind(id)
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                sqlx::query("DELETE FROM categories WHERE id = ?")
                    .bind(id)
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
        Ok(())
    }
}
