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

//! Persistence of publishers.

use crate::db::{PublisherRepository, SqlRepository};
use crate::model::{Publisher, PublisherFields};
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
impl TryFrom<PgRow> for Publisher {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let address: String = row.try_get("address").map_err(postgres::map_sqlx_error)?;
        let phone_number: String =
            row.try_get("phone_number").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        let fields = PublisherFields { name, address, phone_number };
        Ok(Publisher::new(id, fields, created_at, updated_at))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Publisher {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let address: String = row.try_get("address").map_err(sqlite::map_sqlx_error)?;
        let phone_number: String = row.try_get("phone_number").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 = row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let fields = PublisherFields { name, address, phone_number };
        Ok(Publisher::new(
            id,
            fields,
            build_timestamp(created_at_secs, created_at_nsecs)?,
            build_timestamp(updated_at_secs, updated_at_nsecs)?,
        ))
    }
}

#[async_trait]
impl PublisherRepository for SqlRepository {
    async fn list(&self) -> DbResult<Vec<Publisher>> {
        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let rows = sqlx::query("SELECT * FROM publishers ORDER BY id")
                    .fetch_all(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                rows.into_iter().map(Publisher::try_from).collect()
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let rows = sqlx::query("SELECT * FROM publishers ORDER BY id")
                    .fetch_all(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                rows.into_iter().map(Publisher::try_from).collect()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    async fn get(&self, id: i64) -> DbResult<Option<Publisher>> {
        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let row = sqlx::query("SELECT * FROM publishers WHERE id = $1")
                    .bind(id)
                    .fetch_optional(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.map(Publisher::try_from).transpose()
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                let row = sqlx::query("SELECT * FROM publishers WHERE id = ?")
                    .bind(id)
                    .fetch_optional(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                row.map(Publisher::try_from).transpose()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    async fn create(&self, fields: PublisherFields) -> DbResult<Publisher> {
        let now = self.clock.now_utc();

        let mut ex = self.db.ex().await?;
        let id: i64 = match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    INSERT INTO publishers (name, address, phone_number, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                ";
                let row = sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(fields.address.as_str())
                    .bind(fields.phone_number.as_str())
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
                    INSERT INTO publishers (
                        name, address, phone_number,
                        created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                ";
                let done = sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(fields.address.as_str())
                    .bind(fields.phone_number.as_str())
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

        Ok(Publisher::new(id, fields, now, now))
    }

    async fn update(&self, id: i64, fields: PublisherFields) -> DbResult<()> {
        let now = self.clock.now_utc();

        let mut ex = self.db.ex().await?;
        match &mut ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    UPDATE publishers
                    SET name = $1, address = $2, phone_number = $3, updated_at = $4
                    WHERE id = $5
                ";
                sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(fields.address.as_str())
                    .bind(fields.phone_number.as_str())
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
                    UPDATE publishers
                    SET name = ?, address = ?, phone_number = ?,
                        updated_at_secs = ?, updated_at_nsecs = ?
                    WHERE id = ?
                ";
                sqlx::query(query_str)
                    .bind(fields.name.as_str())
                    .bind(fields.address.as_str())
                    .bind(fields.phone_number.as_str())
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
                sqlx::query("DELETE FROM publishers WHERE id = $1")
                    .bind(id)
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(ex) => {
                sqlx::query("DELETE FROM publishers WHERE id = ?")
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
