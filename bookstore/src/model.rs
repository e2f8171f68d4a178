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

//! High-level data types.
//!
//! Every entity comes in two flavors: the set of fields that callers supply when creating or
//! updating the entity, and the entity as persisted, which adds the identity and the timestamps
//! that only the store assigns.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Caller-supplied fields of a publisher.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PublisherFields {
    /// Name of the publisher.
    pub name: String,

    /// Postal address of the publisher.
    pub address: String,

    /// Contact phone number of the publisher.
    pub phone_number: String,
}

/// A publisher as persisted in the store.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Publisher {
    /// Store-assigned identity.
    id: i64,

    /// Caller-supplied fields.
    #[serde(flatten)]
    fields: PublisherFields,

    /// Time of creation.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time of the last update.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Publisher {
    /// Creates a new publisher from its parts.
    pub fn new(
        id: i64,
        fields: PublisherFields,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self { id, fields, created_at, updated_at }
    }
}

/// Caller-supplied fields of a category.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CategoryFields {
    /// Name of the category.
    pub name: String,
}

/// A category as persisted in the store.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Category {
    /// Store-assigned identity.
    id: i64,

    /// Caller-supplied fields.
    #[serde(flatten)]
    fields: CategoryFields,

    /// Time of creation.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time of the last update.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Category {
    /// Creates a new category from its parts.
    pub fn new(
        id: i64,
        fields: CategoryFields,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self { id, fields, created_at, updated_at }
    }
}

/// Caller-supplied fields of a book.
///
/// References to the publisher and the category are plain identities.  Nothing checks that they
/// point to existing entities.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BookFields {
    /// Identity of the publisher of the book.
    pub publisher_id: i64,

    /// Identity of the category the book belongs to.
    pub category_id: i64,

    /// Title of the book.
    pub title: String,

    /// Author of the book.
    pub author: String,

    /// Year in which the book was published.
    pub year_of_publication: i32,

    /// Number of copies available.
    pub stock: i32,

    /// Price of the book in minor currency units.
    pub price: i64,
}

/// A book as persisted in the store.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Book {
    /// Store-assigned identity.
    id: i64,

    /// Caller-supplied fields.
    #[serde(flatten)]
    fields: BookFields,

    /// Time of creation.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time of the last update.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Book {
    /// Creates a new book from its parts.
    pub fn new(
        id: i64,
        fields: BookFields,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self { id, fields, created_at, updated_at }
    }
}
