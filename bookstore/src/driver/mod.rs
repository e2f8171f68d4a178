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

//! Business logic for the service.
//!
//! Every entity has a usecase trait that the REST layer talks to and a driver that implements it
//! by delegating to the entity's repository.  Results flow back unchanged and repository errors are
//! only converted to `DriverError`, keeping their messages.

use crate::db::{BookRepository, CategoryRepository, PublisherRepository};
use crate::model::{Book, BookFields, Category, CategoryFields, Publisher, PublisherFields};
use async_trait::async_trait;
use bookstore_core::driver::DriverResult;
use std::sync::Arc;

mod book;
mod category;
mod publisher;
#[cfg(test)]
pub(crate) mod testutils;

/// Operations on publishers.
#[async_trait]
pub trait PublisherUsecase {
    /// Gets all publishers.
    async fn list(&self) -> DriverResult<Vec<Publisher>>;

    /// Gets the publisher with identity `id`, if any.
    async fn get(&self, id: i64) -> DriverResult<Option<Publisher>>;

    /// Creates a new publisher.
    async fn create(&self, fields: PublisherFields) -> DriverResult<Publisher>;

    /// Rewrites the publisher with identity `id`.
    async fn update(&self, id: i64, fields: PublisherFields) -> DriverResult<()>;

    /// Deletes the publisher with identity `id`.
    async fn delete(&self, id: i64) -> DriverResult<()>;
}

/// Operations on categories.
#[async_trait]
pub trait CategoryUsecase {
    /// Gets all categories.
    async fn list(&self) -> DriverResult<Vec<Category>>;

    /// Gets the category with identity `id`, if any.
    async fn get(&self, id: i64) -> DriverResult<Option<Category>>;

    /// Creates a new category.
    async fn create(&self, fields: CategoryFields) -> DriverResult<Category>;

    /// Rewrites the category with identity `id`.
    async fn update(&self, id: i64, fields: CategoryFields) -> DriverResult<()>;

    /// Deletes the category with identity `id`.
    async fn delete(&self, id: i64) -> DriverResult<()>;
}

/// Operations on books.
#[async_trait]
pub trait BookUsecase {
    /// Gets all books.
    async fn list(&self) -> DriverResult<Vec<Book>>;

    /// Gets the book with identity `id`, if any.
    async fn get(&self, id: i64) -> DriverResult<Option<Book>>;

    /// Creates a new book.
    async fn create(&self, fields: BookFields) -> DriverResult<Book>;

    /// Rewrites the book with identity `id`.
    async fn update(&self, id: i64, fields: BookFields) -> DriverResult<()>;

    /// Deletes the book with identity `id`.
    async fn delete(&self, id: i64) -> DriverResult<()>;
}

/// Default business logic for publishers.
#[derive(Clone)]
pub struct PublisherDriver {
    /// The repository that persists publishers.
    repo: Arc<dyn PublisherRepository + Send + Sync>,
}

impl PublisherDriver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(repo: Arc<dyn PublisherRepository + Send + Sync>) -> Self {
        Self { repo }
    }
}

/// Default business logic for categories.
#[derive(Clone)]
pub struct CategoryDriver {
    /// The repository that persists categories.
    repo: Arc<dyn CategoryRepository + Send + Sync>,
}

impl CategoryDriver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(repo: Arc<dyn CategoryRepository + Send + Sync>) -> Self {
        Self { repo }
    }
}

/// Default business logic for books.
#[derive(Clone)]
pub struct BookDriver {
    /// The repository that persists books.
    repo: Arc<dyn BookRepository + Send + Sync>,
}

impl BookDriver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(repo: Arc<dyn BookRepository + Send + Sync>) -> Self {
        Self { repo }
    }
}
