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

//! Operations on books.

use crate::driver::{BookDriver, BookUsecase};
use crate::model::{Book, BookFields};
use async_trait::async_trait;
use bookstore_core::driver::DriverResult;

#[async_trait]
impl BookUsecase for BookDriver {
    async fn list(&self) -> DriverResult<Vec<Book>> {
        Ok(self.repo.list().await?)
    }

    async fn get(&self, id: i64) -> DriverResult<Option<Book>> {
        Ok(self.repo.get(id).await?)
    }

    async fn create(&self, fields: BookFields) -> DriverResult<Book> {
        Ok(self.repo.create(fields).await?)
    }

    async fn update(&self, id: i64, fields: BookFields) -> DriverResult<()> {
        self.repo.update(id, fields).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DriverResult<()> {
        self.repo.delete(id).await?;
        Ok(())
    }
}
