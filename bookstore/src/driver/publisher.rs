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

//! Operations on publishers.

use crate::driver::{PublisherDriver, PublisherUsecase};
use crate::model::{Publisher, PublisherFields};
use async_trait::async_trait;
use bookstore_core::driver::DriverResult;

#[async_trait]
impl PublisherUsecase for PublisherDriver {
    async fn list(&self) -> DriverResult<Vec<Publisher>> {
        Ok(self.repo.list().await?)
    }

    async fn get(&self, id: i64) -> DriverResult<Option<Publisher>> {
        Ok(self.repo.get(id).await?)
    }

    async fn create(&self, fields: PublisherFields) -> DriverResult<Publisher> {
        Ok(self.repo.create(fields).await?)
    }

    async fn update(&self, id: i64, fields: PublisherFields) -> DriverResult<()> {
        self.repo.update(id, fields).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DriverResult<()> {
        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PublisherRepository;
    use crate::driver::testutils::*;
    use bookstore_core::driver::DriverError;

    fn fields(name: &str) -> PublisherFields {
        PublisherFields {
            name: name.to_owned(),
            address: "80 Strand, London".to_owned(),
            phone_number: "555-0100".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_list_empty() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());

        assert!(driver.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());

        let created = driver.create(fields("Penguin")).await.unwrap();
        assert_eq!(&fields("Penguin"), created.fields());

        assert_eq!(vec![created.clone()], driver.list().await.unwrap());
        assert_eq!(Some(created.clone()), driver.get(*created.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());

        assert_eq!(None, driver.get(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_update() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());

        let repo = context.repo();
        let created = PublisherRepository::create(&*repo, fields("Penguin")).await.unwrap();
        driver.update(*created.id(), fields("Vintage")).await.unwrap();

        let updated = PublisherRepository::get(&*repo, *created.id()).await.unwrap();
        assert_eq!(&fields("Vintage"), updated.unwrap().fields());
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());

        let repo = context.repo();
        let created = PublisherRepository::create(&*repo, fields("Penguin")).await.unwrap();
        driver.delete(*created.id()).await.unwrap();
        driver.delete(*created.id()).await.unwrap();

        assert!(PublisherRepository::list(&*repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_error_keeps_message() {
        let context = TestContext::setup().await;
        let driver = PublisherDriver::new(context.repo());
        context.drop_table("publishers").await;

        match driver.update(1, fields("Penguin")).await {
            Err(DriverError::BackendError(message)) => {
                assert!(message.contains("no such table: publishers"), "Bad message: {}", message)
            }
            e => panic!("{:?}", e),
        }
    }
}
