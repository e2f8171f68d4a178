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

//! Generic business logic for any service.
//!
//! Every entity of a service gets a usecase trait in its own `driver` module plus a default
//! implementation of that trait that holds the repository it operates on.  Handlers only ever talk
//! to the trait so that the business logic can be replaced in tests or extended with rules without
//! touching the REST layer:
//!
//! ```rust
//! use async_trait::async_trait;
//! use bookstore_core::driver::DriverResult;
//!
//! #[async_trait]
//! pub trait WidgetUsecase {
//!     async fn get(&self, id: i64) -> DriverResult<Option<String>>;
//! }
//! ```

use crate::db::DbError;

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Catch-all error type for unexpected database errors.  The payload is the message of the
    /// underlying error, preserved verbatim.
    #[error("{0}")]
    BackendError(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_db_error_keeps_message() {
        assert_eq!(
            DriverError::BackendError("no such table: books".to_owned()),
            DriverError::from(DbError::BackendError("no such table: books".to_owned()))
        );
        assert_eq!(
            DriverError::BackendError("Data integrity error: bad column".to_owned()),
            DriverError::from(DbError::DataIntegrityError("bad column".to_owned()))
        );
    }
}
