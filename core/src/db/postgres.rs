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

//! Common utilities to interact with a PostgreSQL database.

use crate::db::{Db, DbError, DbResult, Executor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{
    PgConnectOptions, PgConnection, PgPool, PgPoolOptions, PgSslMode, Postgres,
};
use std::time::Duration;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection to a PostgreSQL database.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 5432).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// TLS negotiation mode.  Defaults to `prefer` when not configured.
    pub ssl_mode: PgSslMode,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME`, `<prefix>_PASSWORD`, `<prefix>_SSL_MODE`, `<prefix>_MIN_CONNECTIONS`
    /// and `<prefix>_MAX_CONNECTIONS`.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        let ssl_mode = match get_optional_var::<String>(prefix, "SSL_MODE")? {
            Some(raw) => raw
                .parse::<PgSslMode>()
                .map_err(|e| format!("Invalid ssl mode in {}_SSL_MODE: {}", prefix, e))?,
            None => PgSslMode::Prefer,
        };

        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_required_var::<u16>(prefix, "PORT")?,
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            ssl_mode,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
        })
    }
}

/// A database executor for PostgreSQL backed by a connection checked out of the pool.
#[derive(Debug)]
pub struct PostgresExecutor(PoolConnection<Postgres>);

impl PostgresExecutor {
    /// Returns the raw connection to issue `sqlx` operations against.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

/// Shareable connection pool to a PostgreSQL database.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.  This is a cloneable type that all concurrent
    /// operations can use concurrently.
    pool: PgPool,
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

impl PostgresDb {
    /// Creates a new connection pool based on a set of options.
    ///
    /// Note that this does *not* establish the connection.  Connectivity problems surface on the
    /// first operation that needs an executor.
    pub fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let mut pool_options = PgPoolOptions::new();
        if let Some(min_connections) = opts.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }
        if let Some(max_connections) = opts.max_connections {
            pool_options = pool_options.max_connections(max_connections);
        }
        pool_options = pool_options.acquire_timeout(Duration::from_secs(5));

        let options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password)
            .ssl_mode(opts.ssl_mode);

        let pool = pool_options.connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<PostgresExecutor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(PostgresExecutor(conn))
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Postgres(ex))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
///
/// The `schema` may contain multiple statements and comments.
pub async fn run_schema(ex: &mut PostgresExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(ex.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Test utilities for the PostgreSQL connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Creates a new connection to the test database and initializes it.
    ///
    /// This sets up the database to use the `pg_temp` schema by default so that any tables
    /// created during the test are deleted at disconnection time.  Note that for this to work,
    /// the connection pool must maintain a single connection open at all times, but not more.
    ///
    /// Given that this is for testing purposes only, any errors will panic.
    pub async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = PostgresOptions::from_env("PGSQL_TEST").unwrap();
        opts.min_connections = Some(1);
        opts.max_connections = Some(1);
        let db = PostgresDb::connect(opts).unwrap();

        let mut ex = db.typed_ex().await.unwrap();
        sqlx::query("SET search_path TO pg_temp").execute(ex.conn()).await.unwrap();
        drop(ex);
        db
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use crate::db::tests::{generate_db_ro_concurrent_tests, generate_db_rw_tests};

    generate_db_ro_concurrent_tests!(
        {
            let _can_fail = env_logger::builder().is_test(true).try_init();

            // We don't use testutils::setup() here because that function limits concurrent
            // connections to 1 but we need at least 2 for the concurrent tests to succeed.
            // This means that the tests cannot write to the database because we did not set
            // up the `search_path`.
            Box::new(PostgresDb::connect(PostgresOptions::from_env("PGSQL_TEST").unwrap()).unwrap())
        },
        #[ignore = "Requires environment configuration and is expensive"]
    );

    generate_db_rw_tests!(
        Box::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );

    /// Environment overrides with all required variables for the `PGSQL` prefix.
    const REQUIRED_VARS: [(&str, Option<&str>); 5] = [
        ("PGSQL_HOST", Some("the-host")),
        ("PGSQL_PORT", Some("1234")),
        ("PGSQL_DATABASE", Some("the-database")),
        ("PGSQL_USERNAME", Some("the-username")),
        ("PGSQL_PASSWORD", Some("the-password")),
    ];

    #[test]
    pub fn test_postgres_options_from_env_all_required_present() {
        temp_env::with_vars(REQUIRED_VARS, || {
            let opts = PostgresOptions::from_env("PGSQL").unwrap();
            assert_eq!("the-host", opts.host);
            assert_eq!(1234, opts.port);
            assert_eq!("the-database", opts.database);
            assert_eq!("the-username", opts.username);
            assert_eq!("the-password", opts.password);
            assert!(matches!(opts.ssl_mode, PgSslMode::Prefer));
            assert_eq!(None, opts.min_connections);
            assert_eq!(None, opts.max_connections);
        });
    }

    #[test]
    pub fn test_postgres_options_from_env_all_required_and_optional_present() {
        let mut overrides = REQUIRED_VARS.to_vec();
        overrides.push(("PGSQL_SSL_MODE", Some("disable")));
        overrides.push(("PGSQL_MIN_CONNECTIONS", Some("10")));
        overrides.push(("PGSQL_MAX_CONNECTIONS", Some("20")));
        temp_env::with_vars(overrides, || {
            let opts = PostgresOptions::from_env("PGSQL").unwrap();
            assert_eq!("the-host", opts.host);
            assert!(matches!(opts.ssl_mode, PgSslMode::Disable));
            assert_eq!(Some(10), opts.min_connections);
            assert_eq!(Some(20), opts.max_connections);
        });
    }

    #[test]
    pub fn test_postgres_options_debug_hides_password() {
        temp_env::with_vars(REQUIRED_VARS, || {
            let opts = PostgresOptions::from_env("PGSQL").unwrap();
            let debug = format!("{:?}", opts);
            assert!(debug.contains("the-username"));
            assert!(!debug.contains("the-password"));
        });
    }

    #[test]
    pub fn test_postgres_options_from_env_missing() {
        for (var, _) in REQUIRED_VARS {
            let mut overrides = REQUIRED_VARS.to_vec();
            overrides.retain(|(name, _)| *name != var);
            overrides.push((var, None));
            temp_env::with_vars(overrides, || {
                let err = PostgresOptions::from_env("PGSQL").unwrap_err();
                assert!(err.contains(&format!("{} not present", var)));
            });
        }
    }

    #[test]
    pub fn test_postgres_options_bad_port_type() {
        let mut overrides = REQUIRED_VARS.to_vec();
        overrides.retain(|(name, _)| *name != "PGSQL_PORT");
        overrides.push(("PGSQL_PORT", Some("not a number")));
        temp_env::with_vars(overrides, || {
            let err = PostgresOptions::from_env("PGSQL").unwrap_err();
            assert!(err.contains("PGSQL_PORT"));
            assert!(err.contains("Invalid u16"));
        });
    }

    #[test]
    pub fn test_postgres_options_bad_ssl_mode() {
        let mut overrides = REQUIRED_VARS.to_vec();
        overrides.push(("PGSQL_SSL_MODE", Some("sometimes")));
        temp_env::with_vars(overrides, || {
            let err = PostgresOptions::from_env("PGSQL").unwrap_err();
            assert!(err.contains("PGSQL_SSL_MODE"));
        });
    }
}
