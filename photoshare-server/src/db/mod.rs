//! Database layer - pool, lazy schema setup, and a small query facade
//!
//! Callers go through three verbs on [`Database`]:
//! - `all`: every row as a [`Record`]
//! - `get`: first row, or `None`
//! - `run`: side effect only
//!
//! The photos/users tables are created once per process before the first
//! verb runs. Driver errors pass through untouched as [`DbError::Sqlx`].

pub mod models;
pub mod param;
pub mod placeholders;
pub mod record;
pub mod schema;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::OnceCell;

pub use models::{Photo, UserProfile, DEFAULT_USER_ID};
pub use param::Param;
pub use placeholders::convert_placeholders;
pub use record::Record;

use param::{bind_params, bind_params_as};
use record::row_to_record;

/// Kept low for a single photo-sharing instance.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a query waits for a free pooled connection.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool options used by [`Database::connect`].
pub fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .acquire_timeout(DEFAULT_ACQUIRE_TIMEOUT)
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Pooled database handle. Cheap to clone; clones share the schema guard.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    schema: Arc<SchemaGuard>,
}

#[derive(Default)]
struct SchemaGuard {
    ready: OnceCell<()>,
    setups: AtomicUsize,
}

impl Database {
    /// Wrap an existing pool. Tables are created on first use.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: Arc::new(SchemaGuard::default()),
        }
    }

    /// Connect with [`pool_options`] and create the tables before returning.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        Self::connect_with(pool_options(), database_url).await
    }

    /// Connect with caller-supplied pool options.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the table setup fails.
    pub async fn connect_with(options: PgPoolOptions, database_url: &str) -> Result<Self, DbError> {
        let db = Self::new(options.connect(database_url).await?);
        db.ensure_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether schema setup has completed in this process.
    pub fn is_initialized(&self) -> bool {
        self.schema.ready.initialized()
    }

    /// Number of times the table DDL has been executed (successful or not).
    pub fn schema_setups(&self) -> usize {
        self.schema.setups.load(Ordering::SeqCst)
    }

    /// Create the tables if this process has not done so yet.
    ///
    /// Concurrent first callers wait on a single setup. A failed setup is
    /// not remembered, so the next call tries again.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        self.schema
            .ready
            .get_or_try_init(|| async {
                self.schema.setups.fetch_add(1, Ordering::SeqCst);
                schema::create_tables(&self.pool).await
            })
            .await?;
        Ok(())
    }

    /// Every row the query returns, in order.
    pub async fn all(&self, query: &str, params: &[Param]) -> Result<Vec<Record>, DbError> {
        self.ensure_schema().await?;
        let sql = convert_placeholders(query);
        tracing::debug!(sql = %sql, params = params.len(), "db all");

        let rows = bind_params(sqlx::query(&sql), params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(row_to_record)
            .collect::<Result<_, _>>()
            .map_err(DbError::from)
    }

    /// First row the query returns, or `None` when there are no rows.
    pub async fn get(&self, query: &str, params: &[Param]) -> Result<Option<Record>, DbError> {
        self.ensure_schema().await?;
        let sql = convert_placeholders(query);
        tracing::debug!(sql = %sql, params = params.len(), "db get");

        let row = bind_params(sqlx::query(&sql), params)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(row_to_record)
            .transpose()
            .map_err(DbError::from)
    }

    /// Execute the query for its side effect.
    pub async fn run(&self, query: &str, params: &[Param]) -> Result<(), DbError> {
        self.ensure_schema().await?;
        let sql = convert_placeholders(query);
        tracing::debug!(sql = %sql, params = params.len(), "db run");

        bind_params(sqlx::query(&sql), params)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Like [`Database::all`], decoding rows into `T`.
    pub async fn all_as<T>(&self, query: &str, params: &[Param]) -> Result<Vec<T>, DbError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        self.ensure_schema().await?;
        let sql = convert_placeholders(query);

        let rows = bind_params_as(sqlx::query_as::<_, T>(&sql), params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Like [`Database::get`], decoding the row into `T`.
    pub async fn get_as<T>(&self, query: &str, params: &[Param]) -> Result<Option<T>, DbError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        self.ensure_schema().await?;
        let sql = convert_placeholders(query);

        let row = bind_params_as(sqlx::query_as::<_, T>(&sql), params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Cheap connectivity check.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
