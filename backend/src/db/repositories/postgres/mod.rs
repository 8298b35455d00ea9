//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - One pooled connection per session, returned to the pool on drop
//! - Schema creation through embedded migrations
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//!
//! Failures are never retried here; they propagate to the caller as-is.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::api::{NewTodo, Todo, TodoChanges, TodoId};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, TodoRepository, TodoSession,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;
type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        Ok(Self::with_url(database_url).with_pool_env())
    }

    /// Create configuration for the test database.
    ///
    /// Reads `TEST_DATABASE_URL` instead of `DATABASE_URL` so test runs never
    /// touch the live database. Pool variables apply as in [`Self::from_env`].
    pub fn from_test_env() -> Result<Self, String> {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .map_err(|_| "TEST_DATABASE_URL must be set".to_string())?;

        Ok(Self::with_url(database_url).with_pool_env())
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    fn with_pool_env(mut self) -> Self {
        if let Some(v) = env_parse::<u32>("PG_POOL_MAX") {
            self.max_pool_size = v;
        }
        if let Some(v) = env_parse::<u32>("PG_POOL_MIN") {
            self.min_pool_size = v;
        }
        if let Some(v) = env_parse::<u64>("PG_CONN_TIMEOUT_SEC") {
            self.connection_timeout_sec = v;
        }
        if let Some(v) = env_parse::<u64>("PG_IDLE_TIMEOUT_SEC") {
            self.idle_timeout_sec = v;
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total statements executed
    pub total_queries: u64,
    /// Total failed statements
    pub failed_queries: u64,
}

#[derive(Debug, Default)]
struct QueryCounters {
    total: AtomicU64,
    failed: AtomicU64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    counters: Arc<QueryCounters>,
}

impl PostgresRepository {
    /// Create a new repository with a connection pool.
    ///
    /// The schema is not touched here; call
    /// [`TodoRepository::initialize_schema`] before serving.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot open its first connections
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_context(
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        Ok(Self {
            pool,
            config,
            counters: Arc::new(QueryCounters::default()),
        })
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.counters.total.load(Ordering::Relaxed),
            failed_queries: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Check out a connection on a blocking thread.
    async fn checkout(&self, operation: &'static str) -> RepositoryResult<PgPooledConnection> {
        let pool = self.pool.clone();
        task::spawn_blocking(move || pool.get())
            .await
            .map_err(|e| join_error(e, operation))?
            .map_err(|e| RepositoryError::from(e).with_context(ErrorContext::new(operation)))
    }
}

/// Run pending database migrations.
fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
    conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        RepositoryError::internal(format!("Migration failed: {}", e))
            .with_context(ErrorContext::new("run_migrations"))
    })?;

    Ok(())
}

fn join_error(err: task::JoinError, operation: &str) -> RepositoryError {
    RepositoryError::internal(format!("Task join error: {}", err))
        .with_context(ErrorContext::new(operation).with_details("spawn_blocking"))
}

/// Context for a statement touching the whole `todo` table.
fn table_context(operation: &str) -> ErrorContext {
    ErrorContext::new(operation).with_entity("todo")
}

/// Context for a statement targeting one item.
fn item_context(operation: &str, id: TodoId) -> ErrorContext {
    table_context(operation).with_entity_id(id)
}

#[async_trait]
impl TodoRepository for PostgresRepository {
    async fn initialize_schema(&self) -> RepositoryResult<()> {
        let mut conn = self.checkout("initialize_schema").await?;
        task::spawn_blocking(move || run_migrations(&mut *conn))
            .await
            .map_err(|e| join_error(e, "initialize_schema"))??;
        log::info!("postgres: schema ready");
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        let mut conn = self.checkout("health_check").await?;
        task::spawn_blocking(move || {
            sql_query("SELECT 1")
                .execute(&mut *conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
        .map_err(|e| join_error(e, "health_check"))?
    }

    async fn acquire(&self) -> RepositoryResult<Box<dyn TodoSession>> {
        let conn = self.checkout("acquire").await?;
        Ok(Box::new(PostgresSession {
            conn: Some(conn),
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Session holding one pooled connection.
///
/// The connection goes back to the pool when the session is dropped.
pub struct PostgresSession {
    conn: Option<PgPooledConnection>,
    counters: Arc<QueryCounters>,
}

impl PostgresSession {
    /// Run one Diesel statement on the session's connection.
    ///
    /// The connection is moved onto a blocking thread for the duration of the
    /// statement and handed back afterwards.
    async fn run<T, F>(&mut self, context: ErrorContext, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    {
        let operation = context.operation.clone().unwrap_or_default();
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                return Err(RepositoryError::connection(
                    "session connection was lost by a previous operation",
                )
                .with_context(context))
            }
        };

        self.counters.total.fetch_add(1, Ordering::Relaxed);
        let (conn, result) = task::spawn_blocking(move || {
            let result = f(&mut *conn);
            (conn, result)
        })
        .await
        .map_err(|e| join_error(e, &operation))?;
        self.conn = Some(conn);

        result.map_err(|e| {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            log::warn!("postgres: {} failed: {}", operation, e);
            RepositoryError::from(e).with_context(context)
        })
    }
}

#[async_trait]
impl TodoSession for PostgresSession {
    async fn create(&mut self, new: NewTodo) -> RepositoryResult<Todo> {
        let row = NewTodoRow {
            text: new.text,
            is_complete: new.is_complete,
        };
        let inserted = self
            .run(table_context("create"), move |conn| {
                diesel::insert_into(todo::table)
                    .values(&row)
                    .returning(TodoRow::as_returning())
                    .get_result::<TodoRow>(conn)
            })
            .await?;
        log::debug!("postgres: created todo {}", inserted.id);
        Ok(inserted.into())
    }

    async fn get_all(&mut self) -> RepositoryResult<Vec<Todo>> {
        let rows = self
            .run(table_context("get_all"), |conn| {
                todo::table
                    .select(TodoRow::as_select())
                    .order(todo::id.asc())
                    .load::<TodoRow>(conn)
            })
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_completion(&mut self, is_complete: bool) -> RepositoryResult<Vec<Todo>> {
        let rows = self
            .run(table_context("get_by_completion"), move |conn| {
                todo::table
                    .filter(todo::is_complete.eq(is_complete))
                    .select(TodoRow::as_select())
                    .order(todo::id.asc())
                    .load::<TodoRow>(conn)
            })
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        let row = self
            .run(item_context("get_by_id", id), move |conn| {
                todo::table
                    .find(id.value())
                    .select(TodoRow::as_select())
                    .first::<TodoRow>(conn)
                    .optional()
            })
            .await?;
        Ok(row.map(Into::into))
    }

    async fn update(
        &mut self,
        id: TodoId,
        changes: TodoChanges,
    ) -> RepositoryResult<Option<Todo>> {
        // Diesel rejects an UPDATE with an empty SET clause.
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let changeset = TodoChangeset::from(changes);
        let row = self
            .run(item_context("update", id), move |conn| {
                diesel::update(todo::table.find(id.value()))
                    .set(&changeset)
                    .returning(TodoRow::as_returning())
                    .get_result::<TodoRow>(conn)
                    .optional()
            })
            .await?;
        Ok(row.map(Into::into))
    }

    async fn toggle_complete(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        let row = self
            .run(item_context("toggle_complete", id), move |conn| {
                diesel::update(todo::table.find(id.value()))
                    .set(todo::is_complete.eq(diesel::dsl::not(todo::is_complete)))
                    .returning(TodoRow::as_returning())
                    .get_result::<TodoRow>(conn)
                    .optional()
            })
            .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&mut self, id: TodoId) -> RepositoryResult<bool> {
        let deleted = self
            .run(item_context("delete", id), move |conn| {
                diesel::delete(todo::table.find(id.value())).execute(conn)
            })
            .await?;
        Ok(deleted > 0)
    }

    async fn delete_all(&mut self) -> RepositoryResult<usize> {
        let deleted = self
            .run(table_context("delete_all"), |conn| diesel::delete(todo::table).execute(conn))
            .await?;
        log::debug!("postgres: deleted {} todos", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_url_uses_pool_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/todos");
        assert_eq!(config.database_url, "postgres://localhost/todos");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout_sec, 30);
        assert_eq!(config.idle_timeout_sec, 600);
    }

    #[test]
    fn test_item_context_names_the_todo() {
        let err = RepositoryError::query("deadlock detected")
            .with_context(item_context("toggle_complete", TodoId::new(5)));
        assert_eq!(
            err.to_string(),
            "Query error: deadlock detected [operation=toggle_complete, entity=todo, id=5]"
        );
    }

    #[test]
    fn test_changeset_keeps_only_supplied_fields() {
        let changeset = TodoChangeset::from(TodoChanges::default().with_is_complete(true));
        assert!(changeset.text.is_none());
        assert_eq!(changeset.is_complete, Some(true));
    }
}
