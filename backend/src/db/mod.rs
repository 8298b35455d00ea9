//! Database module for to-do storage.
//!
//! This module provides the record store behind the HTTP API via the
//! Repository pattern, allowing different storage backends to be swapped
//! easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (one session per request)                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  TodoRepository / TodoSession traits                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼──────────┐
//! │ LocalRepository  │   │ PostgresRepository   │
//! │  (in-memory)     │   │  (Diesel + r2d2)     │
//! └──────────────────┘   └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use todo_service::db::{RepositoryFactory, TodoRepository};
//! use todo_service::api::NewTodo;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     repo.initialize_schema().await?;
//!
//!     let mut session = repo.acquire().await?;
//!     let todo = session.create(NewTodo::new("write docs")).await?;
//!     println!("created {}", todo.id);
//!     Ok(())
//! }
//! ```
//!
//! There is no process-wide repository: the binary builds one store object
//! and passes it to the HTTP layer explicitly.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PoolStats, PostgresConfig, PostgresRepository};
pub use repository::{
    ErrorContext, RepositoryError, RepositoryResult, TodoRepository, TodoSession,
};
