//! Repository contract for the to-do record store.
//!
//! The store is split in two traits:
//!
//! - [`TodoRepository`]: the long-lived store object built once at startup.
//!   It owns the backend (connection pool or in-memory table), initializes
//!   the schema and hands out sessions.
//! - [`TodoSession`]: a store handle scoped to a single request. It carries
//!   every data operation and releases its backend resources when dropped.

pub mod error;
pub mod session;
pub mod store;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use session::TodoSession;
pub use store::TodoRepository;
