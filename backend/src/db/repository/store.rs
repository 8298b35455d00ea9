//! Store object trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use super::session::TodoSession;

/// Long-lived handle on the backing store.
///
/// Constructed explicitly at startup and shared (behind an `Arc`) by the
/// HTTP layer. Holds no per-request state.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Create the `todo` table if it does not exist yet.
    ///
    /// Idempotent; called once before the server accepts traffic.
    async fn initialize_schema(&self) -> RepositoryResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Acquire a store handle for one request.
    ///
    /// The returned session owns whatever backend resource it needs (e.g. a
    /// pooled connection) until it is dropped.
    ///
    /// # Returns
    /// * `Ok(session)` - A ready-to-use session
    /// * `Err(RepositoryError::ConnectionError)` - If the backend is unreachable
    async fn acquire(&self) -> RepositoryResult<Box<dyn TodoSession>>;
}
