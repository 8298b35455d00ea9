//! Request extractors.
//!
//! Wrappers around axum's `Json` and `Path` that reject with [`AppError`] so
//! malformed input gets the same JSON error body as every other failure, plus
//! the per-request store session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use super::error::AppError;
use super::state::AppState;
use crate::db::repository::{RepositoryError, TodoRepository, TodoSession};

/// JSON request body; decoding failures become 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters; a non-integer id becomes 422.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// The request's store handle.
///
/// Extraction only captures the store; the session is acquired on first use
/// inside the handler, after path and body have been decoded, so malformed
/// requests are answered with 422 without touching storage. The session is
/// released when the handler returns on any path.
pub struct StoreSession {
    repository: Arc<dyn TodoRepository>,
    session: Option<Box<dyn TodoSession>>,
}

impl StoreSession {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self {
            repository,
            session: None,
        }
    }

    /// Acquire the session on first call and reuse it afterwards.
    pub async fn get(&mut self) -> Result<&mut Box<dyn TodoSession>, AppError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.repository.acquire().await.map_err(|e| {
                if e.is_unavailable() {
                    e
                } else {
                    RepositoryError::connection(format!("Failed to acquire store session: {}", e))
                }
            })?,
        };
        Ok(self.session.insert(session))
    }
}

impl FromRequestParts<AppState> for StoreSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(StoreSession::new(Arc::clone(&state.repository)))
    }
}
