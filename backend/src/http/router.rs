//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::db::repository::{RepositoryResult, TodoRepository};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Public demo service: every origin, method and header is allowed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::list_todos))
        .route("/create-todo", post(handlers::create_todo))
        .route("/complete-todos", get(handlers::list_complete_todos))
        .route("/incomplete-todos", get(handlers::list_incomplete_todos))
        .route("/check-todo/{id}", put(handlers::check_todo))
        .route("/update-todo/{id}", put(handlers::update_todo))
        .route("/del/{id}", delete(handlers::delete_todo))
        .route("/delete-all", delete(handlers::delete_all_todos))
        .route("/health", get(handlers::health_check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Initialize the store schema, then build the router around it.
///
/// Both the server binary and the integration tests start the application
/// through here.
pub async fn init_app(repository: Arc<dyn TodoRepository>) -> RepositoryResult<Router> {
    repository.initialize_schema().await?;
    tracing::info!("schema initialized");
    Ok(create_router(AppState::new(repository)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn TodoRepository>;
        let _router = create_router(AppState::new(repo));
    }

    #[tokio::test]
    async fn test_init_app_with_local_repository() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn TodoRepository>;
        assert!(init_app(repo).await.is_ok());
    }
}
