//! Tests for db::repository::error.

use todo_service::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_builders() {
    let ctx = ErrorContext::new("update")
        .with_entity("todo")
        .with_entity_id(123)
        .with_details("some details");
    assert_eq!(ctx.operation.as_deref(), Some("update"));
    assert_eq!(ctx.entity.as_deref(), Some("todo"));
    assert_eq!(ctx.entity_id.as_deref(), Some("123"));
    assert_eq!(ctx.details.as_deref(), Some("some details"));
    assert!(!ctx.is_empty());
    assert!(ErrorContext::default().is_empty());
}

#[test]
fn test_error_display_without_context_has_no_brackets() {
    let err = RepositoryError::connection("refused");
    assert_eq!(err.to_string(), "Connection error: refused");
    assert_eq!(err.message(), "refused");
}

#[test]
fn test_error_display_includes_context() {
    let err = RepositoryError::query("syntax error")
        .with_context(ErrorContext::new("delete").with_entity("todo").with_entity_id(9));
    assert_eq!(
        err.to_string(),
        "Query error: syntax error [operation=delete, entity=todo, id=9]"
    );
    assert_eq!(err.message(), "syntax error");
}

#[test]
fn test_unavailable_classification() {
    assert!(RepositoryError::connection("refused").is_unavailable());
    assert!(RepositoryError::timeout("pool exhausted").is_unavailable());
    assert!(!RepositoryError::query("bad").is_unavailable());
    assert!(!RepositoryError::not_found("missing").is_unavailable());
    assert!(!RepositoryError::configuration("no url").is_unavailable());
    assert!(!RepositoryError::internal("oops").is_unavailable());
}

#[test]
fn test_with_context_overrides_operation_and_keeps_variant() {
    let err = RepositoryError::internal("boom")
        .with_context(ErrorContext::new("first"))
        .with_context(ErrorContext::new("second"));
    assert_eq!(err.context().operation.as_deref(), Some("second"));
    assert!(matches!(err, RepositoryError::InternalError { .. }));
}

#[cfg(feature = "postgres-repo")]
#[test]
fn test_from_diesel_not_found() {
    let err: RepositoryError = diesel::result::Error::NotFound.into();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}
