//! Error types for repository operations.
//!
//! Failures carry an [`ErrorContext`] naming the operation and, for
//! single-item operations, the todo id involved.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Store operation, e.g. `toggle_complete`
    pub operation: Option<String>,
    /// Entity kind, always `todo` for item operations
    pub entity: Option<String>,
    /// Id of the item the operation targeted
    pub entity_id: Option<String>,
    /// Backend-specific detail (pool state, db error kind, ...)
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }

    /// Fill in fields from `outer`; fields `outer` leaves unset are kept.
    fn merge(&mut self, outer: ErrorContext) {
        let ErrorContext {
            operation,
            entity,
            entity_id,
            details,
        } = outer;
        self.operation = operation.or(self.operation.take());
        self.entity = entity.or(self.entity.take());
        self.entity_id = entity_id.or(self.entity_id.take());
        self.details = details.or(self.details.take());
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

fn suffix(context: &ErrorContext) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" {}", context)
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backend could not be reached or dropped the connection.
    #[error("Connection error: {message}{}", suffix(.context))]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// A statement was rejected by the backend.
    #[error("Query error: {message}{}", suffix(.context))]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// A lookup that must match a row matched none.
    #[error("Not found: {message}{}", suffix(.context))]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Bad or missing configuration at startup.
    #[error("Configuration error: {message}{}", suffix(.context))]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Row decoding, migrations or a panicked blocking task.
    #[error("Internal error: {message}{}", suffix(.context))]
    InternalError {
        message: String,
        context: ErrorContext,
    },

    /// No pooled connection became free within the checkout timeout.
    #[error("Timeout error: {message}{}", suffix(.context))]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Whether the backing store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError { .. } | Self::TimeoutError { .. }
        )
    }

    /// The cause without the variant prefix or context.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError { message, .. }
            | Self::QueryError { message, .. }
            | Self::NotFound { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::InternalError { message, .. }
            | Self::TimeoutError { message, .. } => message,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    /// Attach where the error happened. Fields already recorded by the
    /// conversion (e.g. `details`) survive unless `context` sets them too.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        match &mut self {
            Self::ConnectionError { context: own, .. }
            | Self::QueryError { context: own, .. }
            | Self::NotFound { context: own, .. }
            | Self::ConfigurationError { context: own, .. }
            | Self::InternalError { context: own, .. }
            | Self::TimeoutError { context: own, .. } => own.merge(context),
        }
        self
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => RepositoryError::not_found("Record not found"),
            Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                RepositoryError::connection(info.message().to_string())
                    .with_context(ErrorContext::default().with_details("closed_connection"))
            }
            Error::DatabaseError(kind, info) => RepositoryError::query(info.message().to_string())
                .with_context(ErrorContext::default().with_details(format!("{:?}", kind))),
            Error::DeserializationError(e) => {
                RepositoryError::internal(format!("Deserialization error: {}", e))
            }
            Error::SerializationError(e) => {
                RepositoryError::internal(format!("Serialization error: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

/// r2d2 only fails a checkout once its connection timeout has elapsed.
#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::timeout(err.to_string())
            .with_context(ErrorContext::default().with_details("pool checkout"))
    }
}
