use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failures reported by the storage layer.
#[derive(Debug)]
pub enum StorageError {
    /// Another record already holds the same CPF.
    UniqueViolation,
    /// Any other integrity constraint rejected the statement.
    ConstraintViolation(String),
    /// No record matches the given CPF.
    NotFound,
    /// Unclassified database failure (connectivity, serialization, ...).
    Database(sqlx::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::UniqueViolation => write!(f, "unique constraint violated on cpf"),
            StorageError::ConstraintViolation(msg) => write!(f, "constraint violated: {}", msg),
            StorageError::NotFound => write!(f, "record not found"),
            StorageError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    /// Classifies a `sqlx::Error` by the kind of the underlying database error.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::UniqueViolation
            }
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
            {
                StorageError::ConstraintViolation(db_err.message().to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}

/// Input rejected before reaching storage or the CEP upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field absent or blank.
    Missing(&'static str),
    /// Field longer than its column allows.
    TooLong { field: &'static str, max: usize },
    /// Field present but not in the expected format.
    Malformed { field: &'static str, expected: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "campo '{}' é obrigatório", field),
            ValidationError::TooLong { field, max } => {
                write!(f, "campo '{}' excede {} caracteres", field, max)
            }
            ValidationError::Malformed { field, expected } => {
                write!(f, "campo '{}' inválido, formato esperado: {}", field, expected)
            }
        }
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Resource not found error.
    NotFound(String),
    /// Business key collision.
    Conflict(String),
    /// Bad request error (invalid input or unclassified failure on mutation).
    BadRequest(String),
    /// The CEP upstream failed, timed out, or returned an unusable body.
    UpstreamUnavailable(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) | AppError::UpstreamUnavailable(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and a
    /// `{"message": ...}` JSON body. Server-side details are logged, never returned.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                "Erro interno ao acessar a base de dados".to_string()
            }
            AppError::NotFound(msg) | AppError::Conflict(msg) | AppError::BadRequest(msg) => msg,
            AppError::UpstreamUnavailable(msg) => {
                tracing::warn!("CEP upstream error: {}", msg);
                "Não foi encontrado endereço para o CEP informado. Verifique o campo CEP."
                    .to_string()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Erro interno do servidor".to_string()
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                return (*source).into_response();
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
