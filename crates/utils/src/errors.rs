use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalServerErrorWithContext(String),

    /// El débito excede el balance actual. No hay cambio de estado.
    #[error("saldo insuficiente: se requieren {required} puntos y tienes {balance}")]
    InsufficientFunds { required: f64, balance: f64 },

    #[error("no puedes apoyar tu propia publicación")]
    SelfSupportNotAllowed,

    /// Carries the status of the claim that already exists for (kind, item, actor).
    #[error("ya registraste apoyo para este item (estado: {0})")]
    DuplicateClaim(String),

    /// Expected outcome of the accept/auto-expire race; carries the actual
    /// terminal status. Informational, never destructive.
    #[error("ya fue resuelta (estado: {0})")]
    AlreadyResolved(String),

    #[error("{0}")]
    NotAuthorized(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::InternalServerErrorWithContext(format!("database error: {}", err))
    }
}

impl AppError {
    /// True for the five recoverable domain conditions that surface to the
    /// requester as plain rejection/status messages.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            AppError::InsufficientFunds { .. }
                | AppError::SelfSupportNotAllowed
                | AppError::DuplicateClaim(_)
                | AppError::AlreadyResolved(_)
                | AppError::NotAuthorized(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SelfSupportNotAllowed => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateClaim(_) => StatusCode::CONFLICT,
            AppError::AlreadyResolved(_) => StatusCode::CONFLICT,
            AppError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            AppError::InternalServerErrorWithContext(_) | AppError::AnyhowError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Detects the E11000 duplicate-key error so repositories can translate the
/// unique-index race into a domain error instead of a storage failure.
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::BulkWrite(bulk) => bulk
            .write_errors
            .as_ref()
            .map(|errors| errors.iter().any(|e| e.code == 11000))
            .unwrap_or(false),
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_recoverable() {
        assert!(AppError::InsufficientFunds { required: 3.0, balance: 1.0 }.is_domain_error());
        assert!(AppError::SelfSupportNotAllowed.is_domain_error());
        assert!(AppError::DuplicateClaim("pending".to_string()).is_domain_error());
        assert!(AppError::AlreadyResolved("accepted".to_string()).is_domain_error());
        assert!(AppError::NotAuthorized("no".to_string()).is_domain_error());

        assert!(!AppError::NotFound("x".to_string()).is_domain_error());
        assert!(!AppError::InternalServerErrorWithContext("x".to_string()).is_domain_error());
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = AppError::InsufficientFunds { required: 5.0, balance: 2.0 };
        let message = err.to_string();

        assert!(message.contains("5"));
        assert!(message.contains("2"));
        println!("✅ 测试通过: insufficient_funds_message -> {}", message);
    }

    #[test]
    fn test_already_resolved_reports_terminal_state() {
        let err = AppError::AlreadyResolved("auto_accepted".to_string());
        assert!(err.to_string().contains("auto_accepted"));
    }
}
