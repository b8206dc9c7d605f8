/// Error types for engagement-service
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You cannot subscribe to your own channel")]
    SelfSubscription,

    /// Unauthorized read of unpublished content. Reported to callers as
    /// not-found so the existence of private content does not leak.
    #[error("Access denied")]
    AccessDenied,

    /// Lost the insert race on a unique (subscriber, channel) pair.
    /// Internal signal only: the toggle service recovers by retrying the
    /// opposite branch, callers never see this variant.
    #[error("Relationship already exists")]
    DuplicateRelationship,

    /// An atomic operation was aborted mid-flight. No partial state is
    /// visible; safe to retry.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    /// A partial effect was detected (e.g. view counter increment failed
    /// after the history append). Fatal for the request; never retried
    /// silently.
    #[error("Consistency failure: {0}")]
    ConsistencyFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// True if the underlying database error is a Postgres unique
    /// violation (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(sqlx_err) => sqlx_err
                .as_database_error()
                .map(|db_err| db_err.code().as_deref() == Some("23505"))
                .unwrap_or(false),
            AppError::DuplicateRelationship => true,
            _ => false,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        let message = match self {
            // Same body as a genuine not-found; do not leak existence.
            AppError::AccessDenied => "Not found: video does not exist".to_string(),
            AppError::ConsistencyFailure(_)
            | AppError::TransactionFailure(_)
            | AppError::Database(_)
            | AppError::DuplicateRelationship => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(code).json(ErrorResponse {
            error: message,
            code: code.as_u16(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::AccessDenied => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::SelfSubscription => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_is_reported_as_not_found() {
        assert_eq!(AppError::AccessDenied.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::NotFound("video does not exist".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn self_subscription_is_a_client_error() {
        assert_eq!(
            AppError::SelfSubscription.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn transactional_faults_are_server_errors() {
        assert_eq!(
            AppError::TransactionFailure("abort".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ConsistencyFailure("partial effect".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_relationship_counts_as_unique_violation() {
        assert!(AppError::DuplicateRelationship.is_unique_violation());
        assert!(!AppError::AccessDenied.is_unique_violation());
    }
}
