//! Mapping of domain errors onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use ts_core::errors::{AuthError, DomainError};
use ts_shared::{error_codes, ErrorResponse};
use validator::ValidationErrors;

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Every credential rejection becomes the same 401 body. Storage and other
/// server faults become 500 and are logged; client errors are not.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Unauthorized => unauthorized(),

        DomainError::Auth(AuthError::InvalidCredentials) => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, AuthError::InvalidCredentials.to_string()),
        ),

        DomainError::Token(token_error) if token_error.is_rejection() => unauthorized(),

        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message)),

        DomainError::NotFound { resource } => not_found(&resource),

        DomainError::Conflict { field } => HttpResponse::Conflict().json(
            ErrorResponse::new(error_codes::CONFLICT, format!("{} is already in use", field))
                .add_detail("field", field),
        ),

        DomainError::Storage { message } => {
            tracing::error!(%message, "Storage failure");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::STORAGE_UNAVAILABLE,
                "The service is temporarily unavailable",
            ))
        }

        other => {
            tracing::error!(error = %other, "Internal failure");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 response listing the failed fields of a request body
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();

    for (field, errors) in errors.field_errors() {
        let messages = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        field_errors.insert(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Please check the submitted data")
            .add_detail("fields", field_errors),
    )
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(error_codes::UNAUTHORIZED, "Unauthorized"))
}

fn not_found(resource: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        format!("{} not found", resource),
    ))
}

/// `DomainError` as an actix error, for code paths that must return `Err`
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Unauthorized | DomainError::Auth(AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Token(e) if e.is_rejection() => StatusCode::UNAUTHORIZED,
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::errors::TokenError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Auth(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (DomainError::Token(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (DomainError::Token(TokenError::SigningFailed), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Validation { message: "bad".into() }, StatusCode::BAD_REQUEST),
            (DomainError::NotFound { resource: "User".into() }, StatusCode::NOT_FOUND),
            (DomainError::Conflict { field: "email".into() }, StatusCode::CONFLICT),
            (DomainError::storage("down"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Internal { message: "boom".into() }, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            let api_error = ApiError(error.clone());
            assert_eq!(api_error.status_code(), status, "{:?}", error);
            assert_eq!(handle_domain_error(error).status(), status);
        }
    }
}
