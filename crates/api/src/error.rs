use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::services::tenancy::AccessDenied;

/// API error taxonomy. Every failure leaving a handler maps to exactly one
/// variant, and each variant carries a stable machine-readable code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown RFID tag")]
    UnknownTag,

    #[error("Student is not active")]
    StudentInactive,

    #[error("Student is not assigned to a dormitory")]
    StudentUnassigned,

    #[error("No attendance schedule is currently open")]
    NoActiveSchedule,

    #[error("Device is not authorized for this schedule")]
    DeviceNotAuthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", msg.clone())
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::UnknownTag => (
                StatusCode::NOT_FOUND,
                "unknown_tag",
                "No student matches the scanned tag".into(),
            ),
            ApiError::StudentInactive => (
                StatusCode::BAD_REQUEST,
                "student_inactive",
                "Student is not active".into(),
            ),
            ApiError::StudentUnassigned => (
                StatusCode::BAD_REQUEST,
                "student_unassigned",
                "Student is not assigned to a dormitory".into(),
            ),
            ApiError::NoActiveSchedule => (
                StatusCode::BAD_REQUEST,
                "no_active_schedule",
                "No attendance schedule is currently open".into(),
            ),
            ApiError::DeviceNotAuthorized => (
                StatusCode::FORBIDDEN,
                "device_not_authorized",
                "Device is not authorized for this schedule".into(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation(message)
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Inactive => ApiError::Forbidden("Account is not active".into()),
            AccessDenied::Forbidden => {
                ApiError::Forbidden("Operation not permitted for this role".into())
            }
            AccessDenied::NoDormitory => {
                ApiError::Forbidden("No dormitory assigned to this account".into())
            }
            AccessDenied::WrongTenant => {
                ApiError::Forbidden("Resource belongs to a different dormitory".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_maps_to_401() {
        let response = ApiError::Unauthenticated("no token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unknown_tag_maps_to_404() {
        let response = ApiError::UnknownTag.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_pipeline_rejections_map_to_400() {
        for err in [
            ApiError::StudentInactive,
            ApiError::StudentUnassigned,
            ApiError::NoActiveSchedule,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_device_not_authorized_maps_to_403() {
        let response = ApiError::DeviceNotAuthorized.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response = ApiError::Conflict("already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        // RowNotFound is the only sqlx variant constructible without a live
        // database connection.
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_access_denied_maps_to_forbidden() {
        for denied in [
            AccessDenied::Inactive,
            AccessDenied::Forbidden,
            AccessDenied::NoDormitory,
            AccessDenied::WrongTenant,
        ] {
            let err: ApiError = denied.into();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
