use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    Json,
};
use bookinv_types::{ApiResponse, ValidationErrors};
use http::StatusCode;
use tracing::{debug, error};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("Validation failed")]
    ValidationFailed(ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage unavailable")]
    StorageUnavailable,

    #[error("Internal server error")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StorageUnavailable | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<bookinv_dal::Error> for ApiError {
    fn from(value: bookinv_dal::Error) -> Self {
        match value {
            bookinv_dal::Error::RecordNotFound(_) => ApiError::ResourceNotFound("Book".into()),
            bookinv_dal::Error::ValidationFailed(errors) => ApiError::ValidationFailed(errors),
            bookinv_dal::Error::Conflict(msg) => ApiError::Conflict(msg),
            bookinv_dal::Error::StorageUnavailable(_) => ApiError::StorageUnavailable,
            e @ bookinv_dal::Error::MigrationFailed(_) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::InvalidRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        debug!("Path rejected: {value}");
        ApiError::ResourceNotFound("Resource".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self:?}");
        } else {
            debug!("Request rejected: {self}");
        }
        let message = self.to_string();
        let errors = match self {
            ApiError::ValidationFailed(errors) => Some(errors),
            _ => None,
        };
        (status, Json(ApiResponse::<()>::failure(message, errors))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dal_error_mapping() {
        let e: ApiError = bookinv_dal::Error::RecordNotFound("Book abc".into()).into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "Book not found");

        let e: ApiError = bookinv_dal::Error::Conflict("taken".into()).into();
        assert_eq!(e.status(), StatusCode::CONFLICT);

        let e: ApiError =
            bookinv_dal::Error::ValidationFailed(ValidationErrors::single("title", "not set"))
                .into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);

        let e: ApiError = bookinv_dal::Error::StorageUnavailable(Box::new(std::io::Error::other(
            "disk on fire",
        )))
        .into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!e.to_string().contains("disk"));
    }
}
