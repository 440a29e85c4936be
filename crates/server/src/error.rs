use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use favly_catalog::{CatalogError, RefreshError};
use favly_core::errors::DomainError;
use favly_core::password::PasswordError;
use favly_db::repositories::RepositoryError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("admin access required")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("catalog unavailable: {0}")]
    Upstream(String),
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Internal(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            // the internal detail goes to the log, not to the caller
            let correlation_id = Uuid::new_v4();
            error!(
                event_name = "api.request_failed",
                correlation_id = %correlation_id,
                status = %status,
                detail = %self.detail(),
                "request failed"
            );
            return (
                status,
                Json(json!({ "error": message, "correlation_id": correlation_id })),
            )
                .into_response();
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<RefreshError> for ApiError {
    fn from(error: RefreshError) -> Self {
        match error {
            RefreshError::Catalog(CatalogError::NotFound(id)) => {
                Self::NotFound(format!("product {id} not found"))
            }
            RefreshError::Catalog(CatalogError::Unavailable(message)) => Self::Upstream(message),
            RefreshError::Repository(inner) => Self::Internal(inner.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use favly_catalog::{CatalogError, RefreshError};
    use favly_core::domain::product::ProductId;
    use favly_db::repositories::RepositoryError;

    use super::ApiError;

    #[test]
    fn refresh_not_found_maps_to_404() {
        let error = ApiError::from(RefreshError::Catalog(CatalogError::NotFound(ProductId(9))));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn refresh_unavailable_maps_to_502() {
        let error = ApiError::from(RefreshError::Catalog(CatalogError::Unavailable(
            "connection refused".to_string(),
        )));
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn repository_errors_map_to_500_with_a_generic_message() {
        let error = ApiError::from(RepositoryError::Decode("boom".to_string()));
        assert_eq!(error.to_string(), "internal error");
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
    }
}
