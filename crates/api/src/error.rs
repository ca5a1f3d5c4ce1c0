use autosocial_core::error::AnalysisError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Every error leaves the service as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("{prefix}: {message}")]
    Internal {
        prefix: &'static str,
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    /// Logs and reports the failure; the message is echoed to the caller after `prefix`.
    pub fn internal(prefix: &'static str, err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "{prefix}");
        ApiError::Internal {
            prefix,
            message: err.to_string(),
        }
    }

    pub fn from_analysis(prefix: &'static str, err: AnalysisError) -> Self {
        if err.is_client_error() {
            tracing::warn!(error = %err, "rejected analysis request");
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::internal(prefix, err.into())
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), error = %rejection.body_text(), "invalid request body");
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let err = ApiError::from_analysis("Analysis failed", AnalysisError::NoContent);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No valid content found in posts");
    }

    #[test]
    fn internal_errors_are_prefixed() {
        let err = ApiError::from_analysis(
            "Overall analysis failed",
            AnalysisError::InvalidField {
                field: "engagement_score",
                expected: "a number",
                found: "\"x\"".to_string(),
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Overall analysis failed: engagement_score must be a number, got \"x\""
        );
    }
}
