use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sams_client::ClientError;
use sams_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
///
/// Upstream error *statuses* never pass through here -- those are carried
/// as body-plus-status pass-throughs by the handlers. This type covers the
/// locally detected preconditions and failures of the upstream call itself.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain-level error from `sams_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required header was absent from the request.
    #[error("{0} field missing in header")]
    MissingHeader(&'static str),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upstream asset service call failed.
    #[error(transparent)]
    Upstream(#[from] ClientError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            ApiError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Local precondition failures ---
            ApiError::MissingHeader(name) => (
                StatusCode::BAD_REQUEST,
                "MISSING_HEADER",
                format!("{name} field missing in header"),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // --- Upstream call failures ---
            ApiError::Upstream(err) => classify_client_error(err),

            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an upstream client error into an HTTP status, error code,
/// and message.
///
/// - A missing asset binary maps to 404.
/// - Transport and payload failures map to 502 with a sanitized message;
///   the real cause goes to the log, not the caller.
fn classify_client_error(err: &ClientError) -> (StatusCode, &'static str, String) {
    match err {
        ClientError::FileNotFound { id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("asset binary not found: {id}"),
        ),
        other => {
            tracing::error!(error = %other, "Upstream asset service error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The upstream asset service request failed".to_string(),
            )
        }
    }
}
