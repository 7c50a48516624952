//! Pass-through response type for upstream results.
//!
//! The gateway forwards whatever body and status the upstream service
//! produced. Use [`Forwarded`] instead of ad-hoc `(status, Json(..))`
//! tuples so the pass-through contract stays in one place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sams_client::ClientResponse;

/// An upstream JSON body forwarded verbatim with its original status.
///
/// Binary responses take a different, explicit path in the handlers --
/// this type is only ever JSON. Which of the two a route produces is a
/// static property of the operation, never inferred from the payload.
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl From<ClientResponse> for Forwarded {
    fn from(resp: ClientResponse) -> Self {
        Self {
            status: resp.status,
            body: resp.body,
        }
    }
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}
