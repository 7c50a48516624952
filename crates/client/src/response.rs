//! Result and payload types exchanged with the upstream asset service.

use bytes::Bytes;
use reqwest::StatusCode;

/// A body-plus-status result from a JSON-returning upstream operation.
///
/// Upstream 4xx/5xx statuses are carried here as data, not surfaced as
/// [`ClientError`] -- the gateway forwards them to the caller verbatim.
/// [`ClientError`] is reserved for failures of the call itself.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    /// HTTP status the upstream service answered with.
    pub status: StatusCode,
    /// Decoded JSON body; `Null` when the upstream body was empty.
    pub body: serde_json::Value,
}

/// A binary part captured from an inbound multipart request, ready to be
/// forwarded upstream.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A retrieved asset binary plus the metadata needed to build a download
/// response (content-type, length, disposition filename).
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Errors from the upstream client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The asset binary could not be located upstream.
    #[error("asset binary not found: {id}")]
    FileNotFound { id: String },

    /// A binary endpoint answered with a non-success status.
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The upstream body could not be decoded as expected.
    #[error("unexpected upstream payload: {0}")]
    UnexpectedPayload(String),
}
