//! Asset operations against the upstream SAMS service.
//!
//! [`AssetService`] abstracts the remote asset-management API so that
//! gateway handlers can be exercised against a test double.
//! [`SamsAssetClient`] wraps the real HTTP endpoints using [`reqwest`].

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::StatusCode;
use sams_core::literal::encode_id_list;

use crate::response::{AssetFile, ClientError, ClientResponse, UploadFile};

/// Remote asset-management operations used by the gateway.
///
/// Every JSON-returning call yields the upstream body and status verbatim
/// as a [`ClientResponse`]; implementations must not reinterpret upstream
/// error statuses.
#[async_trait::async_trait]
pub trait AssetService: Send + Sync {
    /// Search assets; `params` is forwarded as the query string.
    async fn search(
        &self,
        params: HashMap<String, String>,
    ) -> Result<ClientResponse, ClientError>;

    /// Fetch a single asset's metadata by id.
    async fn get_by_id(&self, id: &str) -> Result<ClientResponse, ClientError>;

    /// Fetch an asset's binary along with download metadata.
    async fn get_binary_file(&self, id: &str) -> Result<AssetFile, ClientError>;

    /// Create an asset from metadata fields and a binary payload.
    async fn create(
        &self,
        docs: HashMap<String, String>,
        file: UploadFile,
    ) -> Result<ClientResponse, ClientError>;

    /// Apply metadata updates (and optionally a new binary) to an asset.
    /// `etag` is the caller's concurrency token, forwarded as `If-Match`.
    async fn update(
        &self,
        id: &str,
        updates: serde_json::Value,
        etag: &str,
        file: Option<UploadFile>,
    ) -> Result<ClientResponse, ClientError>;

    /// Delete an asset, guarded by the caller's concurrency token.
    async fn delete(&self, id: &str, etag: &str) -> Result<ClientResponse, ClientError>;

    /// Aggregate asset counts, optionally scoped to the given sets.
    async fn get_assets_count(
        &self,
        set_ids: Option<Vec<String>>,
    ) -> Result<ClientResponse, ClientError>;

    /// Retrieve a zip bundle of the given assets' binaries.
    async fn get_binary_zip_by_id(&self, ids: Vec<String>) -> Result<Bytes, ClientError>;
}

/// HTTP client for a SAMS asset-management instance.
pub struct SamsAssetClient {
    client: reqwest::Client,
    base_url: String,
}

impl SamsAssetClient {
    /// Create a new client for the service at `base_url`
    /// (e.g. `http://localhost:5700`).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    // ---- private helpers ----

    /// Decode an upstream response into its status and JSON body.
    /// Empty bodies decode to `Value::Null`.
    async fn parse_response(response: reqwest::Response) -> Result<ClientResponse, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = decode_json_body(&bytes)?;
        Ok(ClientResponse { status, body })
    }

    /// Turn a non-success binary-endpoint response into an error carrying
    /// the upstream status and body text.
    async fn upstream_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        ClientError::Upstream { status, body }
    }

    /// Build a multipart form with one text part per metadata field and
    /// the `binary` file part.
    fn multipart_form(
        fields: Vec<(String, String)>,
        file: UploadFile,
    ) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let mut part =
            reqwest::multipart::Part::bytes(file.bytes.to_vec()).file_name(file.filename);
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        Ok(form.part("binary", part))
    }
}

#[async_trait::async_trait]
impl AssetService for SamsAssetClient {
    async fn search(
        &self,
        params: HashMap<String, String>,
    ) -> Result<ClientResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/assets", self.base_url))
            .query(&params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_by_id(&self, id: &str) -> Result<ClientResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/assets/{}", self.base_url, id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_binary_file(&self, id: &str) -> Result<AssetFile, ClientError> {
        let response = self
            .client
            .get(format!("{}/assets/binary/{}", self.base_url, id))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::FileNotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| id.to_string());

        let bytes = response.bytes().await?;
        Ok(AssetFile {
            filename,
            content_type,
            bytes,
        })
    }

    async fn create(
        &self,
        docs: HashMap<String, String>,
        file: UploadFile,
    ) -> Result<ClientResponse, ClientError> {
        let form = Self::multipart_form(docs.into_iter().collect(), file)?;

        let response = self
            .client
            .post(format!("{}/assets", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn update(
        &self,
        id: &str,
        updates: serde_json::Value,
        etag: &str,
        file: Option<UploadFile>,
    ) -> Result<ClientResponse, ClientError> {
        let request = self
            .client
            .patch(format!("{}/assets/{}", self.base_url, id))
            .header(reqwest::header::IF_MATCH, etag);

        let request = match file {
            Some(file) => {
                let form = Self::multipart_form(update_form_fields(&updates), file)?;
                request.multipart(form)
            }
            None => request.json(&updates),
        };

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, id: &str, etag: &str) -> Result<ClientResponse, ClientError> {
        let response = self
            .client
            .delete(format!("{}/assets/{}", self.base_url, id))
            .header(reqwest::header::IF_MATCH, etag)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_assets_count(
        &self,
        set_ids: Option<Vec<String>>,
    ) -> Result<ClientResponse, ClientError> {
        let url = match &set_ids {
            Some(ids) => format!("{}/assets/counts/{}", self.base_url, encode_id_list(ids)),
            None => format!("{}/assets/counts", self.base_url),
        };

        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn get_binary_zip_by_id(&self, ids: Vec<String>) -> Result<Bytes, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/assets/compressed_binary/{}",
                self.base_url,
                encode_id_list(&ids)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        Ok(response.bytes().await?)
    }
}

/// Decode a response body as JSON; empty bodies become `Null`.
fn decode_json_body(bytes: &[u8]) -> Result<serde_json::Value, ClientError> {
    if bytes.is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| ClientError::UnexpectedPayload(e.to_string()))
}

/// Flatten a JSON updates object into multipart text fields.
///
/// String values are sent as-is; any other value keeps its JSON
/// rendering so nothing is silently dropped.
fn update_form_fields(updates: &serde_json::Value) -> Vec<(String, String)> {
    match updates.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| {
                let value = match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                };
                (k.clone(), value)
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Extract the filename from a `Content-Disposition` header value.
fn disposition_filename(value: &str) -> Option<String> {
    let (_, after) = value.split_once("filename=")?;
    let after = after.trim();
    let name = if let Some(stripped) = after.strip_prefix('"') {
        stripped.split('"').next()?
    } else {
        after.split(';').next()?.trim()
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
