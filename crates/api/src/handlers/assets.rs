//! Handlers for the asset gateway.
//!
//! Each handler translates one HTTP operation into a call against the
//! upstream asset service and forwards the result. No business logic
//! lives here: local checks are limited to request preconditions
//! (required headers, required multipart parts, parseable id lists).

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use sams_client::UploadFile;
use sams_core::error::CoreError;
use sams_core::literal::parse_id_list;

use crate::error::{ApiError, ApiResult};
use crate::response::Forwarded;
use crate::state::AppState;

/// Maximum accepted size for a JSON PATCH body.
const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Extract the required `If-Match` concurrency token, failing with 400
/// before any upstream call when it is absent.
fn require_if_match(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .ok_or(ApiError::MissingHeader("If-Match"))
}

/// Drain a multipart request into metadata fields and the optional
/// `binary` file part. Unknown parts are treated as metadata.
async fn read_multipart(
    mut multipart: Multipart,
) -> ApiResult<(HashMap<String, String>, Option<UploadFile>)> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "binary" {
            let filename = field.file_name().unwrap_or("binary").to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            file = Some(UploadFile {
                filename,
                content_type,
                bytes,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            fields.insert(name, text);
        }
    }

    Ok((fields, file))
}

/// The declared content type of a request, without parameters.
fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
}

// ---------------------------------------------------------------------------
// Asset CRUD
// ---------------------------------------------------------------------------

/// GET /sams/assets
///
/// List/search assets. The query string is forwarded to the upstream
/// search unmodified, and its body and status come back verbatim.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Forwarded> {
    let response = state.assets.search(params).await?;
    Ok(response.into())
}

/// GET /sams/assets/{item_id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<Forwarded> {
    let response = state.assets.get_by_id(&item_id).await?;
    Ok(response.into())
}

/// POST /sams/assets
///
/// Create an asset from a multipart request: one required `binary` file
/// part plus arbitrary metadata form fields.
pub async fn create_asset(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Forwarded> {
    let (docs, file) = read_multipart(multipart).await?;
    let file = file
        .ok_or_else(|| ApiError::BadRequest("'binary' field missing in request".to_string()))?;

    tracing::info!(filename = %file.filename, "Creating asset");

    let response = state.assets.create(docs, file).await?;
    Ok(response.into())
}

/// DELETE /sams/assets/{item_id}
///
/// Requires the `If-Match` concurrency token. A 204 from upstream is
/// returned with an empty body; any other status passes through with its
/// JSON body so the caller sees the failure details.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let etag = require_if_match(&headers)?;

    let response = state.assets.delete(&item_id, &etag).await?;

    if response.status == StatusCode::NO_CONTENT {
        tracing::info!(item_id = %item_id, "Asset deleted");
        return Ok(response.status.into_response());
    }
    Ok(Forwarded::from(response).into_response())
}

/// PATCH /sams/assets/{item_id}
///
/// Requires the `If-Match` concurrency token. The update format is
/// chosen by the declared content type:
///
/// - `multipart/form-data`: metadata from the form fields, with an
///   optional replacement `binary` file part;
/// - `application/json`: metadata from the JSON object body, no file.
///
/// Any other (or missing) content type is rejected rather than guessed.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
    request: Request,
) -> ApiResult<Forwarded> {
    let etag = require_if_match(&headers)?;

    let (updates, file) = match content_type(&headers) {
        "multipart/form-data" => {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            let (fields, file) = read_multipart(multipart).await?;
            let map: serde_json::Map<String, serde_json::Value> = fields
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            (serde_json::Value::Object(map), file)
        }
        "application/json" => {
            let bytes = axum::body::to_bytes(request.into_body(), JSON_BODY_LIMIT)
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            let updates: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;
            if !updates.is_object() {
                return Err(ApiError::BadRequest(
                    "update body must be a JSON object".to_string(),
                ));
            }
            (updates, None)
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "unsupported content type '{other}': expected multipart/form-data or application/json"
            )));
        }
    };

    let response = state.assets.update(&item_id, updates, &etag, file).await?;
    Ok(response.into())
}

// ---------------------------------------------------------------------------
// Binary retrieval
// ---------------------------------------------------------------------------

/// GET /sams/assets/binary/{item_id}
///
/// Stream the asset binary back with download headers derived from the
/// file metadata.
pub async fn get_asset_binary(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<Response> {
    let file = state.assets.get_binary_file(&item_id).await?;

    // Quotes would terminate the quoted-string disposition parameter.
    let safe_name = file.filename.replace('"', "");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{safe_name}\""),
        )
        .body(Body::from(file.bytes))
        .map_err(|e| ApiError::InternalError(e.to_string()))
}

/// GET /sams/assets/compressed_binary/{asset_ids}
///
/// Bundle the given assets' binaries into a zip and return the raw
/// archive bytes. `asset_ids` is a literal-encoded, non-empty id list.
pub async fn get_assets_compressed_binary(
    State(state): State<AppState>,
    Path(asset_ids): Path<String>,
) -> ApiResult<Response> {
    let ids = parse_id_list(&asset_ids).map_err(CoreError::from)?;
    if ids.is_empty() {
        return Err(ApiError::BadRequest(
            "asset_ids must not be empty".to_string(),
        ));
    }

    let archive = state.assets.get_binary_zip_by_id(ids).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/zip")],
        archive,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// GET /sams/assets/counts
///
/// Asset counts across all sets. Returns the upstream count payload
/// as-is.
pub async fn get_assets_count(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let response = state.assets.get_assets_count(None).await?;
    Ok(Json(response.body))
}

/// GET /sams/assets/counts/{set_ids}
///
/// Asset counts scoped to the given sets. `set_ids` is a literal-encoded
/// id list; malformed input is rejected, never evaluated.
pub async fn get_assets_count_for_sets(
    State(state): State<AppState>,
    Path(set_ids): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let ids = parse_id_list(&set_ids).map_err(CoreError::from)?;

    let response = state.assets.get_assets_count(Some(ids)).await?;
    Ok(Json(response.body))
}
