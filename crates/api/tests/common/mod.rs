//! Shared helpers for gateway integration tests: a scripted
//! [`AssetService`] double plus router/request utilities.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_TYPE, IF_MATCH};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use sams_api::config::ServerConfig;
use sams_api::routes;
use sams_api::state::AppState;
use sams_client::{AssetFile, AssetService, ClientError, ClientResponse, UploadFile};

/// One recorded call against the scripted asset service.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(HashMap<String, String>),
    GetById(String),
    GetBinaryFile(String),
    Create {
        docs: HashMap<String, String>,
        filename: String,
    },
    Update {
        id: String,
        updates: serde_json::Value,
        etag: String,
        filename: Option<String>,
    },
    Delete {
        id: String,
        etag: String,
    },
    Count(Option<Vec<String>>),
    Zip(Vec<String>),
}

/// A scripted [`AssetService`] double.
///
/// Every JSON-returning operation answers with the configured status and
/// body; binary operations answer with `file` / `zip`. All calls are
/// recorded for assertion.
pub struct ScriptedAssets {
    pub status: StatusCode,
    pub body: serde_json::Value,
    pub zip: Bytes,
    pub file: Option<AssetFile>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedAssets {
    /// A double answering every JSON call with the given status and body.
    pub fn respond(status: u16, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            zip: Bytes::new(),
            file: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A double answering binary retrieval with the given file.
    pub fn with_file(file: AssetFile) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::OK,
            body: serde_json::Value::Null,
            zip: Bytes::new(),
            file: Some(file),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A double answering zip bundling with the given bytes.
    pub fn with_zip(zip: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::OK,
            body: serde_json::Value::Null,
            zip: Bytes::copy_from_slice(zip),
            file: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Snapshot of all recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripted_response(&self) -> ClientResponse {
        ClientResponse {
            status: self.status,
            body: self.body.clone(),
        }
    }
}

#[async_trait::async_trait]
impl AssetService for ScriptedAssets {
    async fn search(
        &self,
        params: HashMap<String, String>,
    ) -> Result<ClientResponse, ClientError> {
        self.record(Call::Search(params));
        Ok(self.scripted_response())
    }

    async fn get_by_id(&self, id: &str) -> Result<ClientResponse, ClientError> {
        self.record(Call::GetById(id.to_string()));
        Ok(self.scripted_response())
    }

    async fn get_binary_file(&self, id: &str) -> Result<AssetFile, ClientError> {
        self.record(Call::GetBinaryFile(id.to_string()));
        self.file
            .clone()
            .ok_or_else(|| ClientError::FileNotFound { id: id.to_string() })
    }

    async fn create(
        &self,
        docs: HashMap<String, String>,
        file: UploadFile,
    ) -> Result<ClientResponse, ClientError> {
        self.record(Call::Create {
            docs,
            filename: file.filename,
        });
        Ok(self.scripted_response())
    }

    async fn update(
        &self,
        id: &str,
        updates: serde_json::Value,
        etag: &str,
        file: Option<UploadFile>,
    ) -> Result<ClientResponse, ClientError> {
        self.record(Call::Update {
            id: id.to_string(),
            updates,
            etag: etag.to_string(),
            filename: file.map(|f| f.filename),
        });
        Ok(self.scripted_response())
    }

    async fn delete(&self, id: &str, etag: &str) -> Result<ClientResponse, ClientError> {
        self.record(Call::Delete {
            id: id.to_string(),
            etag: etag.to_string(),
        });
        Ok(self.scripted_response())
    }

    async fn get_assets_count(
        &self,
        set_ids: Option<Vec<String>>,
    ) -> Result<ClientResponse, ClientError> {
        self.record(Call::Count(set_ids));
        Ok(self.scripted_response())
    }

    async fn get_binary_zip_by_id(&self, ids: Vec<String>) -> Result<Bytes, ClientError> {
        self.record(Call::Zip(ids));
        Ok(self.zip.clone())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sams_url: "http://localhost:5700".to_string(),
    }
}

/// Build the full application router with all middleware layers, backed
/// by the given asset service double.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(assets: Arc<ScriptedAssets>) -> Router {
    let state = AppState {
        assets,
        config: Arc::new(test_config()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PATCH])
        .allow_headers([CONTENT_TYPE, IF_MATCH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/sams", routes::sams_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Send a GET request to the app and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Render a multipart/form-data body with the given text fields and
/// optional `binary` file part.
pub fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"binary\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
