//! Local compression service
//!
//! A small HTTP front for TinyPNG so the exporter (or a design-tool plugin)
//! can post raw image bytes to `http://localhost:8765/compress` and get the
//! compressed bytes back.
//!
//! # Routes
//!
//! - `POST /compress` - Compress the request body
//! - `GET /` - Usage text

use crate::adapters::tinypng::TinyPngClient;
use crate::config::{exposed, secret_from_env, SecretString, ServerConfig};
use crate::domain::{LayerExportError, Result, ShrinkError};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Largest accepted upload
const MAX_IMAGE_BYTES: usize = 64 * 1024 * 1024;

const USAGE: &str =
    "POST /compress with image bytes to get compressed image. TINYPNG_API_KEY required.";

const DEFAULT_CONTENT_TYPE: &str = "image/png";

const TINYPNG_KEY_VAR: &str = "TINYPNG_API_KEY";

/// Shared state for the compression routes
#[derive(Clone)]
pub struct CompressState {
    tinypng: TinyPngClient,
    api_key: Option<SecretString>,
}

impl CompressState {
    pub fn new(tinypng: TinyPngClient, api_key: Option<SecretString>) -> Self {
        Self { tinypng, api_key }
    }

    /// Build state from configuration, falling back to `TINYPNG_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let tinypng = TinyPngClient::new(&config.tinypng_base_url, config.timeout_seconds)?;
        let api_key = config
            .tinypng_api_key
            .clone()
            .or_else(|| secret_from_env(TINYPNG_KEY_VAR));
        Ok(Self::new(tinypng, api_key))
    }

    fn api_key(&self) -> Option<&str> {
        exposed(self.api_key.as_ref())
    }
}

impl ShrinkError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShrinkError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ShrinkError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ShrinkError::MissingOutputUrl | ShrinkError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ShrinkError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ShrinkError::Upstream { message, .. } => message,
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

/// Create the compression service router
pub fn create_router(state: CompressState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/compress", post(compress))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(state)
}

async fn index() -> &'static str {
    USAGE
}

async fn compress(
    State(state): State<CompressState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Response, ShrinkError> {
    let api_key = state.api_key().ok_or(ShrinkError::MissingApiKey)?;
    if body.is_empty() {
        return Ok((StatusCode::BAD_REQUEST, "request body is empty").into_response());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let compressed = state.tinypng.shrink(api_key, body.to_vec()).await.map_err(|e| {
        tracing::warn!(error = %e, "Compression request failed");
        e
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], compressed).into_response())
}

/// Serve on an already bound listener until `shutdown` turns true
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve_on(
    listener: TcpListener,
    state: CompressState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Compression service shutting down");
        })
        .await
        .map_err(|e| LayerExportError::Other(format!("Compression service failed: {e}")))
}

/// Bind the configured address and serve until shutdown
///
/// # Example
///
/// ```no_run
/// use layer_export::config::ServerConfig;
/// use tokio::sync::watch;
///
/// # async fn example() -> layer_export::domain::Result<()> {
/// let (_tx, rx) = watch::channel(false);
/// layer_export::server::serve(&ServerConfig::default(), rx).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn serve(config: &ServerConfig, shutdown: watch::Receiver<bool>) -> Result<()> {
    let addr = config.socket_addr().map_err(LayerExportError::Configuration)?;
    let state = CompressState::from_config(config)?;
    if state.api_key().is_none() {
        tracing::warn!("TINYPNG_API_KEY is not set, /compress will answer 500");
    }

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        LayerExportError::Configuration(format!("Failed to bind {addr}: {e}"))
    })?;

    tracing::info!(address = %addr, "Compression service listening");
    serve_on(listener, state, shutdown).await?;
    tracing::info!("Compression service stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn state(base_url: &str, key: Option<&str>) -> CompressState {
        CompressState::new(
            TinyPngClient::new(base_url, 5).unwrap(),
            key.map(|k| secret_string(k.to_string())),
        )
    }

    fn compress_request(body: &'static [u8], content_type: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/compress");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_index_usage() {
        let app = create_router(state("http://127.0.0.1:1", None));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        assert!(String::from_utf8(body).unwrap().contains("POST /compress"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_500() {
        let app = create_router(state("http://127.0.0.1:1", Some("  ")));
        let response = app
            .oneshot(compress_request(b"img", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_empty_body_is_400() {
        let app = create_router(state("http://127.0.0.1:1", Some("key")));
        let response = app.oneshot(compress_request(b"", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compress_round_trip_keeps_content_type() {
        let mut upstream = mockito::Server::new_async().await;
        let output_url = format!("{}/output/1", upstream.url());
        upstream
            .mock("POST", "/shrink")
            .with_status(201)
            .with_body(format!(r#"{{"output": {{"url": "{output_url}"}}}}"#))
            .create_async()
            .await;
        upstream
            .mock("GET", "/output/1")
            .with_status(200)
            .with_body("tiny")
            .create_async()
            .await;

        let app = create_router(state(&upstream.url(), Some("key")));
        let response = app
            .oneshot(compress_request(b"jpeg-bytes", Some("image/jpeg")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/jpeg"
        );
        assert_eq!(body_bytes(response).await, b"tiny".to_vec());
    }

    #[tokio::test]
    async fn test_default_content_type_is_png() {
        let mut upstream = mockito::Server::new_async().await;
        let output_url = format!("{}/output/2", upstream.url());
        upstream
            .mock("POST", "/shrink")
            .with_status(201)
            .with_body(format!(r#"{{"output": {{"url": "{output_url}"}}}}"#))
            .create_async()
            .await;
        upstream
            .mock("GET", "/output/2")
            .with_status(200)
            .with_body("tiny")
            .create_async()
            .await;

        let app = create_router(state(&upstream.url(), Some("key")));
        let response = app.oneshot(compress_request(b"png", None)).await.unwrap();

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_upstream_status_passed_through() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("POST", "/shrink")
            .with_status(429)
            .with_body("Too many requests")
            .create_async()
            .await;

        let app = create_router(state(&upstream.url(), Some("key")));
        let response = app.oneshot(compress_request(b"png", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_bytes(response).await, b"Too many requests".to_vec());
    }

    #[tokio::test]
    async fn test_missing_output_url_is_502() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("POST", "/shrink")
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let app = create_router(state(&upstream.url(), Some("key")));
        let response = app.oneshot(compress_request(b"png", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_serve_on_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(serve_on(
            listener,
            state("http://127.0.0.1:1", None),
            rx,
        ));

        tx.send(true).unwrap();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
