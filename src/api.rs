//! HTTP surface for the AI Study Helper.
//!
//! - `GET /` and `GET /health` – liveness probes.
//! - `POST /summarize/text` – condense a raw text body into study notes.
//! - `POST /summarize/youtube` / `POST /summarize/website` – extract text from a URL first.
//! - `GET /app` and `/static/*` – optional web UI served from the configured web directory.
//!
//! Failures are reported as `{"detail": "..."}`: the extractor's 4xx status for malformed bodies,
//! 400 for blank text or extraction problems, and 500 for summarization problems.

use crate::processing::{PipelineError, StudyApi, StudyError};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

const WEB_UI_MISSING: &str = "Web UI not found. Create /web/index.html to use it.";

/// Build the HTTP router around a study service and an optional web UI directory.
pub fn create_router<S>(service: Arc<S>, web_dir: impl Into<PathBuf>) -> Router
where
    S: StudyApi + 'static,
{
    let web_dir = web_dir.into();
    let index_path = Arc::new(web_dir.join("index.html"));

    let mut router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route(
            "/app",
            get(move || {
                let index_path = Arc::clone(&index_path);
                async move { app_page(&index_path).await }
            }),
        )
        .route("/summarize/text", post(summarize_text::<S>))
        .route("/summarize/youtube", post(summarize_youtube::<S>))
        .route("/summarize/website", post(summarize_website::<S>))
        .with_state(service);

    let static_dir = web_dir.join("static");
    if static_dir.is_dir() {
        tracing::debug!(path = %static_dir.display(), "Serving static web assets");
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
struct UrlRequest {
    url: String,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "AI Study Helper API is running" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve `index.html` when present; otherwise tell the caller how to add one.
async fn app_page(index_path: &Path) -> Response {
    match tokio::fs::read_to_string(index_path).await {
        Ok(page) => Html(page).into_response(),
        Err(_) => Json(json!({ "message": WEB_UI_MISSING })).into_response(),
    }
}

async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: StudyApi,
{
    let Json(request) = payload?;
    if request.text.trim().is_empty() {
        return Err(AppError::bad_request("No text provided."));
    }
    let summary = service.summarize_text(&request.text).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn summarize_youtube<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: StudyApi,
{
    let Json(request) = payload?;
    let summary = service.summarize_youtube(&request.url).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn summarize_website<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: StudyApi,
{
    let Json(request) = payload?;
    let summary = service.summarize_website(&request.url).await?;
    Ok(Json(SummaryResponse { summary }))
}

struct AppError {
    status: StatusCode,
    detail: String,
}

impl AppError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: error.to_string(),
        }
    }
}

impl From<StudyError> for AppError {
    fn from(error: StudyError) -> Self {
        match error {
            StudyError::Extraction(error) => Self::bad_request(error.to_string()),
            StudyError::Pipeline(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::extraction::ExtractionError;
    use crate::processing::{PipelineError, StudyApi, StudyError};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    /// Answers from canned results and records every input it receives.
    #[derive(Default)]
    struct StubStudyService {
        calls: Mutex<Vec<String>>,
        fail_pipeline: bool,
    }

    impl StubStudyService {
        async fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl StudyApi for StubStudyService {
        async fn summarize_text(&self, raw: &str) -> Result<String, PipelineError> {
            self.calls.lock().await.push(raw.to_string());
            if self.fail_pipeline {
                return Err(PipelineError::Unexpected("backend down".into()));
            }
            Ok(format!("Key Points:\n• {raw}"))
        }

        async fn summarize_youtube(&self, url: &str) -> Result<String, StudyError> {
            self.calls.lock().await.push(url.to_string());
            Err(ExtractionError::InvalidVideoUrl.into())
        }

        async fn summarize_website(&self, url: &str) -> Result<String, StudyError> {
            self.calls.lock().await.push(url.to_string());
            Ok(format!("notes for {url}"))
        }
    }

    fn router(service: Arc<StubStudyService>) -> Router {
        create_router(service, "does-not-exist-web")
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(payload) => {
                builder = builder.header("content-type", "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn probes_report_running() {
        let service = Arc::new(StubStudyService::default());

        let (status, body) = send(router(service.clone()), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "AI Study Helper API is running" }));

        let (status, body) = send(router(service), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn text_route_returns_summary() {
        let service = Arc::new(StubStudyService::default());
        let (status, body) = send(
            router(service.clone()),
            Method::POST,
            "/summarize/text",
            Some(json!({ "text": "Cells divide." })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "Key Points:\n• Cells divide.");
        assert_eq!(service.recorded_calls().await, vec!["Cells divide."]);
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_the_pipeline() {
        let service = Arc::new(StubStudyService::default());
        let (status, body) = send(
            router(service.clone()),
            Method::POST,
            "/summarize/text",
            Some(json!({ "text": "   \n" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "No text provided." }));
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_bodies_return_json_detail() {
        let service = Arc::new(StubStudyService::default());
        for (uri, raw) in [
            ("/summarize/text", "{}"),
            ("/summarize/text", "not json"),
            ("/summarize/website", r#"{"link": "https://example.org"}"#),
        ] {
            let response = router(service.clone())
                .oneshot(
                    Request::builder()
                        .method(Method::POST)
                        .uri(uri)
                        .header("content-type", "application/json")
                        .body(Body::from(raw))
                        .expect("request"),
                )
                .await
                .expect("router response");

            assert!(response.status().is_client_error(), "{uri} {raw}");
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert_eq!(content_type, "application/json");
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body bytes");
            let body: Value = serde_json::from_slice(&bytes).expect("json body");
            assert!(
                body["detail"].as_str().is_some_and(|detail| !detail.is_empty()),
                "{body}"
            );
        }
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn pipeline_failures_map_to_server_error() {
        let service = Arc::new(StubStudyService {
            fail_pipeline: true,
            ..Default::default()
        });
        let (status, body) = send(
            router(service),
            Method::POST,
            "/summarize/text",
            Some(json!({ "text": "Anything." })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Error summarizing: backend down");
    }

    #[tokio::test]
    async fn extraction_failures_map_to_bad_request() {
        let service = Arc::new(StubStudyService::default());
        let (status, body) = send(
            router(service),
            Method::POST,
            "/summarize/youtube",
            Some(json!({ "url": "https://example.org/not-a-video" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = body["detail"].as_str().expect("detail string");
        assert!(detail.starts_with("Error extracting YouTube transcript:"));
    }

    #[tokio::test]
    async fn website_route_returns_summary() {
        let service = Arc::new(StubStudyService::default());
        let (status, body) = send(
            router(service.clone()),
            Method::POST,
            "/summarize/website",
            Some(json!({ "url": "https://example.org/post" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "notes for https://example.org/post");
    }

    #[tokio::test]
    async fn app_page_explains_missing_web_ui() {
        let service = Arc::new(StubStudyService::default());
        let (status, body) = send(router(service), Method::GET, "/app", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Web UI not found. Create /web/index.html to use it." })
        );
    }

    #[tokio::test]
    async fn app_page_and_static_assets_served_from_web_dir() {
        let web_dir = std::env::temp_dir().join(format!("study-helper-web-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(web_dir.join("static")).expect("create web dir");
        std::fs::write(web_dir.join("index.html"), "<h1>Study Helper</h1>").expect("index");
        std::fs::write(web_dir.join("static/app.js"), "console.log('hi');").expect("asset");

        let app = create_router(Arc::new(StubStudyService::default()), web_dir.clone());
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/app").body(Body::empty()).expect("request"))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let page = to_bytes(response.into_body(), usize::MAX).await.expect("page");
        assert_eq!(&page[..], b"<h1>Study Helper</h1>");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/app.js")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let asset = to_bytes(response.into_body(), usize::MAX).await.expect("asset");
        assert_eq!(&asset[..], b"console.log('hi');");

        std::fs::remove_dir_all(&web_dir).ok();
    }
}
