//! HTTP surface: `POST /get_answer`.
//!
//! One route, permissive CORS (the browser extension posts from arbitrary
//! page origins), and a uniform failure contract: whatever goes wrong, the
//! caller gets `500 {"error": "<message>"}` and the full error is logged.

use crate::config::ServerConfig;
use crate::error::AnswerError;
use crate::solve::Solver;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<Solver>,
}

impl AppState {
    pub fn new(solver: Solver) -> Self {
        Self {
            solver: Arc::new(solver),
        }
    }
}

/// `200` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// `500` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the router with the answer route.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/get_answer", post(get_answer))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and run until the process is stopped.
pub async fn serve(solver: Solver, config: &ServerConfig) -> Result<(), AnswerError> {
    let app = create_router(AppState::new(solver), config.max_body_bytes);

    let addr: SocketAddr = config.bind_addr().parse().map_err(|e| {
        AnswerError::InvalidConfig(format!("bad bind address '{}': {e}", config.bind_addr()))
    })?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn get_answer(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(bytes) => state.solver.solve_request(&bytes).await,
        Err(rejection) => Err(AnswerError::InvalidRequest {
            detail: rejection.body_text(),
        }),
    };

    match result {
        Ok(answer) => (StatusCode::OK, Json(AnswerResponse { answer })).into_response(),
        Err(e) => {
            error!(error = %e, detail = ?e, "get_answer failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{ChatRequest, CompletionService, ModelReply};
    use crate::config::SolverConfig;
    use crate::pipeline::answer::Answerer;
    use crate::pipeline::extract::TextRecognizer;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tower::ServiceExt;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedText {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, _image: &DynamicImage) -> Result<String, AnswerError> {
            Ok(self.0.to_string())
        }
    }

    struct FixedReply(&'static str);

    #[async_trait]
    impl CompletionService for FixedReply {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ModelReply, AnswerError> {
            Ok(ModelReply::from_content(self.0))
        }
    }

    fn setup_test_app(reply: &'static str) -> Router {
        let answerer = Answerer::new(Arc::new(FixedReply(reply)), SolverConfig::default());
        let solver = Solver::new(
            Arc::new(FixedText("Capital of France?\nLondon\nParis\nBerlin")),
            answerer,
        );
        create_router(AppState::new(solver), 1024 * 1024)
    }

    fn png_data_uri() -> String {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(&buf))
    }

    fn post_json(body: String) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/get_answer")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_answer_success() {
        let app = setup_test_app("The correct answer is: Paris");
        let body = serde_json::json!({ "image": png_data_uri() }).to_string();

        let response = app.oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json, serde_json::json!({ "answer": "Paris" }));
    }

    #[tokio::test]
    async fn test_answer_fallback_is_200() {
        let app = setup_test_app("Not sure");
        let body = serde_json::json!({ "image": png_data_uri() }).to_string();

        let response = app.oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json["answer"],
            "I'm sorry, but I couldn't determine a clear answer."
        );
    }

    #[tokio::test]
    async fn test_missing_image_is_500() {
        let app = setup_test_app("The correct answer is: Paris");

        let response = app.oneshot(post_json("{}".to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("image"));
        assert!(json.get("answer").is_none());
    }

    #[tokio::test]
    async fn test_error_response_carries_cors_header() {
        let app = setup_test_app("The correct answer is: Paris");
        let mut request = post_json("{}".to_string());
        request.headers_mut().insert(
            header::ORIGIN,
            "chrome-extension://abcdefghijklmnop".parse().unwrap(),
        );

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_invalid_base64_is_500() {
        let app = setup_test_app("The correct answer is: Paris");
        let body = serde_json::json!({ "image": "data:image/png;base64,@@not-base64@@" }).to_string();

        let response = app.oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("base64"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_500() {
        let app = setup_test_app("The correct answer is: Paris");

        let response = app
            .oneshot(post_json("not json at all".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let app = setup_test_app("The correct answer is: Paris");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get_answer")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = setup_test_app("The correct answer is: Paris");

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/get_answer")
                    .header(header::ORIGIN, "https://quiz.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_500() {
        let answerer = Answerer::new(
            Arc::new(FixedReply("The correct answer is: Paris")),
            SolverConfig::default(),
        );
        let solver = Solver::new(Arc::new(FixedText("Q?")), answerer);
        let app = create_router(AppState::new(solver), 64);
        let body = serde_json::json!({ "image": png_data_uri() }).to_string();

        let response = app.oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].is_string());
    }
}
