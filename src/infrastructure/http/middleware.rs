//! HTTP Middleware
//!
//! 传输层错误日志中间件

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

/// 超过这个时长的请求记一条 warn（播放命令需要排队等 Driver）
const SLOW_REQUEST: Duration = Duration::from_secs(2);

/// 传输层错误日志中间件
///
/// 业务错误以 200 + errno 返回，在 ApiError::into_response() 中记录；
/// 这里只处理真正的 HTTP 4xx/5xx：JSON 解析失败、未知路由、请求体过大等
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Rejected request"
        );
    } else if started.elapsed() > SLOW_REQUEST {
        tracing::warn!(method = %method, uri = %uri, elapsed_ms, "Slow request");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::{Request as HttpRequest, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Deserialize)]
    struct SpeakRequest {
        text: String,
    }

    async fn speak(Json(req): Json<SpeakRequest>) -> String {
        req.text
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/speak", post(speak))
            .layer(DefaultBodyLimit::max(64))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    fn json_request(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_passes_through() {
        let app = create_test_router();
        let response = app
            .oneshot(json_request("/speak", r#"{"text":"One."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let app = create_test_router();
        let response = app.oneshot(json_request("/speak", "{")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_test_router();
        let response = app
            .oneshot(json_request("/missing", r#"{"text":"One."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = create_test_router();
        let body = format!(r#"{{"text":"{}"}}"#, "a".repeat(256));
        let response = app.oneshot(json_request("/speak", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
