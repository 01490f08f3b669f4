//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                GET   健康检查
//! - /api/category/list       GET   列出分类（最新的在前）
//! - /api/category/create     POST  创建分类
//! - /api/text/list           POST  列出分类下的文本
//! - /api/text/get            POST  读取文本内容
//! - /api/text/create         POST  创建文本
//! - /api/text/update         POST  更新文本
//! - /api/text/reorder        POST  批量调整顺序
//! - /api/file/list           GET   列出文本目录中的 TXT 文件
//! - /api/file/import         POST  导入 TXT 文件（会停止当前播放）
//! - /api/file/export         POST  导出 TXT 文件（会停止当前播放）
//! - /api/playback/start      POST  开始播放
//! - /api/playback/toggle     POST  播放/暂停切换
//! - /api/playback/pause      POST  暂停
//! - /api/playback/resume     POST  继续
//! - /api/playback/stop       POST  停止
//! - /api/playback/next       POST  下一句
//! - /api/playback/previous   POST  上一句
//! - /api/playback/status     GET   当前播放状态
//! - /ws/events               WS    播放事件（高亮、状态、状态栏消息）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/category", category_routes())
        .nest("/text", text_routes())
        .nest("/file", file_routes())
        .nest("/playback", playback_routes())
}

/// Category 路由
fn category_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_categories))
        .route("/create", post(handlers::create_category))
}

/// Text 路由
fn text_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", post(handlers::list_texts))
        .route("/get", post(handlers::get_text))
        .route("/create", post(handlers::create_text))
        .route("/update", post(handlers::update_text))
        .route("/reorder", post(handlers::reorder_texts))
}

/// File 路由
fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_files))
        .route("/import", post(handlers::import_file))
        .route("/export", post(handlers::export_file))
}

/// Playback 路由
fn playback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_playback))
        .route("/toggle", post(handlers::toggle_playback))
        .route("/pause", post(handlers::pause_playback))
        .route("/resume", post(handlers::resume_playback))
        .route("/stop", post(handlers::stop_playback))
        .route("/next", post(handlers::next_sentence))
        .route("/previous", post(handlers::previous_sentence))
        .route("/status", get(handlers::playback_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::application::{PlaybackController, PlaybackOptions, SpeechEnginePort};
    use crate::domain::playback::VoiceId;
    use crate::infrastructure::adapters::{FakeSpeechEngine, TextFileStore};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteCategoryRepository,
        SqliteTextRepository,
    };
    use crate::infrastructure::worker::{PlaybackDriver, PlaybackDriverConfig};

    async fn test_app(default_voice: Option<&str>) -> (Router, Arc<FakeSpeechEngine>, TempDir) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let texts_dir = tempfile::tempdir().unwrap();
        let files = TextFileStore::new(texts_dir.path()).await.unwrap();

        let fake = Arc::new(FakeSpeechEngine::new());
        let engine: Arc<dyn SpeechEnginePort> = fake.clone();
        let events = EventPublisher::new().arc();
        let controller = PlaybackController::new(
            engine,
            events.clone(),
            events.clone(),
            PlaybackOptions::default(),
        );
        let (driver, handle) = PlaybackDriver::new(PlaybackDriverConfig::default(), controller);
        tokio::spawn(driver.run());

        let state = AppState::new(
            Arc::new(SqliteCategoryRepository::new(pool.clone())),
            Arc::new(SqliteTextRepository::new(pool)),
            Arc::new(files),
            handle,
            events,
            default_voice.map(|v| VoiceId::new(v).unwrap()),
        );
        (build_router(Arc::new(state)), fake, texts_dir)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Value {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _, _dir) = test_app(None).await;
        let json = call(&app, "GET", "/api/ping", None).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["playback"], "idle");
    }

    #[tokio::test]
    async fn test_category_and_text_flow() {
        let (app, _, _dir) = test_app(None).await;

        let created = call(&app, "POST", "/api/category/create", Some(json!({"name": "Poems"}))).await;
        assert_eq!(created["errno"], 0);
        let category_id = created["data"]["id"].as_i64().unwrap();

        let list = call(&app, "GET", "/api/category/list", None).await;
        assert_eq!(list["data"][0]["name"], "Poems");

        let text = call(
            &app,
            "POST",
            "/api/text/create",
            Some(json!({"category_id": category_id, "title": "Ode", "content": "One. Two."})),
        )
        .await;
        let text_id = text["data"]["id"].as_i64().unwrap();

        let content = call(&app, "POST", "/api/text/get", Some(json!({"id": text_id}))).await;
        assert_eq!(content["data"]["content"], "One. Two.");

        let missing = call(&app, "POST", "/api/text/get", Some(json!({"id": text_id + 1}))).await;
        assert_eq!(missing["errno"], 404);
    }

    #[tokio::test]
    async fn test_start_without_voice_is_rejected() {
        let (app, fake, _dir) = test_app(None).await;

        let json = call(&app, "POST", "/api/playback/start", Some(json!({"text": "One."}))).await;
        assert_eq!(json["errno"], 400);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_playback_uses_default_voice() {
        let (app, fake, _dir) = test_app(Some("en")).await;

        let json = call(
            &app,
            "POST",
            "/api/playback/start",
            Some(json!({"text": "One. Two.", "speed": 1.5})),
        )
        .await;
        assert_eq!(json["errno"], 0);
        assert_eq!(json["data"]["snapshot"]["state"], "playing");
        assert_eq!(json["data"]["snapshot"]["total"], 2);
        assert_eq!(fake.spoken(), vec!["One.".to_string()]);

        let json = call(&app, "POST", "/api/playback/next", None).await;
        assert_eq!(json["data"]["snapshot"]["cursor"], 1);

        let json = call(&app, "POST", "/api/playback/next", None).await;
        assert_eq!(json["data"]["changed"], false);

        let json = call(&app, "POST", "/api/playback/stop", None).await;
        assert_eq!(json["data"]["snapshot"]["state"], "stopped");

        let json = call(&app, "POST", "/api/playback/pause", None).await;
        assert_eq!(json["errno"], 409);
    }

    #[tokio::test]
    async fn test_invalid_voice_does_not_fall_back_to_default() {
        let (app, fake, _dir) = test_app(Some("en")).await;

        let json = call(
            &app,
            "POST",
            "/api/playback/start",
            Some(json!({"text": "One.", "voice": "   "})),
        )
        .await;
        assert_eq!(json["errno"], 400);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_file_operations_keep_playing() {
        let (app, _, _dir) = test_app(Some("en")).await;
        call(&app, "POST", "/api/playback/start", Some(json!({"text": "One. Two."}))).await;

        let json = call(
            &app,
            "POST",
            "/api/file/import",
            Some(json!({"file_name": "../secret.txt"})),
        )
        .await;
        assert_eq!(json["errno"], 400);

        let json = call(
            &app,
            "POST",
            "/api/file/export",
            Some(json!({"file_name": "empty.txt", "content": ""})),
        )
        .await;
        assert_eq!(json["errno"], 400);

        let status = call(&app, "GET", "/api/playback/status", None).await;
        assert_eq!(status["data"]["snapshot"]["state"], "playing");
    }

    #[tokio::test]
    async fn test_export_stops_playback() {
        let (app, _, _dir) = test_app(Some("en")).await;
        call(&app, "POST", "/api/playback/start", Some(json!({"text": "One. Two."}))).await;

        let json = call(
            &app,
            "POST",
            "/api/file/export",
            Some(json!({"file_name": "saved.txt", "content": "One. Two."})),
        )
        .await;
        assert_eq!(json["data"]["file_name"], "saved.txt");

        let status = call(&app, "GET", "/api/playback/status", None).await;
        assert_eq!(status["data"]["snapshot"]["state"], "stopped");

        let files = call(&app, "GET", "/api/file/list", None).await;
        assert_eq!(files["data"], json!(["saved.txt"]));
    }
}
