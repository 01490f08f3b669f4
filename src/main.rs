//! Lector - 分句朗读播放器
//!
//! - Domain: library/, playback/, text_segmenter
//! - Application: playback controller, commands, queries, ports
//! - Infrastructure: http, worker, persistence, adapters, events

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lector::application::{PlaybackController, PlaybackOptions};
use lector::config::{load_config, print_config};
use lector::domain::playback::VoiceId;
use lector::infrastructure::adapters::{create_engine, TextFileStore};
use lector::infrastructure::events::EventPublisher;
use lector::infrastructure::http::{AppState, HttpServer, ServerConfig};
use lector::infrastructure::persistence::sqlite::{
    open_store, SqliteCategoryRepository, SqliteTextRepository,
};
use lector::infrastructure::worker::{PlaybackDriver, PlaybackDriverConfig};

/// 关闭时等待 Driver 退出的上限
const DRIVER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},lector={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Lector - 分句朗读播放器");
    print_config(&config);

    // 打开数据库（损坏或结构不符时隔离旧文件并重建）
    let pool = open_store(
        Path::new(&config.database.path),
        &config.database.quarantine_dir,
        config.database.max_connections,
    )
    .await?;

    // 创建 Repository 适配器
    let category_repo = Arc::new(SqliteCategoryRepository::new(pool.clone()));
    let text_repo = Arc::new(SqliteTextRepository::new(pool));
    let text_files = Arc::new(TextFileStore::new(&config.storage.texts_dir).await?);

    // 语音引擎和事件发布器
    let engine = create_engine(&config.speech);
    let event_publisher = EventPublisher::new().arc();

    // 播放控制器只归 Driver 所有
    let controller = PlaybackController::new(
        engine,
        event_publisher.clone(),
        event_publisher.clone(),
        PlaybackOptions {
            on_exhausted: config.playback.on_exhausted,
            status_timeout: config.playback.status_timeout(),
        },
    );
    let (driver, playback) = PlaybackDriver::new(
        PlaybackDriverConfig {
            tick_interval: config.playback.tick_interval(),
        },
        controller,
    );
    let driver_task = tokio::spawn(driver.run());

    let default_voice = config
        .speech
        .default_voice
        .as_deref()
        .and_then(|voice| VoiceId::new(voice).ok());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        category_repo,
        text_repo,
        text_files,
        playback.clone(),
        event_publisher,
        default_voice,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 关闭前停止朗读，然后等 Driver 退出
    if let Err(e) = playback.stop_if_active().await {
        tracing::warn!(error = %e, "Failed to stop playback");
    }
    drop(playback);

    if tokio::time::timeout(DRIVER_SHUTDOWN_TIMEOUT, driver_task)
        .await
        .is_err()
    {
        tracing::warn!("PlaybackDriver did not exit in time");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
