//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `LECTOR_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `LECTOR_SERVER__PORT=8080`
/// - `LECTOR_SPEECH__ENGINE=fake`
/// - `LECTOR_SPEECH__DEFAULT_VOICE=ru`
/// - `LECTOR_PLAYBACK__ON_EXHAUSTED=hold`
/// - `LECTOR_DATABASE__PATH=/data/texts.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5070)?
        .set_default("speech.engine", "process")?
        .set_default("speech.program", "espeak-ng")?
        .set_default("speech.base_wpm", 175)?
        .set_default("speech.wpm_per_step", 15)?
        .set_default("speech.fake_per_char_ms", 40)?
        .set_default("playback.tick_interval_ms", 100)?
        .set_default("playback.on_exhausted", "stop")?
        .set_default("playback.status_timeout_ms", 5000)?
        .set_default("database.path", "data/texts.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.quarantine_dir", "data/dump_files")?
        .set_default("storage.texts_dir", "texts")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: LECTOR_SPEECH__PROGRAM=espeak
    builder = builder.add_source(
        Environment::with_prefix("LECTOR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.speech.program.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Speech program cannot be empty".to_string(),
        ));
    }

    if let Some(voice) = &config.speech.default_voice {
        if voice.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Default voice cannot be blank".to_string(),
            ));
        }
    }

    if config.playback.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Tick interval cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Speech Engine: {}", config.speech.engine.as_str());
    tracing::info!("Speech Program: {}", config.speech.program);
    tracing::info!(
        "Default Voice: {}",
        config.speech.default_voice.as_deref().unwrap_or("<none>")
    );
    tracing::info!("Tick Interval: {}ms", config.playback.tick_interval_ms);
    tracing::info!("On Exhausted: {:?}", config.playback.on_exhausted);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Quarantine Directory: {:?}", config.database.quarantine_dir);
    tracing::info!("Texts Directory: {:?}", config.storage.texts_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::EndOfSequence;
    use crate::config::SpeechEngineKind;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_tick() {
        let mut config = AppConfig::default();
        config.playback.tick_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_blank_voice() {
        let mut config = AppConfig::default();
        config.speech.default_voice = Some("  ".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[speech]
engine = "fake"
default_voice = "en-us"

[playback]
on_exhausted = "hold"
tick_interval_ms = 50
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.speech.engine, SpeechEngineKind::Fake);
        assert_eq!(config.speech.default_voice.as_deref(), Some("en-us"));
        assert_eq!(config.playback.on_exhausted, EndOfSequence::Hold);
        assert_eq!(config.playback.tick_interval_ms, 50);
        assert_eq!(config.server.port, 5070);
    }
}
