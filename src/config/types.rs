//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::EndOfSequence;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音引擎配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 语音引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechEngineKind {
    /// 命令行合成器子进程
    #[default]
    Process,
    /// 不发声的计时引擎
    Fake,
}

impl SpeechEngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechEngineKind::Process => "process",
            SpeechEngineKind::Fake => "fake",
        }
    }
}

/// 语音引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// 引擎类型
    #[serde(default)]
    pub engine: SpeechEngineKind,

    /// 合成器可执行文件
    #[serde(default = "default_program")]
    pub program: String,

    /// 请求未指定音色时使用
    #[serde(default)]
    pub default_voice: Option<String>,

    /// 语速为 0 时的每分钟词数
    #[serde(default = "default_base_wpm")]
    pub base_wpm: u32,

    /// 语速每加减一档对应的每分钟词数
    #[serde(default = "default_wpm_per_step")]
    pub wpm_per_step: u32,

    /// fake 引擎每个字符的朗读时长（毫秒）
    #[serde(default = "default_fake_per_char_ms")]
    pub fake_per_char_ms: u64,
}

fn default_program() -> String {
    "espeak-ng".to_string()
}

fn default_base_wpm() -> u32 {
    175
}

fn default_wpm_per_step() -> u32 {
    15
}

fn default_fake_per_char_ms() -> u64 {
    40
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::default(),
            program: default_program(),
            default_voice: None,
            base_wpm: default_base_wpm(),
            wpm_per_step: default_wpm_per_step(),
            fake_per_char_ms: default_fake_per_char_ms(),
        }
    }
}

impl SpeechConfig {
    /// 语速档位换算为每分钟词数（最低 80）
    pub fn words_per_minute(&self, rate: i32) -> u32 {
        let wpm = self.base_wpm as i64 + rate as i64 * self.wpm_per_step as i64;
        wpm.max(80) as u32
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 轮询间隔（毫秒）
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// 读完最后一句后的策略
    #[serde(default)]
    pub on_exhausted: EndOfSequence,

    /// 状态栏消息显示时长（毫秒）
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_status_timeout_ms() -> u64 {
    5000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            on_exhausted: EndOfSequence::default(),
            status_timeout_ms: default_status_timeout_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// 结构不匹配的数据库文件被移动到这里
    #[serde(default = "default_quarantine_dir")]
    pub quarantine_dir: PathBuf,
}

fn default_db_path() -> String {
    "data/texts.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_quarantine_dir() -> PathBuf {
    PathBuf::from("data/dump_files")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            quarantine_dir: default_quarantine_dir(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 导入导出的 TXT 文件目录
    #[serde(default = "default_texts_dir")]
    pub texts_dir: PathBuf,
}

fn default_texts_dir() -> PathBuf {
    PathBuf::from("texts")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            texts_dir: default_texts_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.speech.engine, SpeechEngineKind::Process);
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.playback.on_exhausted, EndOfSequence::Stop);
        assert_eq!(config.database.path, "data/texts.db");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:5070");
    }

    #[test]
    fn test_words_per_minute() {
        let config = SpeechConfig::default();
        assert_eq!(config.words_per_minute(0), 175);
        assert_eq!(config.words_per_minute(2), 205);
        assert_eq!(config.words_per_minute(-10), 80);
    }
}
