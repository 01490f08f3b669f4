//! SQLite Database - 数据库连接、迁移与损坏恢复

use chrono::Local;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/texts.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 数据库打开失败（恢复之后仍然无法使用）
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(String),

    #[error("Store database error: {0}")]
    Database(String),
}

/// 每张表应有的列（精确匹配，多一列少一列都算结构不符）
pub const EXPECTED_SCHEMA: &[(&str, &[&str])] = &[
    ("categories", &["id", "name", "created_at"]),
    (
        "texts",
        &[
            "id",
            "category_id",
            "title",
            "content",
            "sort_index",
            "created_at",
            "updated_at",
        ],
    ),
];

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and busy_timeout=5000ms");

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at DATETIME DEFAULT (datetime('now', 'localtime'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS texts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER,
            title TEXT NOT NULL,
            content TEXT,
            sort_index INTEGER DEFAULT 0,
            created_at DATETIME DEFAULT (datetime('now', 'localtime')),
            updated_at DATETIME DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 检查表结构是否与预期完全一致
pub async fn verify_schema(pool: &DbPool) -> Result<bool, sqlx::Error> {
    for (table, expected) in EXPECTED_SCHEMA {
        let columns: Vec<String> =
            sqlx::query_scalar(&format!("SELECT name FROM pragma_table_info('{}')", table))
                .fetch_all(pool)
                .await?;

        let actual: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = expected.iter().copied().collect();
        if actual != expected {
            tracing::warn!(
                table = table,
                actual = ?actual,
                "Table schema does not match"
            );
            return Ok(false);
        }
    }
    Ok(true)
}

/// 打开文本库
///
/// 已有文件结构不符或无法读取时，先移动到隔离目录
/// （`<文件名>.invalid_<YYYYmmdd_HHMMSS>`），再创建新的空库
pub async fn open_store(
    path: &Path,
    quarantine_dir: &Path,
    max_connections: u32,
) -> Result<DbPool, StoreError> {
    if fs::try_exists(path).await.unwrap_or(false) && !inspect_existing(path).await {
        let moved_to = quarantine(path, quarantine_dir).await?;
        tracing::warn!(
            path = %path.display(),
            moved_to = %moved_to.display(),
            "Invalid database quarantined, creating a new one"
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let config = DatabaseConfig::new(path).with_max_connections(max_connections);
    let pool = create_pool(&config)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

    Ok(pool)
}

/// 打开已有文件并检查结构，任何错误都视为无效
async fn inspect_existing(path: &Path) -> bool {
    let options = SqliteConnectOptions::new().filename(path);
    let pool = match SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open database");
            return false;
        }
    };

    let valid = match verify_schema(&pool).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read database schema");
            false
        }
    };

    pool.close().await;
    valid
}

async fn quarantine(path: &Path, quarantine_dir: &Path) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(quarantine_dir)
        .await
        .map_err(|e| StoreError::Io(e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "database".to_string());
    let target_name = format!(
        "{}.invalid_{}",
        file_name,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let target = quarantine_dir.join(&target_name);

    move_file(path, &target).await?;

    // WAL 的附属文件一起移走，避免被新库读到
    for suffix in ["-wal", "-shm"] {
        let sidecar = PathBuf::from(format!("{}{}", path.display(), suffix));
        if fs::try_exists(&sidecar).await.unwrap_or(false) {
            move_file(&sidecar, &quarantine_dir.join(format!("{}{}", target_name, suffix)))
                .await?;
        }
    }

    Ok(target)
}

async fn move_file(from: &Path, to: &Path) -> Result<(), StoreError> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    // 跨文件系统时 rename 会失败
    fs::copy(from, to)
        .await
        .map_err(|e| StoreError::Io(e.to_string()))?;
    fs::remove_file(from)
        .await
        .map_err(|e| StoreError::Io(e.to_string()))
}
