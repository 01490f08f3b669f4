//! SQLite Persistence - SQLite 数据库持久化实现

mod category_repo;
mod database;
mod text_repo;

pub use category_repo::*;
pub use database::*;
pub use text_repo::*;
