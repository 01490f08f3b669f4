//! Storage Adapter - 文本文件存储

mod text_file_store;

pub use text_file_store::TextFileStore;
