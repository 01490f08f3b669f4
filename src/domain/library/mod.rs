//! Library Context - 文本库限界上下文
//!
//! 职责:
//! - 分类与文本的值对象校验
//! - 文本排序条目

mod value_objects;

pub use value_objects::{CategoryName, SortEntry, TextTitle};
