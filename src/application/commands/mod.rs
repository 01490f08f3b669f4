//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：文本库写操作与播放控制命令

mod library_commands;
mod playback_commands;

pub mod handlers;

pub use library_commands::*;
pub use playback_commands::*;
