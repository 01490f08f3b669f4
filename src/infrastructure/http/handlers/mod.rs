//! HTTP Handlers

mod category;
mod file;
mod ping;
mod playback;
mod text;
mod websocket;

pub use category::*;
pub use file::*;
pub use ping::*;
pub use playback::*;
pub use text::*;
pub use websocket::*;
