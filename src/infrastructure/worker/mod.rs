//! Worker Layer - Background Task Processing
//!
//! 实现 PlaybackDriver，串行驱动播放控制器

mod playback_driver;

pub use playback_driver::{PlaybackDriver, PlaybackDriverConfig, PlaybackHandle};
