//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default backend address (the Flask development server's bind).
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Seconds a notification stays fully visible before it starts fading.
pub const NOTICE_VISIBLE_SECS: f32 = 5.0;
/// Seconds of fade-out after the visible window.
pub const NOTICE_FADE_SECS: f32 = 0.5;
