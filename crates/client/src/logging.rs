//! Cross-platform logging module.
//!
//! Provides unified logging macros that dispatch to the appropriate backend:
//! - Web: `web_sys::console`
//! - Desktop/tests: `tracing` crate

use crate::config::AppConfig;

/// Install the global subscriber.
///
/// Debug output follows `AppConfig::enable_debug_logs` unless `RUST_LOG` is
/// set. A second call is a no-op.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(config: &AppConfig) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if config.enable_debug_logs {
        "lms_admin_client=debug"
    } else {
        "lms_admin_client=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .try_init();

    tracing::info!(
        app = %config.app_name,
        version = %config.version,
        environment = config.environment.as_str(),
        api = %config.api_base_url,
        "client starting"
    );
}

#[cfg(target_arch = "wasm32")]
pub fn init(config: &AppConfig) {
    DEBUG_ENABLED.store(config.enable_debug_logs, std::sync::atomic::Ordering::Relaxed);
    log_info_impl(&format!(
        "{} {} starting ({}, api {})",
        config.app_name,
        config.version,
        config.environment.as_str(),
        config.api_base_url
    ));
}

#[cfg(target_arch = "wasm32")]
static DEBUG_ENABLED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Log an info message (platform-specific)
#[cfg(target_arch = "wasm32")]
pub fn log_info_impl(msg: &str) {
    web_sys::console::info_1(&format!("[LMS INFO] {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_info_impl(msg: &str) {
    tracing::info!("{}", msg);
}

/// Log an error message (platform-specific)
#[cfg(target_arch = "wasm32")]
pub fn log_error_impl(msg: &str) {
    web_sys::console::error_1(&format!("[LMS ERROR] {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_error_impl(msg: &str) {
    tracing::error!("{}", msg);
}

/// Log a warning message (platform-specific)
#[cfg(target_arch = "wasm32")]
pub fn log_warn_impl(msg: &str) {
    web_sys::console::warn_1(&format!("[LMS WARN] {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_warn_impl(msg: &str) {
    tracing::warn!("{}", msg);
}

/// Log a debug message (platform-specific)
#[cfg(target_arch = "wasm32")]
pub fn log_debug_impl(msg: &str) {
    if DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
        web_sys::console::debug_1(&format!("[LMS DEBUG] {msg}").into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_debug_impl(msg: &str) {
    tracing::debug!("{}", msg);
}

/// Log an info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log_info_impl(&format!($($arg)*))
    };
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log_error_impl(&format!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log_warn_impl(&format!($($arg)*))
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log_debug_impl(&format!($($arg)*))
    };
}
