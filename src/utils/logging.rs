//! Logging macros gated on a per-module `ENABLE_LOGS` switch.
//!
//! Pipeline stages run once per input event, so each stage can be silenced
//! on its own without touching the global `RUST_LOG` filter:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info};
//!
//! log_info!("classifier ready with {} rules", rules.len());
//! ```
//!
//! The macros are exported at the crate root. A module that invokes them
//! must define `ENABLE_LOGS` in scope or compilation fails.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Store and notifier failures land here; they are never fatal.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// True when `SHORTCUT_COACH_DEBUG` is `1` or `true` (case-insensitive).
pub fn debug_mode_from_env() -> bool {
    std::env::var("SHORTCUT_COACH_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
