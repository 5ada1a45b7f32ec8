//! Logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! A module opts in by defining the flag and importing the macros from the
//! crate root:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn, log_error};
//!
//! log_info!("camera opened at {}x{}", 480, 360);
//! ```
//!
//! Turning the flag off silences the module without touching `RUST_LOG`.
//! Output still goes through the `log` facade, so `env_logger` filtering
//! applies on top.

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

/// Initialize `env_logger` once. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
