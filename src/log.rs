// src/log.rs
//
// File logger behind the logf!/logd!/logw!/loge! macros.
// Events go through `tracing`; `init` wires a fmt subscriber that appends
// to `<store>/debug.log`. RUST_LOG overrides the default `info` filter.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::EnvFilter;

#[doc(hidden)]
pub use tracing;

pub const LOG_FILE: &str = "debug.log";

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init(store_dir: &Path) -> crate::Result<()> {
    if LOG_PATH.get().is_some() {
        return Ok(());
    }

    fs::create_dir_all(store_dir)?;
    let path = store_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    // Another subscriber (tests, embedding app) wins; keep going quietly.
    if installed.is_ok() {
        let _ = LOG_PATH.set(path);
    }
    Ok(())
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::tracing::error!($($arg)*)
    };
}
