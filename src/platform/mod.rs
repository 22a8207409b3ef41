// Travelgo platform paths
// Where settings.json and the client store live on each OS.
//
// Selected with `cfg(target_os)` at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Overrides the storage directory (database file).
pub const DATA_DIR_ENV: &str = "TRAVELGO_DATA_DIR";

/// Returns the configuration directory for Travelgo.
///
/// - **Linux**: `~/.config/travelgo` (or `$XDG_CONFIG_HOME/travelgo`)
/// - **macOS**: `~/Library/Application Support/Travelgo`
/// - **Windows**: `%APPDATA%/Travelgo`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding the client store.
///
/// `TRAVELGO_DATA_DIR` wins when set and non-empty.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
