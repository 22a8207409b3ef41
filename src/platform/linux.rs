// Travelgo platform paths for Linux
// Config: ~/.config/travelgo
// Data:   ~/.local/share/travelgo

use std::env;
use std::path::PathBuf;

fn home() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `$XDG_CONFIG_HOME/travelgo` if set, otherwise `~/.config/travelgo`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("travelgo"),
        _ => home().join(".config").join("travelgo"),
    }
}

/// `$XDG_DATA_HOME/travelgo` if set, otherwise `~/.local/share/travelgo`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("travelgo"),
        _ => home().join(".local").join("share").join("travelgo"),
    }
}
