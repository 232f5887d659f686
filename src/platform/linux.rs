// Linux paths
// Config: ~/.config/widechat-session
// Data:   ~/.local/share/widechat-session

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "widechat-session";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `$XDG_CONFIG_HOME/widechat-session`, else `~/.config/widechat-session`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
        _ => home_dir().join(".config").join(APP_DIR),
    }
}

/// `$XDG_DATA_HOME/widechat-session`, else `~/.local/share/widechat-session`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
        _ => home_dir().join(".local").join("share").join(APP_DIR),
    }
}
