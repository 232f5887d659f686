// Platform directory resolution for the WideChat session host.
//
// Uses `cfg(target_os)` to pick the platform-specific implementation at
// compile time. `$WIDECHAT_SESSION_DATA_DIR` overrides the data directory on
// every platform.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Overrides the data directory (where the SQLite store lives).
pub const DATA_DIR_ENV: &str = "WIDECHAT_SESSION_DATA_DIR";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/widechat-session` (or `$XDG_CONFIG_HOME/widechat-session`)
/// - **macOS**: `~/Library/Application Support/WideChatSession`
/// - **Windows**: `%APPDATA%/WideChatSession`
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

/// Returns the data directory, honouring `$WIDECHAT_SESSION_DATA_DIR`.
///
/// - **Linux**: `~/.local/share/widechat-session` (or `$XDG_DATA_HOME/widechat-session`)
/// - **macOS**: `~/Library/Application Support/WideChatSession`
/// - **Windows**: `%APPDATA%/WideChatSession`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
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
