// Windows paths
// Config and data: %APPDATA%/WideChatSession

use std::env;
use std::path::PathBuf;

fn roaming_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("WideChatSession")
}

pub fn get_config_dir() -> PathBuf {
    roaming_dir()
}

pub fn get_data_dir() -> PathBuf {
    roaming_dir()
}
