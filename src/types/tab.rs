use serde::{Deserialize, Serialize};

/// A browser tab as reported by the extension host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: i64,
    #[serde(default, alias = "windowId")]
    pub window_id: i64,
    #[serde(default)]
    pub url: Option<String>,
}

impl TabInfo {
    pub fn new(id: i64, window_id: i64, url: Option<&str>) -> Self {
        Self {
            id,
            window_id,
            url: url.map(str::to_string),
        }
    }
}

/// Load status carried by a tab-updated notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    Unloaded,
}

/// The `changeInfo` part of a tab-updated notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabChange {
    #[serde(default)]
    pub status: Option<TabStatus>,
    #[serde(default)]
    pub url: Option<String>,
}
