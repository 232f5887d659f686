use serde::{Deserialize, Serialize};

use super::tab::{TabChange, TabInfo, TabStatus};

/// Browser lifecycle events forwarded by the extension host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserEvent {
    /// A tab finished loading or navigated. `tab` carries its current state.
    TabUpdated { tab: TabInfo, change: TabChange },
    TabRemoved { tab_id: i64 },
    WindowRemoved { window_id: i64 },
    /// The browser (re)started; `tabs` is the full set of restored tabs.
    Startup { tabs: Vec<TabInfo> },
    /// Replaces the known tab set without triggering a check.
    TabsSync { tabs: Vec<TabInfo> },
    /// Explicit "check and logout" message.
    CheckAndLogout,
}

impl BrowserEvent {
    /// Whether this event should re-run the agent-tab check.
    ///
    /// Tab updates only count when loading completed or the URL changed.
    pub fn triggers_check(&self) -> bool {
        match self {
            BrowserEvent::TabUpdated { change, .. } => {
                change.status == Some(TabStatus::Complete) || change.url.is_some()
            }
            BrowserEvent::TabsSync { .. } => false,
            BrowserEvent::TabRemoved { .. }
            | BrowserEvent::WindowRemoved { .. }
            | BrowserEvent::Startup { .. }
            | BrowserEvent::CheckAndLogout => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BrowserEvent::TabUpdated { .. } => "tab.updated",
            BrowserEvent::TabRemoved { .. } => "tab.removed",
            BrowserEvent::WindowRemoved { .. } => "window.removed",
            BrowserEvent::Startup { .. } => "browser.startup",
            BrowserEvent::TabsSync { .. } => "tabs.sync",
            BrowserEvent::CheckAndLogout => "session.check",
        }
    }
}

/// Everything the reactor can be asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Browser(BrowserEvent),
    PopupOpen,
    PopupLogin {
        email: String,
        password: String,
        domain: String,
    },
    PopupLogout,
    PopupClear,
}
