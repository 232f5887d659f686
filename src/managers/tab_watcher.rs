//! Tab-close watcher.
//!
//! Re-evaluated from scratch on every trigger: when no open tab is an agent
//! tab, the stored WideChat session is logged out. There is no debouncing;
//! repeated logouts for the same token are harmless because the remote logout
//! is idempotent.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;

use crate::database::session_store::SessionStore;
use crate::services::notifier::Notifier;
use crate::services::session_client::SessionApi;
use crate::types::credential::keys;
use crate::types::errors::StoreError;
use crate::types::notification::Notification;

/// URL prefix of the operator-facing chat page.
pub const AGENT_TAB_PATTERN: &str = r"^https://.*\.widechat\.com\.br/user/agent";

const NOTIFICATION_TITLE: &str = "WideChat";
const LOGOUT_FAILED_MESSAGE: &str =
    "Automatic WideChat logout failed. Log out manually from the extension popup.";

fn agent_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(AGENT_TAB_PATTERN).ok())
        .as_ref()
}

/// Whether `url` points at a WideChat agent page. `None` is never an agent tab.
pub fn is_agent_tab(url: Option<&str>) -> bool {
    match (url, agent_pattern()) {
        (Some(url), Some(pattern)) => pattern.is_match(url),
        _ => false,
    }
}

/// Enumerates the URLs of every open tab.
pub trait TabSource: Send + Sync {
    /// `None` while the full tab set is not known yet.
    fn open_tab_urls(&self) -> Option<Vec<Option<String>>>;
}

/// What a single check decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchOutcome {
    /// No domain stored, nothing can be done.
    NoDomain,
    /// The browser's tab set has not been reported yet; no logout is attempted.
    TabsUnknown,
    AgentTabOpen { agent_tabs: usize },
    /// No agent tab, but no token to log out with.
    NoToken,
    LoggedOut,
    LogoutFailed { notification_id: String },
}

pub struct TabCloseWatcher {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn SessionApi>,
    notifier: Arc<dyn Notifier>,
}

impl TabCloseWatcher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        api: Arc<dyn SessionApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            api,
            notifier,
        }
    }

    /// Runs one check against the current tab set.
    ///
    /// A successful logout ends the stored session (token dropped, flag
    /// lowered) but keeps email, encrypted password and domain. A failed
    /// logout leaves the store untouched and notifies the user.
    pub async fn check_and_logout(&self, tabs: &dyn TabSource) -> Result<WatchOutcome, StoreError> {
        let Some(domain) = self.store.get_string(keys::SAVED_DOMAIN)? else {
            tracing::debug!("No saved domain, skipping agent tab check");
            return Ok(WatchOutcome::NoDomain);
        };
        let token = self.store.get_string(keys::TOKEN)?;

        let Some(urls) = tabs.open_tab_urls() else {
            tracing::debug!("Tab set not synced yet, skipping agent tab check");
            return Ok(WatchOutcome::TabsUnknown);
        };

        let agent_tabs = urls
            .iter()
            .filter(|url| is_agent_tab(url.as_deref()))
            .count();
        if agent_tabs > 0 {
            tracing::debug!(agent_tabs, "Agent tab still open");
            return Ok(WatchOutcome::AgentTabOpen { agent_tabs });
        }

        let Some(token) = token else {
            tracing::warn!(%domain, "No agent tab open but no token saved, skipping logout");
            return Ok(WatchOutcome::NoToken);
        };

        tracing::info!(%domain, "No agent tab open, logging out of WideChat");
        if self.api.logout(&token, &domain).await {
            self.store.end_session()?;
            Ok(WatchOutcome::LoggedOut)
        } else {
            let notification = Notification::new(NOTIFICATION_TITLE, LOGOUT_FAILED_MESSAGE);
            let notification_id = notification.id.clone();
            self.notifier.notify(notification);
            Ok(WatchOutcome::LogoutFailed { notification_id })
        }
    }
}
