//! App core for the WideChat session host.
//!
//! Owns the session components and turns [`Command`]s into JSON results. The
//! reactor is the only caller, so commands run strictly one at a time.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::database::connection::Database;
use crate::database::session_store::{SessionStore, SqliteSessionStore};
use crate::managers::popup_session::PopupSession;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::managers::tab_watcher::TabCloseWatcher;
use crate::services::crypto_service::PasswordCipher;
use crate::services::notifier::Notifier;
use crate::services::session_client::{HttpSessionClient, SessionApi};
use crate::services::settings_engine::SettingsEngine;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::event::{BrowserEvent, Command};

pub struct App {
    pub store: Arc<dyn SessionStore>,
    pub tabs: TabRegistry,
    watcher: TabCloseWatcher,
    popup: PopupSession,
}

impl App {
    /// Wires the components around explicit collaborators.
    pub fn new(
        store: Arc<dyn SessionStore>,
        api: Arc<dyn SessionApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let watcher = TabCloseWatcher::new(store.clone(), api.clone(), notifier.clone());
        let popup = PopupSession::new(store.clone(), api, notifier, PasswordCipher::new());
        Self {
            store,
            tabs: TabRegistry::new(),
            watcher,
            popup,
        }
    }

    /// Opens the SQLite store and HTTP client described by the loaded settings.
    pub fn from_settings(
        engine: &SettingsEngine,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = engine.get_settings();
        let db_path = engine.database_path();
        tracing::info!(path = %db_path.display(), "Opening session store");

        let db = Arc::new(Database::open(&db_path)?);
        let store: Arc<dyn SessionStore> = Arc::new(SqliteSessionStore::new(db));
        let api: Arc<dyn SessionApi> = Arc::new(HttpSessionClient::new(&settings.api)?);
        Ok(Self::new(store, api, notifier))
    }

    /// Executes one command to completion.
    pub async fn dispatch(&mut self, command: Command) -> Result<Value, String> {
        match command {
            Command::Browser(event) => self.handle_browser_event(event).await,
            Command::PopupOpen => {
                let view = self.popup.bootstrap().await.map_err(|e| e.to_string())?;
                serde_json::to_value(view).map_err(|e| e.to_string())
            }
            Command::PopupLogin {
                email,
                password,
                domain,
            } => {
                let password = zeroize::Zeroizing::new(password);
                let view = self
                    .popup
                    .login(&email, &password, &domain)
                    .await
                    .map_err(|e| e.to_string())?;
                serde_json::to_value(view).map_err(|e| e.to_string())
            }
            Command::PopupLogout => {
                self.popup.logout().await.map_err(|e| e.to_string())?;
                Ok(json!({"ok": true}))
            }
            Command::PopupClear => {
                self.popup.clear_credentials().map_err(|e| e.to_string())?;
                Ok(json!({"ok": true}))
            }
        }
    }

    async fn handle_browser_event(&mut self, event: BrowserEvent) -> Result<Value, String> {
        self.tabs.apply(&event);
        tracing::debug!(event = event.name(), tabs = self.tabs.tab_count(), "Browser event");

        if !event.triggers_check() {
            return Ok(json!({"outcome": "tracked", "tabs": self.tabs.tab_count()}));
        }

        let outcome = self
            .watcher
            .check_and_logout(&self.tabs)
            .await
            .map_err(|e| {
                tracing::error!(event = event.name(), error = %e, "Agent tab check failed");
                e.to_string()
            })?;
        serde_json::to_value(outcome).map_err(|e| e.to_string())
    }
}
