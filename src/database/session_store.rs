//! Session store: the key-value record shared by the watcher and the popup.
//!
//! Values are JSON, keyed exactly like the extension's `chrome.storage.local`
//! (`token`, `isLoggedIn`, `savedEmail`, `savedPassword`, `savedDomain`).
//! The typed helpers on [`SessionStore`] are the only writers of the record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::connection::Database;
use crate::types::credential::{keys, CredentialRecord};
use crate::types::errors::StoreError;

/// Key-value persistence for the credential record.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes all entries or none.
    fn set_many(&self, entries: &[(&str, Value)]) -> Result<(), StoreError>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.get(key)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        })
    }

    /// Reads the whole record. Null, empty and mistyped values count as absent.
    fn load_record(&self) -> Result<CredentialRecord, StoreError> {
        let logged_in = matches!(self.get(keys::IS_LOGGED_IN)?, Some(Value::Bool(true)));
        Ok(CredentialRecord {
            email: self.get_string(keys::SAVED_EMAIL)?,
            encrypted_password: self.get_string(keys::SAVED_PASSWORD)?,
            domain: self.get_string(keys::SAVED_DOMAIN)?,
            token: self.get_string(keys::TOKEN)?,
            logged_in,
        })
    }

    /// Manual login: writes all five fields.
    fn save_login(
        &self,
        email: &str,
        encrypted_password: &str,
        domain: &str,
        token: &str,
    ) -> Result<(), StoreError> {
        self.set_many(&[
            (keys::TOKEN, Value::from(token)),
            (keys::IS_LOGGED_IN, Value::Bool(true)),
            (keys::SAVED_EMAIL, Value::from(email)),
            (keys::SAVED_PASSWORD, Value::from(encrypted_password)),
            (keys::SAVED_DOMAIN, Value::from(domain)),
        ])
    }

    /// Token renewal: replaces the token and raises the flag.
    fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.set_many(&[
            (keys::TOKEN, Value::from(token)),
            (keys::IS_LOGGED_IN, Value::Bool(true)),
        ])
    }

    /// Silent login from saved credentials.
    fn save_silent_login(&self, token: &str, email: &str, domain: &str) -> Result<(), StoreError> {
        self.set_many(&[
            (keys::TOKEN, Value::from(token)),
            (keys::IS_LOGGED_IN, Value::Bool(true)),
            (keys::SAVED_EMAIL, Value::from(email)),
            (keys::SAVED_DOMAIN, Value::from(domain)),
        ])
    }

    /// Drops the token and lowers the flag in one write; saved credentials stay.
    ///
    /// A null token reads as absent, so no separate delete is needed.
    fn end_session(&self) -> Result<(), StoreError> {
        self.set_many(&[
            (keys::TOKEN, Value::Null),
            (keys::IS_LOGGED_IN, Value::Bool(false)),
        ])
    }

    /// Removes every field of the record.
    fn clear_all(&self) -> Result<(), StoreError> {
        self.remove_many(&keys::ALL)
    }
}

/// SQLite-backed store.
pub struct SqliteSessionStore {
    db: Arc<Database>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now_ts() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.db.connection();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set_many(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        let mut conn = self.db.connection();
        let tx = conn.transaction()?;
        let now = Self::now_ts();
        for (key, value) in entries {
            let text = serde_json::to_string(value)?;
            tx.execute(
                "INSERT OR REPLACE INTO session_kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, text, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut conn = self.db.connection();
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM session_kv WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral hosts.
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, Value)]) -> Result<(), StoreError> {
        let mut values = self.values();
        for (key, value) in entries {
            values.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut values = self.values();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
