//! Popup session bootstrapper.
//!
//! Decides what the popup shows when it opens (validating, renewing or
//! silently re-establishing the session first) and implements the popup's
//! login, logout and clear-credentials actions.

use std::sync::Arc;

use serde::Serialize;
use tokio::task;
use zeroize::Zeroizing;

use crate::database::session_store::SessionStore;
use crate::services::crypto_service::{PasswordCipher, PasswordCipherTrait};
use crate::services::notifier::Notifier;
use crate::services::session_client::SessionApi;
use crate::types::credential::CredentialRecord;
use crate::types::errors::PopupError;
use crate::types::notification::Notification;

const NOTIFICATION_TITLE: &str = "WideChat";
const RENEWAL_FAILED_MESSAGE: &str = "Could not renew the WideChat session. Log in again.";

/// What the popup should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PopupView {
    LoggedIn {
        email: Option<String>,
        /// The stored token was rejected and replaced.
        renewed: bool,
    },
    LoginForm {
        /// Prefill for the domain field.
        domain: Option<String>,
        message: Option<String>,
    },
}

pub struct PopupSession {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn SessionApi>,
    notifier: Arc<dyn Notifier>,
    cipher: PasswordCipher,
}

impl PopupSession {
    pub fn new(
        store: Arc<dyn SessionStore>,
        api: Arc<dyn SessionApi>,
        notifier: Arc<dyn Notifier>,
        cipher: PasswordCipher,
    ) -> Self {
        Self {
            store,
            api,
            notifier,
            cipher,
        }
    }

    /// Saved password, decrypted with the saved email as passphrase.
    ///
    /// Key derivation runs on the blocking pool.
    async fn saved_password(&self, record: &CredentialRecord) -> Option<Zeroizing<String>> {
        let (Some(email), Some(blob)) = (record.email.clone(), record.encrypted_password.clone()) else {
            return None;
        };
        let cipher = self.cipher.clone();
        match task::spawn_blocking(move || cipher.decrypt(&blob, &email)).await {
            Ok(password) => password,
            Err(err) => {
                tracing::error!(error = %err, "Password decryption task failed");
                None
            }
        }
    }

    async fn encrypt_password(&self, password: &str, email: &str) -> Result<String, PopupError> {
        let cipher = self.cipher.clone();
        let password = Zeroizing::new(password.to_string());
        let email = email.to_string();
        task::spawn_blocking(move || cipher.encrypt(&password, &email))
            .await
            .map_err(|e| PopupError::Crypto(e.to_string()))?
            .map_err(PopupError::from)
    }

    /// Popup-open flow.
    ///
    /// 1. Token and domain stored: validate; on rejection renew with the
    ///    saved credentials, and notify the user when that fails too.
    /// 2. Not logged in but credentials saved: silent login.
    /// 3. Otherwise: the login form, prefilled with the saved domain.
    pub async fn bootstrap(&self) -> Result<PopupView, PopupError> {
        let record = self.store.load_record()?;
        let password = self.saved_password(&record).await;

        if let (Some(token), Some(domain)) = (&record.token, &record.domain) {
            if self.api.validate(token, domain).await {
                if !record.logged_in {
                    self.store.save_token(token)?;
                }
                return Ok(PopupView::LoggedIn {
                    email: record.email.clone(),
                    renewed: false,
                });
            }

            tracing::info!(%domain, "Stored token rejected, renewing");
            if let (Some(email), Some(password)) = (&record.email, &password) {
                if let Some(fresh) = self.api.login(email, password, domain).await {
                    self.store.save_token(&fresh)?;
                    return Ok(PopupView::LoggedIn {
                        email: Some(email.clone()),
                        renewed: true,
                    });
                }
                self.notifier
                    .notify(Notification::new(NOTIFICATION_TITLE, RENEWAL_FAILED_MESSAGE));
                return Ok(PopupView::LoginForm {
                    domain: Some(domain.clone()),
                    message: Some(RENEWAL_FAILED_MESSAGE.to_string()),
                });
            }

            return Ok(PopupView::LoginForm {
                domain: Some(domain.clone()),
                message: None,
            });
        }

        if !record.is_logged_in() {
            if let (Some(email), Some(password), Some(domain)) =
                (&record.email, &password, &record.domain)
            {
                if let Some(token) = self.api.login(email, password, domain).await {
                    self.store.save_silent_login(&token, email, domain)?;
                    return Ok(PopupView::LoggedIn {
                        email: Some(email.clone()),
                        renewed: false,
                    });
                }
            }
        }

        Ok(PopupView::LoginForm {
            domain: record.domain,
            message: None,
        })
    }

    /// Manual login. Nothing is persisted unless the server hands out a token.
    pub async fn login(&self, email: &str, password: &str, domain: &str) -> Result<PopupView, PopupError> {
        let email = email.trim();
        let domain = domain.trim();
        if email.is_empty() || password.is_empty() || domain.is_empty() {
            return Err(PopupError::MissingFields);
        }

        let Some(token) = self.api.login(email, password, domain).await else {
            return Err(PopupError::LoginRejected);
        };

        let encrypted_password = self.encrypt_password(password, email).await?;
        self.store
            .save_login(email, &encrypted_password, domain, &token)?;
        tracing::info!(%domain, "Saved WideChat credentials");

        Ok(PopupView::LoggedIn {
            email: Some(email.to_string()),
            renewed: false,
        })
    }

    /// Manual logout. On success every stored field is cleared.
    pub async fn logout(&self) -> Result<(), PopupError> {
        let record = self.store.load_record()?;
        let (Some(token), Some(domain)) = (&record.token, &record.domain) else {
            tracing::warn!("Logout requested without a saved token or domain");
            return Err(PopupError::NothingToLogOut);
        };

        if !self.api.logout(token, domain).await {
            return Err(PopupError::LogoutFailed);
        }
        self.store.clear_all()?;
        Ok(())
    }

    /// Removes every stored field without contacting the server.
    pub fn clear_credentials(&self) -> Result<(), PopupError> {
        self.store.clear_all()?;
        tracing::info!("Cleared saved WideChat credentials");
        Ok(())
    }
}
