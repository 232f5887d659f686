use serde::{Deserialize, Serialize};

/// Storage keys shared with the extension's `chrome.storage.local` layout.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const SAVED_EMAIL: &str = "savedEmail";
    pub const SAVED_PASSWORD: &str = "savedPassword";
    pub const SAVED_DOMAIN: &str = "savedDomain";

    pub const ALL: [&str; 5] = [TOKEN, IS_LOGGED_IN, SAVED_EMAIL, SAVED_PASSWORD, SAVED_DOMAIN];
}

/// The persisted credential record.
///
/// `encrypted_password` is a base64 blob produced by the password cipher with
/// `email` as the passphrase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: Option<String>,
    pub encrypted_password: Option<String>,
    pub domain: Option<String>,
    pub token: Option<String>,
    pub logged_in: bool,
}

impl CredentialRecord {
    /// A session counts as live only when the flag is set and a token exists.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in && self.token.is_some()
    }

    /// Email and encrypted password are both stored.
    pub fn has_saved_credentials(&self) -> bool {
        self.email.is_some() && self.encrypted_password.is_some()
    }
}

/// Request body for `POST /api/v4/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response body for `POST /api/v4/auth/login`. Only the token is read.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}
