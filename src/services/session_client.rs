//! Remote session client for the WideChat auth API.
//!
//! Three calls against a caller-supplied domain: login, validate (`/auth/me`)
//! and logout. Every call is attempted once. The [`SessionApi`] surface folds
//! failures into `None`/`false` after logging them; the `try_*` methods keep
//! the reason for callers that want it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::types::credential::{LoginRequest, LoginResponse};
use crate::types::errors::ApiError;
use crate::types::settings::{ApiScheme, ApiSettings};

const LOGIN_PATH: &str = "/api/v4/auth/login";
const ME_PATH: &str = "/api/v4/auth/me";
const LOGOUT_PATH: &str = "/api/v4/auth/logout?type=all";

/// Auth operations the session components depend on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str, domain: &str) -> Option<String>;

    /// True only when the server answers 200 for the token.
    async fn validate(&self, token: &str, domain: &str) -> bool;

    /// True on any 2xx.
    async fn logout(&self, token: &str, domain: &str) -> bool;
}

/// `reqwest` implementation of [`SessionApi`].
#[derive(Clone)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    scheme: ApiScheme,
}

impl HttpSessionClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        Ok(Self {
            http,
            scheme: settings.scheme,
        })
    }

    /// Builds `<scheme>://<domain><path>`.
    ///
    /// The domain is a bare host, optionally with a port; anything carrying a
    /// scheme, path, userinfo or whitespace is rejected.
    pub fn endpoint(&self, domain: &str, path: &str) -> Result<String, ApiError> {
        let domain = domain.trim();
        let invalid = domain.is_empty()
            || domain.contains("://")
            || domain.contains('/')
            || domain.contains('?')
            || domain.contains('#')
            || domain.contains('@')
            || domain.chars().any(char::is_whitespace);
        if invalid {
            return Err(ApiError::InvalidDomain(domain.to_string()));
        }
        Ok(format!("{}://{}{}", self.scheme.as_str(), domain, path))
    }

    pub async fn try_login(&self, email: &str, password: &str, domain: &str) -> Result<String, ApiError> {
        let url = self.endpoint(domain, LOGIN_PATH)?;
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::MissingToken),
        }
    }

    pub async fn try_validate(&self, token: &str, domain: &str) -> Result<bool, ApiError> {
        let url = self.endpoint(domain, ME_PATH)?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        Ok(response.status() == StatusCode::OK)
    }

    pub async fn try_logout(&self, token: &str, domain: &str) -> Result<(), ApiError> {
        let url = self.endpoint(domain, LOGOUT_PATH)?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl SessionApi for HttpSessionClient {
    async fn login(&self, email: &str, password: &str, domain: &str) -> Option<String> {
        match self.try_login(email, password, domain).await {
            Ok(token) => {
                tracing::info!(%domain, "WideChat login succeeded");
                Some(token)
            }
            Err(err) => {
                tracing::error!(%domain, error = %err, "WideChat login failed");
                None
            }
        }
    }

    async fn validate(&self, token: &str, domain: &str) -> bool {
        match self.try_validate(token, domain).await {
            Ok(valid) => {
                tracing::debug!(%domain, valid, "Validated WideChat token");
                valid
            }
            Err(err) => {
                tracing::error!(%domain, error = %err, "Failed to validate WideChat token");
                false
            }
        }
    }

    async fn logout(&self, token: &str, domain: &str) -> bool {
        match self.try_logout(token, domain).await {
            Ok(()) => {
                tracing::info!(%domain, "WideChat session logged out");
                true
            }
            Err(err) => {
                tracing::error!(%domain, error = %err, "WideChat logout failed");
                false
            }
        }
    }
}
