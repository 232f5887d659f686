use serde::{Deserialize, Serialize};

/// Top-level settings container for the session host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub host: HostSettings,
}

/// How the WideChat auth API is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    /// `https` in production. `http` is accepted for local test servers.
    pub scheme: ApiScheme,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            scheme: ApiScheme::Https,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiScheme {
    Https,
    Http,
}

impl ApiScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiScheme::Https => "https",
            ApiScheme::Http => "http",
        }
    }
}

/// Where the credential record lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite file path. `None` means `<data dir>/widechat-session.db`.
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Host protocol limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostSettings {
    pub rate_limit_per_second: u32,
    pub queue_capacity: usize,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            rate_limit_per_second: 200,
            queue_capacity: 64,
        }
    }
}
