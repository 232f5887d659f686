use std::fmt;

// === CryptoError ===

/// Errors related to password encryption.
#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    /// Failed to derive the symmetric key from the passphrase.
    KeyDerivation(String),
    /// Encryption operation failed.
    Encryption(String),
    /// Decryption operation failed.
    Decryption(String),
    /// Failed to generate random bytes.
    RandomGeneration(String),
    /// The stored blob is not valid base64 or is too short.
    MalformedBlob(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeyDerivation(msg) => write!(f, "Key derivation failed: {}", msg),
            CryptoError::Encryption(msg) => write!(f, "Encryption failed: {}", msg),
            CryptoError::Decryption(msg) => write!(f, "Decryption failed: {}", msg),
            CryptoError::RandomGeneration(msg) => {
                write!(f, "Random generation failed: {}", msg)
            }
            CryptoError::MalformedBlob(msg) => write!(f, "Malformed encrypted blob: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

// === StoreError ===

/// Errors related to the local session store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Session store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Session store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}

// === ApiError ===

/// Errors raised while talking to the WideChat auth API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The domain cannot be used to build an endpoint URL.
    InvalidDomain(String),
    /// The request never produced a response.
    NetworkError(String),
    /// The server answered with an unexpected status code.
    Status(u16),
    /// The response body could not be parsed.
    InvalidResponse(String),
    /// The login response did not carry a token.
    MissingToken,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidDomain(domain) => write!(f, "Invalid domain: {}", domain),
            ApiError::NetworkError(msg) => write!(f, "Auth API network error: {}", msg),
            ApiError::Status(code) => write!(f, "Auth API returned status {}", code),
            ApiError::InvalidResponse(msg) => write!(f, "Invalid auth API response: {}", msg),
            ApiError::MissingToken => write!(f, "Login response carried no token"),
        }
    }
}

impl std::error::Error for ApiError {}

// === PopupError ===

/// Errors surfaced to the user by popup operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupError {
    /// Email, password or domain was left empty.
    MissingFields,
    /// The server refused the credentials or could not be reached.
    LoginRejected,
    /// No token or domain is stored, so there is nothing to log out.
    NothingToLogOut,
    /// The remote logout call failed.
    LogoutFailed,
    /// The local store failed.
    Store(String),
    /// The password could not be encrypted.
    Crypto(String),
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupError::MissingFields => {
                write!(f, "Fill in every field, including the domain")
            }
            PopupError::LoginRejected => {
                write!(f, "Login failed. Check your credentials and the domain")
            }
            PopupError::NothingToLogOut => {
                write!(f, "No token or domain saved. Unable to log out completely")
            }
            PopupError::LogoutFailed => write!(f, "Logout failed"),
            PopupError::Store(msg) => write!(f, "Storage error: {}", msg),
            PopupError::Crypto(msg) => write!(f, "Encryption error: {}", msg),
        }
    }
}

impl std::error::Error for PopupError {}

impl From<StoreError> for PopupError {
    fn from(err: StoreError) -> Self {
        PopupError::Store(err.to_string())
    }
}

impl From<CryptoError> for PopupError {
    fn from(err: CryptoError) -> Self {
        PopupError::Crypto(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    IoError(String),
    /// The settings file is not valid JSON for `SessionSettings`.
    SerializationError(String),
    /// A setting parsed but cannot be used (e.g. a zero limit).
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
