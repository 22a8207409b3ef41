use thiserror::Error;

// === StorageError ===

/// Errors related to the client key/value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    DatabaseError(String),
    /// A stored value could not be serialized or parsed.
    #[error("Storage serialization error: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

// === CryptoError ===

/// Errors related to cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Failed to derive encryption key from password.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
    /// Decryption operation failed.
    #[error("Decryption failed: {0}")]
    Decryption(String),
    /// Failed to generate random bytes.
    #[error("Random generation failed: {0}")]
    RandomGeneration(String),
    /// The provided key is invalid.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// === SessionError ===

/// Errors related to the persisted login session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session keys failed.
    #[error("Session storage error: {0}")]
    StorageError(#[from] StorageError),
    /// Cryptographic operation failed during token encryption/decryption.
    #[error("Session crypto error: {0}")]
    CryptoError(#[from] CryptoError),
    /// A stored session value was not in the expected encoding.
    #[error("Session encoding error: {0}")]
    EncodingError(String),
    /// Failed to serialize or deserialize a transient value.
    #[error("Session serialization error: {0}")]
    SerializationError(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === FetchError ===

/// Failures of a request against the listing backend.
///
/// Each variant maps to its own user-facing message; none of them is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP error {status}: {status_text}")]
    Http { status: u16, status_text: String },
    /// The request never reached the server or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),
    /// The request did not settle before the timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// The body was not the JSON shape we expected.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Human-readable text shown in the inline error panel.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Http {
                status: 404,
                status_text,
            } => format!("The requested item could not be found (404 {}).", status_text),
            FetchError::Http {
                status,
                status_text,
            } => format!(
                "The server answered with an error ({} {}). Please try again later.",
                status, status_text
            ),
            FetchError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            FetchError::Timeout(_) => {
                "The server is too slow to respond. Please try again later.".to_string()
            }
            FetchError::Malformed(_) => {
                "The server sent an unexpected response. Please try again later.".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Http { status: 404, .. })
    }
}

// === AuthError ===

/// Errors raised by the login and registration flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend refused the email/password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The backend rejected a registration with a detail message.
    #[error("Registration rejected: {0}")]
    Rejected(String),
    /// The request itself failed.
    #[error("Auth request failed: {0}")]
    Fetch(#[from] FetchError),
    /// The session could not be written or cleared.
    #[error("Auth session error: {0}")]
    Session(#[from] SessionError),
}
