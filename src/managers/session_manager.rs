//! Session Manager for Travelgo.
//!
//! Writes the login session into the persistent store, reads it back for the
//! auth-gated affordances and clears it on logout. The bearer token is kept
//! encrypted via CryptoService; the other keys are plain strings so the
//! pages can show the user name without touching the key.
//!
//! Also owns the single-use session-scoped values: the page to return to
//! after login, the scroll offset to restore after logout, and the package
//! picked for booking.

use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, warn};

use crate::managers::storage_manager::{keys, KeyValueStore, StorageArea};
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait};
use crate::types::credential::EncryptedData;
use crate::types::errors::SessionError;
use crate::types::listing::Package;
use crate::types::session::{LoginResponse, Session};

/// Passphrase mixed with the per-install salt to derive the token key.
const TOKEN_KEY_PASSPHRASE: &str = "travelgo-token-key-v1";

/// Trait defining session management operations.
pub trait SessionManagerTrait {
    fn login(&self, response: &LoginResponse) -> Result<Session, SessionError>;
    fn current_session(&self) -> Result<Option<Session>, SessionError>;
    fn is_logged_in(&self) -> bool;
    fn logout(&self) -> Result<(), SessionError>;

    fn remember_redirect(&self, url: &str) -> Result<(), SessionError>;
    fn take_redirect(&self) -> Result<Option<String>, SessionError>;
    fn save_scroll_position(&self, offset: f64) -> Result<(), SessionError>;
    fn take_scroll_position(&self) -> Result<Option<f64>, SessionError>;
    fn stash_booking(&self, package: &Package) -> Result<(), SessionError>;
    fn take_booking(&self) -> Result<Option<Package>, SessionError>;
}

/// Session manager over any `KeyValueStore`.
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    crypto: CryptoService,
    key_cache: Mutex<Option<Vec<u8>>>,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            crypto: CryptoService::new(),
            key_cache: Mutex::new(None),
        }
    }

    /// Returns the token key, creating the install salt on first use.
    fn token_key(&self) -> Result<Vec<u8>, SessionError> {
        let mut cache = self.key_cache.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(key) = cache.as_ref() {
            return Ok(key.clone());
        }

        let salt = match self.store.get(StorageArea::Local, keys::TOKEN_SALT)? {
            Some(encoded) => BASE64
                .decode(encoded)
                .map_err(|e| SessionError::EncodingError(e.to_string()))?,
            None => {
                let salt = self.crypto.generate_salt()?;
                self.store
                    .set(StorageArea::Local, keys::TOKEN_SALT, &BASE64.encode(&salt))?;
                salt
            }
        };

        let key = self.crypto.derive_key(TOKEN_KEY_PASSPHRASE, &salt)?;
        *cache = Some(key.clone());
        Ok(key)
    }

    /// `iv.tag.ciphertext`, each part base64.
    fn encode_sealed(sealed: &EncryptedData) -> String {
        format!(
            "{}.{}.{}",
            BASE64.encode(&sealed.iv),
            BASE64.encode(&sealed.auth_tag),
            BASE64.encode(&sealed.ciphertext)
        )
    }

    fn decode_sealed(raw: &str) -> Result<EncryptedData, SessionError> {
        let mut parts = raw.splitn(3, '.');
        let mut next = || -> Result<Vec<u8>, SessionError> {
            let part = parts
                .next()
                .ok_or_else(|| SessionError::EncodingError("truncated token value".to_string()))?;
            BASE64
                .decode(part)
                .map_err(|e| SessionError::EncodingError(e.to_string()))
        };
        let iv = next()?;
        let auth_tag = next()?;
        let ciphertext = next()?;
        Ok(EncryptedData {
            ciphertext,
            iv,
            auth_tag,
        })
    }

    fn read_token(&self) -> Result<Option<String>, SessionError> {
        let raw = match self.store.get(StorageArea::Local, keys::TOKEN)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let sealed = Self::decode_sealed(&raw)?;
        let mut key = self.token_key()?;
        let opened = self.crypto.decrypt_aes256gcm(&sealed, &key);
        self.crypto.zeroize_memory(&mut key);
        let mut bytes = opened?;
        let token = String::from_utf8(bytes.clone())
            .map_err(|e| SessionError::EncodingError(e.to_string()));
        self.crypto.zeroize_memory(&mut bytes);
        token.map(Some)
    }
}

impl<S: KeyValueStore> SessionManagerTrait for SessionManager<S> {
    fn login(&self, response: &LoginResponse) -> Result<Session, SessionError> {
        let mut key = self.token_key()?;
        let sealed = self
            .crypto
            .encrypt_aes256gcm(response.access_token.as_bytes(), &key);
        self.crypto.zeroize_memory(&mut key);
        let sealed = sealed?;

        self.store
            .set(StorageArea::Local, keys::TOKEN, &Self::encode_sealed(&sealed))?;
        self.store
            .set(StorageArea::Local, keys::USER_NAME, &response.user_name)?;
        self.store
            .set(StorageArea::Local, keys::USER_EMAIL, &response.user_email)?;
        self.store
            .set(StorageArea::Local, keys::IS_LOGGED_IN, "true")?;
        debug!(user = %response.user_email, "session stored");

        Ok(Session {
            token: response.access_token.clone(),
            user_name: response.user_name.clone(),
            user_email: response.user_email.clone(),
        })
    }

    /// A token that no longer decrypts (salt lost, value edited) counts as
    /// logged out rather than as an error.
    fn current_session(&self) -> Result<Option<Session>, SessionError> {
        if !self.is_logged_in() {
            return Ok(None);
        }

        let token = match self.read_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(None),
            Err(SessionError::StorageError(e)) => return Err(SessionError::StorageError(e)),
            Err(e) => {
                warn!(error = %e, "stored token is unreadable; treating as logged out");
                return Ok(None);
            }
        };

        let user_name = self
            .store
            .get(StorageArea::Local, keys::USER_NAME)?
            .unwrap_or_default();
        let user_email = self
            .store
            .get(StorageArea::Local, keys::USER_EMAIL)?
            .unwrap_or_default();

        Ok(Some(Session {
            token,
            user_name,
            user_email,
        }))
    }

    fn is_logged_in(&self) -> bool {
        matches!(
            self.store.get(StorageArea::Local, keys::IS_LOGGED_IN),
            Ok(Some(ref v)) if v == "true"
        )
    }

    fn logout(&self) -> Result<(), SessionError> {
        for key in [
            keys::IS_LOGGED_IN,
            keys::USER_EMAIL,
            keys::USER_NAME,
            keys::TOKEN,
        ] {
            self.store.remove(StorageArea::Local, key)?;
        }
        Ok(())
    }

    fn remember_redirect(&self, url: &str) -> Result<(), SessionError> {
        self.store
            .set(StorageArea::Session, keys::REDIRECT_AFTER_LOGIN, url)?;
        Ok(())
    }

    fn take_redirect(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .store
            .take(StorageArea::Session, keys::REDIRECT_AFTER_LOGIN)?)
    }

    fn save_scroll_position(&self, offset: f64) -> Result<(), SessionError> {
        self.store
            .set(StorageArea::Session, keys::SCROLL_POSITION, &offset.to_string())?;
        Ok(())
    }

    fn take_scroll_position(&self) -> Result<Option<f64>, SessionError> {
        let raw = self.store.take(StorageArea::Session, keys::SCROLL_POSITION)?;
        Ok(raw.and_then(|v| v.parse::<f64>().ok()))
    }

    fn stash_booking(&self, package: &Package) -> Result<(), SessionError> {
        let json = serde_json::to_string(package)
            .map_err(|e| SessionError::SerializationError(e.to_string()))?;
        self.store
            .set(StorageArea::Session, keys::BOOKING_PACKAGE, &json)?;
        Ok(())
    }

    fn take_booking(&self) -> Result<Option<Package>, SessionError> {
        match self.store.take(StorageArea::Session, keys::BOOKING_PACKAGE)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| SessionError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }
}
