use serde::{Deserialize, Serialize};

/// Encrypted data container used by CryptoService.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncryptedData {
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
    pub auth_tag: Vec<u8>,
}
