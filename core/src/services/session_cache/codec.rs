//! Session codec: VerifiedSession <-> StorageEnvelope using AES-256-GCM

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::domain::entities::{StorageEnvelope, VerifiedSession, SCHEMA_VERSION};
use crate::errors::{DomainError, DomainResult, SessionCacheError};

use super::key_deriver::{KeyDeriver, SALT_LEN};

/// AES-GCM nonce length
pub const IV_LEN: usize = 12;

/// Associated data bound into every tag
const ENVELOPE_AAD: &[u8] = b"verified-session:v1";

/// Encrypts sessions into envelopes and back
#[derive(Debug)]
pub struct SessionCodec {
    deriver: KeyDeriver,
}

impl SessionCodec {
    pub fn new(deriver: KeyDeriver) -> Self {
        Self { deriver }
    }

    /// Generate a random nonce for AES-GCM
    fn generate_iv() -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        iv
    }

    fn cipher_for(&self, identifier: &str, salt: &[u8]) -> Aes256Gcm {
        let key = self.deriver.derive_key(identifier, salt);
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]))
    }

    /// Encrypt `session` under a fresh key derived for `identifier`
    ///
    /// Every call draws a new salt and IV, so encrypting the same session
    /// twice yields unrelated envelopes.
    pub fn encrypt(&self, identifier: &str, session: &VerifiedSession) -> DomainResult<StorageEnvelope> {
        if !constant_time_eq(session.identifier.as_bytes(), identifier.as_bytes()) {
            return Err(DomainError::Validation {
                message: "Session identifier does not match the encryption identifier".to_string(),
            });
        }

        let salt = KeyDeriver::generate_salt();
        let iv = Self::generate_iv();
        let cipher = self.cipher_for(identifier, &salt);

        let plaintext = Zeroizing::new(serde_json::to_vec(session).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to serialize session: {}", e),
            }
        })?);

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: &plaintext,
                    aad: ENVELOPE_AAD,
                },
            )
            .map_err(|e| DomainError::Internal {
                message: format!("Encryption failed: {}", e),
            })?;

        Ok(StorageEnvelope {
            schema_version: SCHEMA_VERSION,
            ciphertext: BASE64.encode(ciphertext),
            iv: BASE64.encode(iv),
            salt: BASE64.encode(salt),
            expires_at: session.expires_at,
        })
    }

    /// Authenticate and decrypt `envelope` for `identifier`
    ///
    /// Unknown schema, failed authentication, an undecodable payload, a
    /// payload for a different identifier and a payload whose expiry differs
    /// from the plaintext mirror all produce the same `DecryptionFailure`.
    /// Undecodable base64 or wrong-sized salt/IV are `MalformedRecord`.
    pub fn decrypt(
        &self,
        identifier: &str,
        envelope: &StorageEnvelope,
    ) -> Result<VerifiedSession, SessionCacheError> {
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(SessionCacheError::DecryptionFailure);
        }

        let salt = decode_field(&envelope.salt)?;
        let iv = decode_field(&envelope.iv)?;
        let ciphertext = decode_field(&envelope.ciphertext)?;
        if salt.len() < SALT_LEN || iv.len() != IV_LEN {
            return Err(SessionCacheError::MalformedRecord);
        }

        let cipher = self.cipher_for(identifier, &salt);
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&iv),
                    Payload {
                        msg: &ciphertext,
                        aad: ENVELOPE_AAD,
                    },
                )
                .map_err(|_| SessionCacheError::DecryptionFailure)?,
        );

        let session: VerifiedSession =
            serde_json::from_slice(&plaintext).map_err(|_| SessionCacheError::DecryptionFailure)?;

        let consistent = session.schema_version == SCHEMA_VERSION
            && constant_time_eq(session.identifier.as_bytes(), identifier.as_bytes())
            && session.expires_at == envelope.expires_at
            && session.has_valid_window();
        if !consistent {
            return Err(SessionCacheError::DecryptionFailure);
        }

        Ok(session)
    }
}

fn decode_field(value: &str) -> Result<Vec<u8>, SessionCacheError> {
    BASE64
        .decode(value)
        .map_err(|_| SessionCacheError::MalformedRecord)
}
