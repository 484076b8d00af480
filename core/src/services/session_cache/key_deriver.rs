//! Password-based key derivation for envelope encryption

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use std::fmt;
use zeroize::Zeroizing;

use vsc_shared::config::{SessionCacheConfig, MIN_KDF_ITERATIONS};

/// Derived key length (AES-256)
pub const KEY_LEN: usize = 32;

/// Salt length generated for every encryption
pub const SALT_LEN: usize = 16;

/// Derives a single-use AES-256 key from (pepper, identifier, salt)
///
/// PBKDF2-HMAC-SHA512. The pepper and identifier together form the
/// low-entropy input; the per-envelope salt is stored next to the ciphertext
/// so decryption can re-derive the same key.
pub struct KeyDeriver {
    pepper: Zeroizing<Vec<u8>>,
    iterations: u32,
}

impl KeyDeriver {
    /// Create a deriver; iteration counts below `MIN_KDF_ITERATIONS` are raised to it
    pub fn new(pepper: &[u8], iterations: u32) -> Self {
        Self {
            pepper: Zeroizing::new(pepper.to_vec()),
            iterations: iterations.max(MIN_KDF_ITERATIONS),
        }
    }

    /// Create a deriver from the cache configuration
    pub fn from_config(config: &SessionCacheConfig) -> Self {
        Self::new(config.pepper.as_bytes(), config.effective_kdf_iterations())
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Fresh random salt from the OS generator
    pub fn generate_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        salt
    }

    /// Derive the key for `identifier` under `salt`
    pub fn derive_key(&self, identifier: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
        // length-prefix the pepper so (pepper, identifier) splits are unambiguous
        let mut material = Zeroizing::new(Vec::with_capacity(
            4 + self.pepper.len() + identifier.len(),
        ));
        material.extend_from_slice(&(self.pepper.len() as u32).to_be_bytes());
        material.extend_from_slice(&self.pepper);
        material.extend_from_slice(identifier.as_bytes());

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha512>(&material, salt, self.iterations, &mut key[..]);
        key
    }
}

impl fmt::Debug for KeyDeriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDeriver")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}
