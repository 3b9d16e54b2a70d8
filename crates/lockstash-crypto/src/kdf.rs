//! Key derivation: Argon2id master password → 32-byte file key

use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::{KEY_SIZE, SALT_SIZE};

/// Argon2id memory cost in KiB (64 MiB).
pub const MEMORY_COST_KIB: u32 = 64 * 1024;

/// Argon2id time cost (passes over memory).
pub const TIME_COST: u32 = 4;

/// A 256-bit key derived from the master password via Argon2id.
///
/// Zeroized on drop so the key does not linger in freed memory.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the password key from the master password and a 32-byte salt.
///
/// Memory and time cost are fixed constants; only the lane count varies,
/// because it is pinned by the database format version. Nothing about the
/// cost parameters is ever read from untrusted input.
pub fn derive_key(
    password: &SecretString,
    salt: &[u8; SALT_SIZE],
    lanes: u32,
) -> Result<DerivedKey, CryptoError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, lanes, Some(KEY_SIZE))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut bytes = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), salt, &mut bytes)
        .map_err(|_| CryptoError::KeyDerivation)?;

    Ok(DerivedKey { bytes })
}
