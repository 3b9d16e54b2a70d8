//! OS CSPRNG access
//!
//! All random material comes straight from the operating system source;
//! there is no userspace generator to seed and no fallback when the source
//! fails.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::{KEY_SIZE, SALT_SIZE};

/// Fill `buf` with bytes from the OS CSPRNG.
pub fn fill(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| CryptoError::RandomSource)
}

/// Generate a fresh 32-byte KDF salt.
pub fn salt() -> Result<[u8; SALT_SIZE], CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    fill(&mut salt)?;
    Ok(salt)
}

/// Generate a fresh 32-byte subkey, zeroized on drop.
pub fn subkey() -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    fill(key.as_mut())?;
    Ok(key)
}
