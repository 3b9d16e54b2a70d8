//! lockstash-crypto: primitives for the lockstash database envelope
//!
//! Pipeline on save:
//! ```text
//! master password + salt ── Argon2id ──► P (32 bytes)
//!   P wraps K and L (random 32-byte subkeys, two AES-CFB halves each)
//!   K encrypts the serialized vault state
//!   L keys HMAC-SHA-512 over salt ‖ state
//! ```
//!
//! All randomness (salts, subkeys, IVs, generated passwords) comes from the
//! operating system CSPRNG. Key material is zeroized on drop.

pub mod cipher;
pub mod error;
pub mod kdf;
pub mod mac;
pub mod password;
pub mod random;

pub use cipher::{decrypt, encrypt};
pub use error::CryptoError;
pub use kdf::{derive_key, DerivedKey};
pub use mac::{sign, verify};

/// Size of a derived key or subkey in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of a KDF salt in bytes
pub const SALT_SIZE: usize = 32;

/// Size of an AES-CFB initialization vector
pub const IV_SIZE: usize = 16;

/// Size of an HMAC-SHA-512 tag
pub const MAC_SIZE: usize = 64;
