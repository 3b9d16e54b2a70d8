use lockstash_crypto::CryptoError;
use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Failures surfaced by the database engine.
///
/// This set is closed and stable; callers pattern-match on it. Note that a
/// wrong master password and a tampered file are deliberately the same
/// variant, so an attacker cannot tell which one they triggered.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported database version")]
    UnsupportedVersion,

    #[error("incorrect password or corrupt database")]
    AuthenticationFailed,

    #[error("corrupt database")]
    CorruptDatabase,

    #[error("database too large, refusing to save it")]
    DatabaseTooLarge,
}

// A primitive failure (bad key length, short ciphertext, KDF or RNG error)
// means the file cannot be interpreted; the taxonomy stays closed.
impl From<CryptoError> for DbError {
    fn from(_: CryptoError) -> Self {
        DbError::CorruptDatabase
    }
}
