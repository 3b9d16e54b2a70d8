use thiserror::Error;

/// Failures raised by the primitives layer.
///
/// Every primitive either returns output of its stated length or one of
/// these; there is no partial output and no panic on malformed input.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,

    #[error("invalid cipher key length: {0} bytes")]
    InvalidKeyLength(usize),

    #[error("ciphertext too short: {0} bytes")]
    ShortCiphertext(usize),

    #[error("system random source failed")]
    RandomSource,

    #[error("invalid generated password length: {0}")]
    InvalidLength(usize),

    #[error("invalid password alphabet")]
    InvalidAlphabet,
}
