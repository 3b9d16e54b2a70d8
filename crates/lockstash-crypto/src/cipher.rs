//! AES-CFB encryption with an IV prefix
//!
//! Wire format: `[16-byte random IV][CFB keystream-XORed message]`
//!
//! The AES variant is selected by key length (16/24/32 bytes), matching the
//! database format's historical cipher construction. The envelope always
//! passes 32-byte keys, so in practice this is AES-256-CFB.

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use cfb_mode::{Decryptor, Encryptor};

use crate::error::CryptoError;
use crate::random;
use crate::IV_SIZE;

/// Encrypt a message, prefixing a fresh random IV.
pub fn encrypt(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_key_len(key)?;

    let mut output = vec![0u8; IV_SIZE + message.len()];
    let (iv, body) = output.split_at_mut(IV_SIZE);
    random::fill(iv)?;
    body.copy_from_slice(message);

    match key.len() {
        16 => Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .encrypt(body),
        24 => Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .encrypt(body),
        _ => Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .encrypt(body),
    }
    Ok(output)
}

/// Decrypt a message produced by [`encrypt`].
///
/// The input must carry at least the IV prefix.
pub fn decrypt(key: &[u8], input: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_key_len(key)?;
    if input.len() < IV_SIZE {
        return Err(CryptoError::ShortCiphertext(input.len()));
    }

    let (iv, body) = input.split_at(IV_SIZE);
    let mut output = body.to_vec();

    match key.len() {
        16 => Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt(&mut output),
        24 => Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt(&mut output),
        _ => Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt(&mut output),
    }
    Ok(output)
}

fn check_key_len(key: &[u8]) -> Result<(), CryptoError> {
    match key.len() {
        16 | 24 | 32 => Ok(()),
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_aes256() {
        let key = [0x42u8; 32];
        let message = b"hello, encrypted world!";

        let ciphertext = encrypt(&key, message).unwrap();
        assert_eq!(ciphertext.len(), IV_SIZE + message.len());

        let plaintext = decrypt(&key, &ciphertext).unwrap();
        assert_eq!(plaintext, message);
    }

    #[test]
    fn roundtrip_aes128() {
        let key = [0x11u8; 16];
        let message = b"sixteen byte key";

        let ciphertext = encrypt(&key, message).unwrap();
        assert_eq!(decrypt(&key, &ciphertext).unwrap(), message);
    }

    #[test]
    fn roundtrip_empty_message() {
        let key = [0x42u8; 32];

        let ciphertext = encrypt(&key, b"").unwrap();
        assert_eq!(ciphertext.len(), IV_SIZE);
        assert_eq!(decrypt(&key, &ciphertext).unwrap(), b"");
    }

    #[test]
    fn fresh_iv_per_encryption() {
        let key = [0x42u8; 32];
        let message = b"same message";

        let c1 = encrypt(&key, message).unwrap();
        let c2 = encrypt(&key, message).unwrap();
        assert_ne!(c1, c2, "two encryptions must use distinct IVs");
    }

    #[test]
    fn wrong_key_does_not_roundtrip() {
        let ciphertext = encrypt(&[0x01u8; 32], b"secret data").unwrap();
        let garbled = decrypt(&[0x02u8; 32], &ciphertext).unwrap();
        assert_ne!(garbled, b"secret data");
    }

    #[test]
    fn rejects_short_ciphertext() {
        let result = decrypt(&[0u8; 32], &[0u8; 15]);
        assert!(matches!(result, Err(CryptoError::ShortCiphertext(15))));
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(matches!(
            encrypt(&[0u8; 20], b"x"),
            Err(CryptoError::InvalidKeyLength(20))
        ));
        assert!(matches!(
            decrypt(&[0u8; 0], &[0u8; 16]),
            Err(CryptoError::InvalidKeyLength(0))
        ));
    }
}
