//! HMAC-SHA-512 authentication tags

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::MAC_SIZE;

type HmacSha512 = Hmac<Sha512>;

/// Compute the HMAC-SHA-512 tag of `message` under `key`.
pub fn sign(key: &[u8], message: &[u8]) -> [u8; MAC_SIZE] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    let mut tag = [0u8; MAC_SIZE];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    tag
}

/// Verify a tag in constant time.
pub fn verify(key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}
