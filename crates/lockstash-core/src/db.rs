//! The on-disk database envelope
//!
//! Current format, version `GH01`:
//!
//! ```text
//! offset  size  field
//! 0       4     version ("GH01")
//! 4       32    salt
//! 36      32    B1 = AES-CFB(P, K[0..16])
//! 68      32    B2 = AES-CFB(P, K[16..32])
//! 100     32    B3 = AES-CFB(P, L[0..16])
//! 132     32    B4 = AES-CFB(P, L[16..32])
//! 164     64    MAC = HMAC-SHA-512(L, salt ‖ plaintext)
//! 228     ...   E   = AES-CFB(K, plaintext)
//! ```
//!
//! `P` is Argon2id(master password, salt). `K` encrypts the serialized
//! state, `L` keys the MAC; both are fresh random 32-byte keys on every
//! save, wrapped under `P` in 16-byte halves. Each wrapped block and `E`
//! itself carry their own random IV prefix.
//!
//! The MAC covers the plaintext, not the ciphertext. That is the historical
//! format; changing it would need a new version string, because existing
//! files could no longer be verified.
//!
//! The previous version `GH00` is read (and silently upgraded on the next
//! save) but never written.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use secrecy::SecretString;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zeroize::Zeroizing;

use lockstash_crypto::kdf::DerivedKey;
use lockstash_crypto::{cipher, kdf, mac, random, KEY_SIZE, MAC_SIZE, SALT_SIZE};

use crate::codec;
use crate::error::{DbError, DbResult};
use crate::model::State;

/// Version magic of databases written by this crate.
pub const DB_VERSION: &[u8] = b"GH01";

/// Previous version magic; still readable, upgraded on the next save.
pub const PREV_DB_VERSION: &[u8] = b"GH00";

/// Argon2id lane count pinned by the current format version.
pub const ARGON2_LANES: u32 = 4;

/// Size of one wrapped subkey half: 16-byte IV plus 16 encrypted bytes.
const WRAP_SIZE: usize = 32;

const VERSION_SIZE: usize = 4;
const HALF_KEY_SIZE: usize = KEY_SIZE / 2;

/// Smallest possible file: every fixed-size field present, empty payload.
pub const MIN_DB_LEN: u64 = (VERSION_SIZE + SALT_SIZE + 4 * WRAP_SIZE + MAC_SIZE) as u64;

/// Largest accepted file or payload, protecting the decoder from file bombs.
pub const MAX_DB_LEN: u64 = 64 * 1024 * 1024;

// GH00 carried an unused password-hash checksum (not all writers emitted
// it) and an ASCII-hex payload length in front of the payload.
const LEGACY_CHECKSUM_SIZE: usize = 64;
const LEGACY_LEN_SIZE: usize = 4;

/// Encrypt `state` under `password` and atomically replace the file at
/// `path`.
///
/// The output is staged in a sibling temporary file and renamed into place,
/// so a failed save leaves any existing database untouched.
pub fn write_database(path: &Path, password: &SecretString, state: &State) -> DbResult<()> {
    let plaintext = Zeroizing::new(codec::encode(state)?);

    let salt = random::salt()?;
    let k = random::subkey()?;
    let l = random::subkey()?;
    let p = kdf::derive_key(password, &salt, ARGON2_LANES)?;

    let b1 = cipher::encrypt(p.as_bytes(), &k[..HALF_KEY_SIZE])?;
    let b2 = cipher::encrypt(p.as_bytes(), &k[HALF_KEY_SIZE..])?;
    let b3 = cipher::encrypt(p.as_bytes(), &l[..HALF_KEY_SIZE])?;
    let b4 = cipher::encrypt(p.as_bytes(), &l[HALF_KEY_SIZE..])?;

    let encrypted = cipher::encrypt(&k[..], &plaintext)?;
    if encrypted.len() as u64 > MAX_DB_LEN {
        return Err(DbError::DatabaseTooLarge);
    }

    let tag = sign_salted(&l[..], &salt, &plaintext);

    debug!(
        groups = state.len(),
        payload = encrypted.len(),
        "writing database"
    );

    let mut file = NamedTempFile::new_in(parent_dir(path))?;
    for part in [
        DB_VERSION,
        salt.as_slice(),
        b1.as_slice(),
        b2.as_slice(),
        b3.as_slice(),
        b4.as_slice(),
        tag.as_slice(),
        encrypted.as_slice(),
    ] {
        file.write_all(part)?;
    }
    file.persist(path).map_err(|e| DbError::Io(e.error))?;
    Ok(())
}

/// Read and decrypt the database at `path` with the master `password`.
pub fn read_database(path: &Path, password: &SecretString) -> DbResult<State> {
    let data = read_bounded(path)?;

    let version = &data[..VERSION_SIZE];
    let lanes = if version == DB_VERSION {
        ARGON2_LANES
    } else if version == PREV_DB_VERSION {
        info!("previous database version detected; it will be upgraded on the next save");
        host_lanes()
    } else {
        return Err(DbError::UnsupportedVersion);
    };
    debug!(
        version = %String::from_utf8_lossy(version),
        lanes,
        size = data.len(),
        "reading database"
    );

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&data[VERSION_SIZE..VERSION_SIZE + SALT_SIZE]);

    let p = kdf::derive_key(password, &salt, lanes)?;
    let body = &data[VERSION_SIZE + SALT_SIZE..];

    let state = if version == DB_VERSION {
        read_current(&p, &salt, body)?
    } else {
        read_legacy(&p, &salt, body)?
    };

    let entries: usize = state.values().map(Vec::len).sum();
    debug!(groups = state.len(), entries, "database decoded");
    Ok(state)
}

/// Open the file and load it fully, enforcing both size bounds before any
/// key derivation work happens.
fn read_bounded(path: &Path) -> DbResult<Vec<u8>> {
    let mut file = fs::File::open(path)?;
    let len = file.metadata()?.len();
    if len < MIN_DB_LEN || len > MAX_DB_LEN {
        return Err(DbError::CorruptDatabase);
    }

    let mut data = Vec::with_capacity(len as usize);
    file.read_to_end(&mut data)?;
    if data.len() as u64 != len {
        return Err(DbError::CorruptDatabase);
    }
    Ok(data)
}

/// `body` is everything after the version and salt: `B1..B4 ‖ MAC ‖ E`.
fn read_current(p: &DerivedKey, salt: &[u8; SALT_SIZE], body: &[u8]) -> DbResult<State> {
    let (wraps, rest) = body.split_at(4 * WRAP_SIZE);
    let (tag, payload) = rest.split_at(MAC_SIZE);

    let (k, l) = unwrap_subkeys(p, wraps)?;
    decrypt_and_verify(&k, &l, salt, tag, payload)
}

/// `GH00` body: `[checksum] ‖ B1..B4 ‖ len(E) ‖ E ‖ MAC`.
///
/// Some legacy writers emitted a password-hash checksum before the key
/// blocks and some did not, so the reader probes both shapes. The checksum
/// itself is never inspected: the MAC decides, and acting on the checksum
/// would reveal whether the password or the payload was at fault.
fn read_legacy(p: &DerivedKey, salt: &[u8; SALT_SIZE], body: &[u8]) -> DbResult<State> {
    match read_legacy_at(p, salt, body, LEGACY_CHECKSUM_SIZE) {
        Ok(state) => Ok(state),
        Err(first) => match read_legacy_at(p, salt, body, 0) {
            Ok(state) => Ok(state),
            Err(second) => {
                if matches!(first, DbError::AuthenticationFailed) {
                    Err(DbError::AuthenticationFailed)
                } else {
                    Err(second)
                }
            }
        },
    }
}

fn read_legacy_at(
    p: &DerivedKey,
    salt: &[u8; SALT_SIZE],
    body: &[u8],
    checksum_len: usize,
) -> DbResult<State> {
    let rest = body.get(checksum_len..).ok_or(DbError::CorruptDatabase)?;
    if rest.len() < 4 * WRAP_SIZE + LEGACY_LEN_SIZE + MAC_SIZE {
        return Err(DbError::CorruptDatabase);
    }

    let (wraps, rest) = rest.split_at(4 * WRAP_SIZE);
    let (len_field, rest) = rest.split_at(LEGACY_LEN_SIZE);
    let payload_len = parse_legacy_len(len_field)?;
    if rest.len() != payload_len + MAC_SIZE {
        return Err(DbError::CorruptDatabase);
    }
    let (payload, tag) = rest.split_at(payload_len);

    let (k, l) = unwrap_subkeys(p, wraps)?;
    decrypt_and_verify(&k, &l, salt, tag, payload)
}

/// The legacy payload length: four ASCII hex digits, space-padded.
fn parse_legacy_len(field: &[u8]) -> DbResult<usize> {
    let text = std::str::from_utf8(field).map_err(|_| DbError::CorruptDatabase)?;
    usize::from_str_radix(text.trim(), 16).map_err(|_| DbError::CorruptDatabase)
}

/// Decrypt the four wrapped halves under `P` and reassemble `K` and `L`.
fn unwrap_subkeys(
    p: &DerivedKey,
    wraps: &[u8],
) -> DbResult<(Zeroizing<[u8; KEY_SIZE]>, Zeroizing<[u8; KEY_SIZE]>)> {
    let mut keys = Zeroizing::new([0u8; 2 * KEY_SIZE]);
    for i in 0..4 {
        let block = &wraps[i * WRAP_SIZE..(i + 1) * WRAP_SIZE];
        let half = Zeroizing::new(cipher::decrypt(p.as_bytes(), block)?);
        if half.len() != HALF_KEY_SIZE {
            return Err(DbError::CorruptDatabase);
        }
        keys[i * HALF_KEY_SIZE..(i + 1) * HALF_KEY_SIZE].copy_from_slice(&half);
    }

    let mut k = Zeroizing::new([0u8; KEY_SIZE]);
    let mut l = Zeroizing::new([0u8; KEY_SIZE]);
    k.copy_from_slice(&keys[..KEY_SIZE]);
    l.copy_from_slice(&keys[KEY_SIZE..]);
    Ok((k, l))
}

/// Decrypt the payload under `K`, then gate decoding on the MAC under `L`.
///
/// A MAC mismatch is reported as [`DbError::AuthenticationFailed`] whether
/// the password was wrong or the file was tampered with; the two cases are
/// indistinguishable on purpose.
fn decrypt_and_verify(
    k: &[u8; KEY_SIZE],
    l: &[u8; KEY_SIZE],
    salt: &[u8; SALT_SIZE],
    tag: &[u8],
    payload: &[u8],
) -> DbResult<State> {
    let plaintext = Zeroizing::new(cipher::decrypt(k, payload)?);

    let message = salted_message(salt, &plaintext);
    if !mac::verify(l, &message, tag) {
        return Err(DbError::AuthenticationFailed);
    }

    codec::decode(&plaintext)
}

fn sign_salted(key: &[u8], salt: &[u8], plaintext: &[u8]) -> [u8; MAC_SIZE] {
    mac::sign(key, &salted_message(salt, plaintext))
}

fn salted_message(salt: &[u8], plaintext: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut message = Zeroizing::new(Vec::with_capacity(salt.len() + plaintext.len()));
    message.extend_from_slice(salt);
    message.extend_from_slice(plaintext);
    message
}

fn host_lanes() -> u32 {
    std::thread::available_parallelism().map_or(1, |n| n.get() as u32)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
