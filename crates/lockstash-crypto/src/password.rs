//! Random password generation
//!
//! Characters are sampled from a caller-supplied byte alphabet with
//! rejection sampling, so every alphabet entry is equally likely. A plain
//! `byte % len` would skew the distribution whenever the alphabet length
//! does not divide 256.
//!
//! Alphabet bytes are Latin-1 codepoints: printable ASCII (`0x20..=0x7E`)
//! and the extended Latin block (`0xA1..=0xFF`). Control characters are
//! never part of a preset.

use crate::error::CryptoError;
use crate::random;

/// Named alphabet presets, ordered from smallest to largest character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    /// ASCII letters only
    Weak,
    /// Letters and digits
    Alphanumeric,
    /// Letters, digits and printable ASCII symbols
    Normal,
    /// Normal plus extended Latin letters (À–ÿ)
    Strong,
    /// Strong plus extended Latin symbols (¡, £, ¿, ×, ÷, ...)
    Strongest,
}

/// Build the byte alphabet for a preset.
pub fn alphabet(strength: Strength) -> Vec<u8> {
    let mut chars: Vec<u8> = Vec::with_capacity(190);
    chars.extend(b'A'..=b'Z');
    chars.extend(b'a'..=b'z');
    if strength >= Strength::Alphanumeric {
        chars.extend(b'0'..=b'9');
    }
    if strength >= Strength::Normal {
        chars.extend(b'!'..=b'/');
        chars.extend(b':'..=b'@');
        chars.extend(b'['..=b'`');
        chars.extend(b'{'..=b'~');
    }
    if strength >= Strength::Strong {
        // extended Latin letters; 0xD7 and 0xF7 are the two symbols in the block
        chars.extend((0xC0..=0xFFu8).filter(|b| !matches!(b, 0xD7 | 0xF7)));
    }
    if strength >= Strength::Strongest {
        chars.extend(0xA1..=0xBFu8);
        chars.push(0xD7);
        chars.push(0xF7);
    }
    chars
}

/// The alphabet used when the caller does not pick one: the largest preset.
pub fn default_alphabet() -> Vec<u8> {
    alphabet(Strength::Strongest)
}

/// Generate a password of exactly `length` characters drawn uniformly from
/// `alphabet`.
///
/// The output is a valid UTF-8 string; each alphabet byte contributes its
/// Latin-1 codepoint.
pub fn generate(length: usize, alphabet: &[u8]) -> Result<String, CryptoError> {
    if length == 0 {
        return Err(CryptoError::InvalidLength(length));
    }
    validate_alphabet(alphabet)?;

    // Largest multiple of the alphabet size that fits in a byte draw;
    // anything at or above it is redrawn.
    let limit = 256 - (256 % alphabet.len());

    let mut password = String::with_capacity(length * 2);
    let mut remaining = length;
    let mut draw = [0u8; 1];
    while remaining > 0 {
        random::fill(&mut draw)?;
        let value = draw[0] as usize;
        if value < limit {
            password.push(char::from(alphabet[value % alphabet.len()]));
            remaining -= 1;
        }
    }
    Ok(password)
}

/// Generate a password from the default alphabet, retrying until it contains
/// at least one ASCII digit, one uppercase and one lowercase letter.
pub fn generate_default(length: usize) -> Result<String, CryptoError> {
    // three character classes cannot fit in fewer than three characters
    if length < 3 {
        return Err(CryptoError::InvalidLength(length));
    }
    let alphabet = default_alphabet();
    loop {
        let candidate = generate(length, &alphabet)?;
        if candidate.chars().any(|c| c.is_ascii_digit())
            && candidate.chars().any(|c| c.is_ascii_uppercase())
            && candidate.chars().any(|c| c.is_ascii_lowercase())
        {
            return Ok(candidate);
        }
    }
}

fn validate_alphabet(alphabet: &[u8]) -> Result<(), CryptoError> {
    if alphabet.is_empty() || alphabet.len() > 256 {
        return Err(CryptoError::InvalidAlphabet);
    }
    if !alphabet
        .iter()
        .all(|&b| matches!(b, 0x20..=0x7E | 0xA1..=0xFF))
    {
        return Err(CryptoError::InvalidAlphabet);
    }
    Ok(())
}
