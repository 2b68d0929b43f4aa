//! Canonical 8-4-4-4-12 UUID text.

use crate::error::{Error, Result};

/// Formats a 16-byte buffer as the 8-4-4-4-12 canonical lowercase hexadecimal string.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] unless `bytes` is exactly 16 bytes long.
///
/// # Examples
///
/// ```rust
/// use sortable_id::{bits, uuid_str};
///
/// let bytes = bits::hex_to_bytes("01858a9e0e5c73edbde194f017ebdb3b").unwrap();
/// assert_eq!(
///     uuid_str::to_uuid(&bytes)?,
///     "01858a9e-0e5c-73ed-bde1-94f017ebdb3b"
/// );
/// # Ok::<(), sortable_id::Error>(())
/// ```
pub fn to_uuid(bytes: &[u8]) -> Result<String> {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    Error::check_len(bytes, 16)?;
    let mut text = String::with_capacity(36);
    for (i, &e) in bytes.iter().enumerate() {
        text.push(DIGITS[(e >> 4) as usize] as char);
        text.push(DIGITS[(e & 15) as usize] as char);
        if i == 3 || i == 5 || i == 7 || i == 9 {
            text.push('-');
        }
    }
    Ok(text)
}

/// Parses UUID text into 16 bytes.
///
/// Hyphens are stripped wherever they appear; the remainder must be exactly 32 hexadecimal
/// digits of either case. Anything else yields `None`.
pub fn from_uuid(text: &str) -> Option<[u8; 16]> {
    let mut dst = [0u8; 16];
    let mut iter = text.chars().filter(|&c| c != '-');
    for e in dst.iter_mut() {
        let hi = iter.next()?.to_digit(16)? as u8;
        let lo = iter.next()?.to_digit(16)? as u8;
        *e = (hi << 4) | lo;
    }
    match iter.next() {
        None => Some(dst),
        Some(_) => None,
    }
}
