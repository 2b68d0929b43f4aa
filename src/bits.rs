//! Conversions between byte sequences and hex or bit strings.
//!
//! Encoders always emit fixed-width, big-endian digits. Decoders partition the text into
//! per-byte chunks; a trailing short chunk is parsed as an unsigned integer, so `"1"` decodes to
//! `[0x01]` in either base.

use std::fmt::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encodes bytes as a lowercase hex string, two digits per byte.
///
/// # Examples
///
/// ```rust
/// use sortable_id::bits;
///
/// assert_eq!(bits::bytes_to_hex(&[0x01, 0x85, 0xff]), "0185ff");
/// ```
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for &e in bytes {
        hex.push(HEX_DIGITS[(e >> 4) as usize] as char);
        hex.push(HEX_DIGITS[(e & 15) as usize] as char);
    }
    hex
}

/// Decodes a hex string, returning `None` if it contains a non-hex character.
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    parse_chunks(hex, 2, 16)
}

/// Encodes bytes as a bit string, eight `'0'`/`'1'` characters per byte, most significant bit
/// first.
pub fn bytes_to_bits(bytes: &[u8]) -> String {
    let mut bits = String::with_capacity(bytes.len() * 8);
    for &e in bytes {
        // infallible for String
        let _ = write!(bits, "{e:08b}");
    }
    bits
}

/// Decodes a bit string, returning `None` if it contains a character other than `0` or `1`.
pub fn bits_to_bytes(bits: &str) -> Option<Vec<u8>> {
    parse_chunks(bits, 8, 2)
}

/// Encodes `value` into exactly `width` bits, wrapping modulo `2^width`.
///
/// The wraparound is relied upon by cyclic counters such as the sortable sequence field.
///
/// # Examples
///
/// ```rust
/// use sortable_id::bits;
///
/// assert_eq!(bits::dec_to_bits(255, 8), "11111111");
/// assert_eq!(bits::dec_to_bits(257, 8), "00000001");
/// ```
pub fn dec_to_bits(value: u64, width: u32) -> String {
    let value = if width < u64::BITS {
        value & ((1 << width) - 1)
    } else {
        value
    };
    format!("{value:0width$b}", width = width as usize)
}

/// Encodes `value` into exactly `width` lowercase hex digits, wrapping modulo `16^width`.
pub fn dec_to_hex(value: u64, width: u32) -> String {
    let value = if width < u64::BITS / 4 {
        value & ((1 << (width * 4)) - 1)
    } else {
        value
    };
    format!("{value:0width$x}", width = width as usize)
}

/// Splits `s` into chunks of `size` characters; the last chunk is shorter when `s` does not
/// divide evenly.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn str_chunks(s: &str, size: usize) -> Vec<&str> {
    assert!(size > 0, "chunk size must be positive");
    let mut chunks = Vec::with_capacity(s.len().div_ceil(size));
    let mut rest = s;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

fn parse_chunks(text: &str, size: usize, radix: u32) -> Option<Vec<u8>> {
    str_chunks(text, size)
        .into_iter()
        .map(|chunk| {
            // `from_str_radix` would accept a leading '+'
            if chunk.chars().all(|c| c.is_digit(radix)) {
                u8::from_str_radix(chunk, radix).ok()
            } else {
                None
            }
        })
        .collect()
}
