//! Self-describing multibase text encodings.
//!
//! The first character of a multibase string names the alphabet of the remaining digits. Of the
//! supported formats only [`Format::Base16`] and [`Format::Base32Hex`] (and their uppercase
//! variants) preserve the byte order of fixed-length inputs, which matters for sortable
//! identifiers. The identity format is left out as it cannot carry arbitrary bytes in a `str`.

use ::multibase::Base;
use std::{collections::HashMap, sync::OnceLock};

/// Supported multibase formats.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Format {
    Base2,
    Base8,
    Base10,
    Base16,
    Base16Upper,
    Base32,
    Base32Upper,
    Base32Pad,
    Base32PadUpper,
    Base32Hex,
    Base32HexUpper,
    Base32HexPad,
    Base32HexPadUpper,
    Base32Z,
    Base36,
    Base36Upper,
    Base58Btc,
    Base58Flickr,
    Base64,
    Base64Pad,
    Base64Url,
    Base64UrlPad,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Self; 22] = [
        Self::Base2,
        Self::Base8,
        Self::Base10,
        Self::Base16,
        Self::Base16Upper,
        Self::Base32,
        Self::Base32Upper,
        Self::Base32Pad,
        Self::Base32PadUpper,
        Self::Base32Hex,
        Self::Base32HexUpper,
        Self::Base32HexPad,
        Self::Base32HexPadUpper,
        Self::Base32Z,
        Self::Base36,
        Self::Base36Upper,
        Self::Base58Btc,
        Self::Base58Flickr,
        Self::Base64,
        Self::Base64Pad,
        Self::Base64Url,
        Self::Base64UrlPad,
    ];

    /// Returns the prefix character that tags strings of this format.
    pub const fn prefix(self) -> char {
        match self {
            Self::Base2 => '0',
            Self::Base8 => '7',
            Self::Base10 => '9',
            Self::Base16 => 'f',
            Self::Base16Upper => 'F',
            Self::Base32 => 'b',
            Self::Base32Upper => 'B',
            Self::Base32Pad => 'c',
            Self::Base32PadUpper => 'C',
            Self::Base32Hex => 'v',
            Self::Base32HexUpper => 'V',
            Self::Base32HexPad => 't',
            Self::Base32HexPadUpper => 'T',
            Self::Base32Z => 'h',
            Self::Base36 => 'k',
            Self::Base36Upper => 'K',
            Self::Base58Btc => 'z',
            Self::Base58Flickr => 'Z',
            Self::Base64 => 'm',
            Self::Base64Pad => 'M',
            Self::Base64Url => 'u',
            Self::Base64UrlPad => 'U',
        }
    }

    /// Returns the format tagged by `prefix`, if supported.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        formats_by_prefix().get(&prefix).copied()
    }

    const fn base(self) -> Base {
        match self {
            Self::Base2 => Base::Base2,
            Self::Base8 => Base::Base8,
            Self::Base10 => Base::Base10,
            Self::Base16 => Base::Base16Lower,
            Self::Base16Upper => Base::Base16Upper,
            Self::Base32 => Base::Base32Lower,
            Self::Base32Upper => Base::Base32Upper,
            Self::Base32Pad => Base::Base32PadLower,
            Self::Base32PadUpper => Base::Base32PadUpper,
            Self::Base32Hex => Base::Base32HexLower,
            Self::Base32HexUpper => Base::Base32HexUpper,
            Self::Base32HexPad => Base::Base32HexPadLower,
            Self::Base32HexPadUpper => Base::Base32HexPadUpper,
            Self::Base32Z => Base::Base32Z,
            Self::Base36 => Base::Base36Lower,
            Self::Base36Upper => Base::Base36Upper,
            Self::Base58Btc => Base::Base58Btc,
            Self::Base58Flickr => Base::Base58Flickr,
            Self::Base64 => Base::Base64,
            Self::Base64Pad => Base::Base64Pad,
            Self::Base64Url => Base::Base64Url,
            Self::Base64UrlPad => Base::Base64UrlPad,
        }
    }
}

/// Returns the process-wide prefix table, building it on first use.
fn formats_by_prefix() -> &'static HashMap<char, Format> {
    static TABLE: OnceLock<HashMap<char, Format>> = OnceLock::new();
    TABLE.get_or_init(|| Format::ALL.iter().map(|&f| (f.prefix(), f)).collect())
}

/// Encodes bytes as a multibase string of the given format, prefix included.
///
/// # Examples
///
/// ```rust
/// use sortable_id::multibase::{to_multibase, Format};
///
/// let bytes = [123, 124, 125, 126, 127, 128, 129, 130, 123, 124, 125, 126, 127, 128, 129, 130];
/// assert_eq!(to_multibase(&bytes, Format::Base58Btc), "zGFRLUyEszBgw9bRXTeFvu7");
/// ```
pub fn to_multibase(bytes: &[u8], format: Format) -> String {
    ::multibase::encode(format.base(), bytes)
}

/// Decodes a multibase string, choosing the alphabet from its first character.
///
/// Returns `None` if the prefix is not a supported format or the body is malformed.
pub fn from_multibase(text: &str) -> Option<Vec<u8>> {
    let format = Format::from_prefix(text.chars().next()?)?;
    match ::multibase::decode(text) {
        Ok((base, bytes)) if base == format.base() => Some(bytes),
        _ => None,
    }
}
