use crate::error::{Error, Result};
use crate::multibase::{self, Format};
use crate::{bits, uuid_str};
use bytes::Bytes;

/// Represents an identifier, an immutable sequence of bytes.
///
/// Equality and hashing are byte-wise and the ordering is lexicographic over the raw bytes, so
/// identifiers produced by [`IdSortable`](crate::generator::IdSortable) sort in generation order.
/// Identifiers have no implicit string form; every textual representation is an explicit
/// conversion.
///
/// # Examples
///
/// ```rust
/// use sortable_id::Id;
///
/// let x = Id::from_hex("01858a9e0e5c73edbde194f017ebdb3b").unwrap();
/// assert_eq!(x.to_uuid()?, "01858a9e-0e5c-73ed-bde1-94f017ebdb3b");
/// assert_eq!(Id::from_uuid("01858a9e-0e5c-73ed-bde1-94f017ebdb3b"), Some(x));
/// # Ok::<(), sortable_id::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Id(Bytes);

impl Id {
    /// Returns a reference to the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the identifier has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying buffer without copying.
    pub fn to_buffer(&self) -> Bytes {
        self.0.clone()
    }

    /// Creates an identifier sharing `buffer` without copying.
    pub fn from_buffer(buffer: Bytes) -> Self {
        Self(buffer)
    }

    /// Returns the "binary string" form, one `char` (U+0000 to U+00FF) per byte.
    pub fn to_binary_string(&self) -> String {
        self.0.iter().map(|&e| e as char).collect()
    }

    /// Creates an identifier from the "binary string" form.
    ///
    /// Returns `None` if a character lies above U+00FF.
    pub fn from_binary_string(text: &str) -> Option<Self> {
        text.chars()
            .map(|c| u8::try_from(c).ok())
            .collect::<Option<Vec<u8>>>()
            .map(Self::from)
    }

    /// Returns the lowercase hexadecimal representation.
    pub fn to_hex(&self) -> String {
        bits::bytes_to_hex(&self.0)
    }

    /// Creates an identifier from a hexadecimal string, or returns `None` if it is malformed.
    pub fn from_hex(hex: &str) -> Option<Self> {
        bits::hex_to_bytes(hex).map(Self::from)
    }

    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless the identifier is 16 bytes long.
    pub fn to_uuid(&self) -> Result<String> {
        uuid_str::to_uuid(&self.0)
    }

    /// Creates an identifier from UUID text, or returns `None` if it is malformed.
    pub fn from_uuid(text: &str) -> Option<Self> {
        uuid_str::from_uuid(text).map(Self::from)
    }

    /// Returns the identifier as a [`uuid::Uuid`], or `None` unless it is 16 bytes long.
    pub fn to_uuid_value(&self) -> Option<uuid::Uuid> {
        uuid::Uuid::from_slice(&self.0).ok()
    }

    /// Returns the multibase text of the given format.
    ///
    /// Only the base16 and base32hex families preserve the sort order of identifiers.
    pub fn to_multibase(&self, format: Format) -> String {
        multibase::to_multibase(&self.0, format)
    }

    /// Creates an identifier from multibase text of any supported format, or returns `None` if
    /// the prefix is unknown or the body is malformed.
    pub fn from_multibase(text: &str) -> Option<Self> {
        multibase::from_multibase(text).map(Self::from)
    }
}

impl From<[u8; 16]> for Id {
    fn from(src: [u8; 16]) -> Self {
        Self(Bytes::copy_from_slice(&src))
    }
}

impl From<Vec<u8>> for Id {
    fn from(src: Vec<u8>) -> Self {
        Self(Bytes::from(src))
    }
}

impl From<Bytes> for Id {
    fn from(src: Bytes) -> Self {
        Self(src)
    }
}

impl From<Id> for Bytes {
    fn from(src: Id) -> Self {
        src.0
    }
}

impl TryFrom<&Id> for [u8; 16] {
    type Error = Error;

    fn try_from(src: &Id) -> Result<Self> {
        Error::check_len(&src.0, 16)?;
        let mut dst = [0u8; 16];
        dst.copy_from_slice(&src.0);
        Ok(dst)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

mod uuid_support {
    use super::Id;

    impl From<uuid::Uuid> for Id {
        fn from(src: uuid::Uuid) -> Self {
            Self::from(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::Id;
    use serde::{de, ser::SerializeStruct, Deserialize, Deserializer, Serializer};
    use std::fmt;

    const TYPE_TAG: &str = "Id";
    const FIELDS: &[&str] = &["type", "data"];

    impl Id {
        /// Returns the JSON object form `{"type": "Id", "data": [byte, ...]}`.
        pub fn to_json(&self) -> serde_json::Value {
            serde_json::json!({ "type": TYPE_TAG, "data": self.as_bytes() })
        }

        /// Creates an identifier from the JSON object form, or returns `None` if `value` has a
        /// different shape.
        pub fn from_json(value: &serde_json::Value) -> Option<Self> {
            Self::deserialize(value).ok()
        }
    }

    impl serde::Serialize for Id {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                let mut state = serializer.serialize_struct(TYPE_TAG, 2)?;
                state.serialize_field("type", TYPE_TAG)?;
                state.serialize_field("data", self.as_bytes())?;
                state.end()
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Id {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_struct(TYPE_TAG, FIELDS, VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl VisitorImpl {
        fn check_tag<E: de::Error>(tag: &str) -> Result<(), E> {
            if tag == TYPE_TAG {
                Ok(())
            } else {
                Err(de::Error::invalid_value(de::Unexpected::Str(tag), &TYPE_TAG))
            }
        }
    }

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Id;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an Id representation")
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Ok(Id::from(value.to_vec()))
        }

        fn visit_byte_buf<E: de::Error>(self, value: Vec<u8>) -> Result<Self::Value, E> {
            Ok(Id::from(value))
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let tag: String = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            Self::check_tag(&tag)?;
            let data: Vec<u8> = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(1, &self))?;
            Ok(Id::from(data))
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut tagged = false;
            let mut data: Option<Vec<u8>> = None;
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "type" => {
                        Self::check_tag(&map.next_value::<String>()?)?;
                        tagged = true;
                    }
                    "data" => data = Some(map.next_value()?),
                    _ => {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
            }
            if !tagged {
                return Err(de::Error::missing_field("type"));
            }
            let data = data.ok_or_else(|| de::Error::missing_field("data"))?;
            Ok(Id::from(data))
        }
    }

}
