/// A specialized result type for fallible operations of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by identifier conversions and generators.
///
/// Decoding untrusted text never produces an `Error`; those functions return
/// `None` instead so that probing a string is ordinary control flow.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The byte length does not fit the requested layout, e.g. formatting a
    /// non-16-byte identifier as a UUID.
    #[error("expected {expected} bytes but got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// `last_id` was requested before the generator produced any identifier.
    #[error("no identifier has been generated yet")]
    NotGenerated,
}

impl Error {
    pub(crate) fn check_len(bytes: &[u8], expected: usize) -> Result<()> {
        if bytes.len() == expected {
            Ok(())
        } else {
            Err(Self::InvalidLength {
                expected,
                actual: bytes.len(),
            })
        }
    }
}
