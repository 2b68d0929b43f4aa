//! Random identifier generator.

use super::{DefaultRng, RandSource};
use crate::Id;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Represents a generator of random identifiers based on UUIDv4.
///
/// # Examples
///
/// ```rust
/// use sortable_id::generator::IdRandom;
///
/// let mut g = IdRandom::new();
/// let id = g.generate();
/// println!("{}", id.to_uuid()?); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), sortable_id::Error>(())
/// ```
#[derive(Debug)]
pub struct IdRandom<R = DefaultRng> {
    rng: R,
}

impl IdRandom {
    /// Creates a generator with the default random number generator.
    pub fn new() -> Self {
        Self::with_rand_source(DefaultRng::default())
    }
}

impl Default for IdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandSource> IdRandom<R> {
    /// Creates a generator with a random number generator.
    pub const fn with_rand_source(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a new UUIDv4 identifier.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&mut self) -> Id {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Id::from(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
impl<R: RandSource> Iterator for IdRandom<R> {
    type Item = Id;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource> std::iter::FusedIterator for IdRandom<R> {}
