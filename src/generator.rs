//! Identifier generators and their random number source.

use rand::rngs::{adapter::ReseedingRng, OsRng};
use rand::SeedableRng;
use rand_chacha::ChaCha12Core;

mod deterministic;
mod random;
mod sortable;
pub mod with_rand08;

pub use deterministic::IdDeterministic;
pub use random::IdRandom;
pub use sortable::{extract_rand, extract_seq, extract_ts, Config, IdSortable};

/// A trait that defines the random byte interface of the generators.
///
/// Generators call [`fill_bytes`](RandSource::fill_bytes) once per identifier. Closures taking
/// `&mut [u8]` implement this trait, and any [`rand::RngCore`] can be plugged in through
/// [`with_rand08::Adapter`].
pub trait RandSource {
    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

impl<F: FnMut(&mut [u8])> RandSource for F {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self(dest)
    }
}

/// The cryptographically strong random number generator used by default.
///
/// This employs [`ChaCha12Core`] with a [`ReseedingRng`] wrapper fed from [`OsRng`] to emulate
/// the strategy used by [`rand::rngs::ThreadRng`], while remaining `Send` so that a generator can
/// be moved into a thread or a mutex.
#[derive(Debug)]
pub struct DefaultRng(ReseedingRng<ChaCha12Core, OsRng>);

impl Default for DefaultRng {
    /// Creates an instance seeded from the operating system.
    ///
    /// # Panics
    ///
    /// Panics if the operating system random source is unavailable.
    fn default() -> Self {
        Self(ReseedingRng::new(
            ChaCha12Core::from_entropy(),
            1024 * 64,
            OsRng,
        ))
    }
}

impl RandSource for DefaultRng {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::RngCore::fill_bytes(&mut self.0, dest)
    }
}
