//! Integration with `rand` (v0.8) crate.

use super::{Config, IdRandom, IdSortable, RandSource};
use crate::time::MonotonicClock;
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }
}

impl<T: RngCore> IdSortable<Adapter<T>, MonotonicClock> {
    /// Creates a sortable generator with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_id::generator::{Config, IdSortable};
    ///
    /// let mut g = IdSortable::with_rand08(Config::default(), rand::rngs::OsRng);
    /// println!("{}", g.generate().to_uuid()?);
    /// # Ok::<(), sortable_id::Error>(())
    /// ```
    pub fn with_rand08(config: Config, rng: T) -> Self {
        Self::with_rand_and_time_sources(config, Adapter(rng), MonotonicClock::new)
    }
}

impl<T: RngCore> IdRandom<Adapter<T>> {
    /// Creates a random generator with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    pub const fn with_rand08(rng: T) -> Self {
        Self::with_rand_source(Adapter(rng))
    }
}
