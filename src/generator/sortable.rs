//! Time-sortable identifier generator.

use super::{DefaultRng, RandSource};
use crate::bits::bytes_to_bits;
use crate::error::{Error, Result};
use crate::fixed_point::{from_fixed_point, to_fixed_point};
use crate::time::{MonotonicClock, TimeSource};
use crate::Id;
use bytes::Bytes;

#[cfg(feature = "tracing")]
use tracing::instrument;

const UNIXTS_SIZE: u32 = 36;
const MSEC_SIZE: u32 = 12;
const SEQ_SIZE: u32 = 12;
const RAND_SIZE: u32 = 62;
const MSEC_PRECISION: u32 = 3;
const VERSION: u128 = 0b0111;
const VARIANT: u128 = 0b10;

const TIMESTAMP_MASK: u64 = (1 << (UNIXTS_SIZE + MSEC_SIZE)) - 1;
const MAX_COUNTER: u16 = (1 << SEQ_SIZE) - 1;

/// Configuration of an [`IdSortable`] generator.
///
/// # Examples
///
/// ```rust
/// use sortable_id::generator::{Config, IdSortable};
///
/// let mut g = IdSortable::new();
/// let last = g.generate();
///
/// // e.g. after a process restart
/// let config = Config::default().last_id(&last)?.node_id(&b"node-1"[..]);
/// let mut g = IdSortable::with_config(config);
/// assert!(g.generate() > last);
/// # Ok::<(), sortable_id::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Config {
    last_id: Option<[u8; 16]>,
    node_id: Option<Bytes>,
}

impl Config {
    /// Continues after `id`, the last identifier issued by a previous generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `id` is 16 bytes long.
    pub fn last_id(mut self, id: &Id) -> Result<Self> {
        self.last_id = Some(<[u8; 16]>::try_from(id)?);
        Ok(self)
    }

    /// Embeds the leading 62 bits of `node_id` at the head of the random field of every
    /// identifier.
    pub fn node_id(mut self, node_id: impl Into<Bytes>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}

/// Represents a generator of sortable identifiers based on UUIDv7 with millisecond resolution.
///
/// Each identifier packs a 36-bit Unix timestamp in seconds, a 12-bit fixed-point fraction of a
/// second, a 12-bit sequence counter and a 62-bit random (or node-prefixed) field, so the raw
/// bytes of identifiers from one generator compare in generation order. 36 bits of seconds last
/// until the year 4147. The counter allows 4096 identifiers per millisecond; beyond that it
/// wraps around and the order within that millisecond is lost.
///
/// The generator is not shareable on its own: `generate` takes `&mut self`. The following
/// example guarantees the process-wide monotonicity using a mutex.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use sortable_id::generator::IdSortable;
///
/// let g = sync::Arc::new(sync::Mutex::new(IdSortable::new()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 let id = g.lock().unwrap().generate();
///                 println!("{} by thread {}", id.to_uuid().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct IdSortable<R = DefaultRng, T = MonotonicClock> {
    timestamp: Option<u64>,
    counter: u16,
    node: Option<(u64, u32)>,
    last_id: Option<Id>,

    /// The random number generator used by the generator.
    rng: R,

    /// The clock used by the generator.
    clock: T,
}

impl IdSortable {
    /// Creates a generator with the default random number generator and clock.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a generator from `config` with the default random number generator and clock.
    pub fn with_config(config: Config) -> Self {
        Self::with_rand_and_time_sources(config, DefaultRng::default(), MonotonicClock::new)
    }
}

impl Default for IdSortable {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandSource, T: TimeSource> IdSortable<R, T> {
    /// Creates a generator with a random number generator and a clock factory.
    ///
    /// `time_source` receives the timestamp in milliseconds of the configured last identifier, if
    /// any, and returns the clock to use.
    ///
    /// A configured last identifier also hands its timestamp and sequence over to the new
    /// generator, so its first identifier sorts after the last one even if the clock still reads
    /// the same millisecond.
    pub fn with_rand_and_time_sources(
        config: Config,
        rng: R,
        time_source: impl FnOnce(Option<f64>) -> T,
    ) -> Self {
        let (timestamp, counter, seed) = match config.last_id {
            Some(last) => {
                let fields = Fields::from(last);
                // whole milliseconds; the fixed-point inverse is only exact up to its precision
                let seed = (fields.unix_ts() * 10f64.powi(MSEC_PRECISION as i32)).round();
                #[cfg(feature = "tracing")]
                tracing::debug!(seed, seq = fields.seq, "continuing after last id");
                (Some(fields.timestamp), fields.seq, Some(seed))
            }
            None => (None, 0, None),
        };
        let node = config
            .node_id
            .as_deref()
            .filter(|node_id| !node_id.is_empty())
            .map(node_prefix);
        Self {
            timestamp,
            counter,
            node,
            last_id: None,
            rng,
            clock: time_source(seed),
        }
    }

    /// Returns the identifier generated last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotGenerated`] if this generator has not generated any identifier yet.
    pub fn last_id(&self) -> Result<&Id> {
        self.last_id.as_ref().ok_or(Error::NotGenerated)
    }

    /// Generates a new sortable identifier.
    ///
    /// A later millisecond resets the sequence counter to zero, while the same millisecond
    /// increments it. If the clock reads earlier than the previous identifier, the previous
    /// timestamp is reused with an incremented counter.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&mut self) -> Id {
        let seconds = self.clock.unix_ts_ms() / 10f64.powi(MSEC_PRECISION as i32);
        let (unixts, msec) = to_fixed_point(seconds, MSEC_SIZE, Some(MSEC_PRECISION));
        let timestamp = ((unixts << MSEC_SIZE) | msec) & TIMESTAMP_MASK;

        let timestamp = match self.timestamp {
            Some(prev) if timestamp <= prev => {
                self.counter = (self.counter + 1) & MAX_COUNTER;
                #[cfg(feature = "tracing")]
                if self.counter == 0 {
                    tracing::warn!(timestamp = prev, "sequence counter rolled over");
                }
                prev
            }
            _ => {
                self.counter = 0;
                timestamp
            }
        };
        self.timestamp = Some(timestamp);

        let fields = Fields {
            timestamp,
            seq: self.counter,
            rand: self.rand_field(),
        };
        let id = Id::from(fields.to_bytes());
        self.last_id = Some(id.clone());
        id
    }

    /// Fills the 62-bit random field, node prefix first.
    fn rand_field(&mut self) -> u64 {
        let (prefix, prefix_len) = self.node.unwrap_or((0, 0));
        let rand_len = RAND_SIZE - prefix_len;
        let mut buffer = [0u8; 8];
        let n_bytes = rand_len.div_ceil(8) as usize;
        if n_bytes > 0 {
            self.rng.fill_bytes(&mut buffer[..n_bytes]);
        }
        let random = u64::from_be_bytes(buffer)
            .checked_shr(u64::BITS - rand_len)
            .unwrap_or(0);
        (prefix << rand_len) | random
    }
}

/// Supports operations as an infinite iterator that produces a new identifier for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use sortable_id::generator::IdSortable;
///
/// let ids: Vec<_> = IdSortable::new().take(4).collect();
/// assert!(ids.windows(2).all(|w| w[0] < w[1]));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for IdSortable<R, T> {
    type Item = Id;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for IdSortable<R, T> {}

/// Returns the node prefix of the random field as `(bits, bit length)`.
fn node_prefix(node_id: &[u8]) -> (u64, u32) {
    let head = &node_id[..node_id.len().min(8)];
    let head_len = head.len() as u32 * 8;
    let len = head_len.min(RAND_SIZE);
    let value = head.iter().fold(0u64, |acc, &e| (acc << 8) | e as u64);
    (value >> (head_len - len), len)
}

/// Decoded fields of a sortable identifier.
struct Fields {
    /// Seconds and fixed-point milliseconds combined into 48 bits.
    timestamp: u64,
    seq: u16,
    rand: u64,
}

impl Fields {
    fn to_bytes(&self) -> [u8; 16] {
        let value = (self.timestamp as u128) << 80
            | VERSION << 76
            | (self.seq as u128) << 64
            | VARIANT << 62
            | self.rand as u128;
        value.to_be_bytes()
    }

    fn unix_ts(&self) -> f64 {
        let unixts = self.timestamp >> MSEC_SIZE;
        let msec = self.timestamp & ((1 << MSEC_SIZE) - 1);
        from_fixed_point((unixts, msec), MSEC_SIZE, Some(MSEC_PRECISION))
    }
}

impl From<[u8; 16]> for Fields {
    fn from(bytes: [u8; 16]) -> Self {
        let value = u128::from_be_bytes(bytes);
        Self {
            timestamp: (value >> 80) as u64,
            seq: (value >> 64) as u16 & MAX_COUNTER,
            rand: value as u64 & ((1 << RAND_SIZE) - 1),
        }
    }
}

fn fields(id: &[u8]) -> Result<Fields> {
    Error::check_len(id, 16)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(id);
    Ok(Fields::from(bytes))
}

/// Extracts the timestamp of a sortable identifier as Unix seconds with millisecond precision.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] unless `id` is 16 bytes long.
pub fn extract_ts(id: &[u8]) -> Result<f64> {
    Ok(fields(id)?.unix_ts())
}

/// Extracts the sequence counter of a sortable identifier.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] unless `id` is 16 bytes long.
pub fn extract_seq(id: &[u8]) -> Result<u16> {
    Ok(fields(id)?.seq)
}

/// Extracts the 62-bit random field of a sortable identifier as a bit string.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] unless `id` is 16 bytes long.
pub fn extract_rand(id: &[u8]) -> Result<String> {
    Error::check_len(id, 16)?;
    let mut bits = bytes_to_bits(&id[8..]);
    bits.drain(..2);
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::{extract_rand, extract_seq, extract_ts, Config, IdSortable};
    use crate::generator::tests::{frozen_clock, mock_rand_source, stepping_clock, wall_ms};
    use crate::generator::DefaultRng;
    use crate::{bits, multibase::Format, Error, Id};

    const N_SAMPLES: usize = 100_000;

    // a fast machine can outrun the 12-bit counter within one real millisecond
    thread_local!(static SAMPLES: Vec<Id> = IdSortable::with_rand_and_time_sources(
        Config::default(),
        DefaultRng::default(),
        |_| stepping_clock(wall_ms(), 4_000),
    )
    .take(N_SAMPLES)
    .collect());

    /// Generates canonical UUID strings
    #[test]
    fn generates_canonical_uuid_strings() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(&e.to_uuid().unwrap()));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&Id> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates identifiers sortable by creation time
    #[test]
    fn generates_identifiers_sortable_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes UUID text and base32hex sortable by creation time
    #[test]
    fn encodes_uuid_text_and_base32hex_sortable_by_creation_time() {
        SAMPLES.with(|samples| {
            let uuids: Vec<String> = samples.iter().map(|e| e.to_uuid().unwrap()).collect();
            let b32hs: Vec<String> = samples
                .iter()
                .map(|e| e.to_multibase(Format::Base32Hex))
                .collect();
            for i in 1..N_SAMPLES {
                assert!(uuids[i - 1] < uuids[i]);
                assert!(b32hs[i - 1] < b32hs[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        let mut g = IdSortable::new();
        for _ in 0..10_000 {
            let ts_now = wall_ms();
            let ts = extract_ts(g.generate().as_bytes()).unwrap() * 1000.0;
            assert!((ts_now - ts).abs() < 64.0);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                for (bin, c) in bins.iter_mut().zip(bits::bytes_to_bits(e.as_bytes()).chars()) {
                    *bin += (c == '1') as u32;
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, &bin) in bins.iter().enumerate().skip(66) {
            let p = bin as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Increments sequence within the same timestamp
    #[test]
    fn increments_sequence_within_the_same_timestamp() {
        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |_| frozen_clock(0.0),
        );
        let ids: Vec<Id> = g.by_ref().take(3).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        for (i, e) in ids.iter().enumerate() {
            assert_eq!(extract_ts(e.as_bytes()).unwrap(), 0.0);
            assert_eq!(extract_seq(e.as_bytes()).unwrap(), i as u16);
        }

        let mut shuffled = ids.clone();
        shuffled.reverse();
        shuffled.sort();
        assert_eq!(shuffled, ids);
    }

    /// Keeps generation order with a frozen clock until the counter wraps
    #[test]
    fn keeps_generation_order_with_a_frozen_clock_until_the_counter_wraps() {
        use rand::seq::SliceRandom;

        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |_| frozen_clock(1_633_860_855_102.0),
        );
        let ids: Vec<Id> = g.by_ref().take(4096).collect();
        let mut shuffled = ids.clone();
        shuffled.shuffle(&mut rand::thread_rng());
        shuffled.sort();
        assert_eq!(shuffled, ids);
        assert_eq!(extract_ts(ids[4095].as_bytes()).unwrap(), 1_633_860_855.102);
        assert_eq!(extract_seq(ids[4095].as_bytes()).unwrap(), 4095);

        // rollover is a degradation, not an error
        let wrapped = g.generate();
        assert_eq!(extract_seq(wrapped.as_bytes()).unwrap(), 0);
        assert!(wrapped < ids[4095]);
    }

    /// Keeps generation order over repeated batches within single milliseconds
    #[test]
    fn keeps_generation_order_over_repeated_batches_within_single_milliseconds() {
        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |_| stepping_clock(1_633_860_855_000.0, 4_000),
        );
        let mut prev = g.generate();
        for _ in 1..N_SAMPLES {
            let curr = g.generate();
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Keeps generation order across real delays
    #[test]
    fn keeps_generation_order_across_real_delays() {
        use std::{thread, time::Duration};

        let mut g = IdSortable::new();
        let mut prev = g.generate();
        for i in 0..64 {
            thread::sleep(Duration::from_micros(100 * (i % 16)));
            let curr = g.generate();
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Generates increasing identifiers even with decreasing or constant timestamp
    #[test]
    fn generates_increasing_identifiers_even_with_decreasing_or_constant_timestamp() {
        let ts = 1_633_860_855_102.0;
        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |_| {
                let mut i = 0.0;
                move || {
                    i += 1.0;
                    ts - f64::min(i, 2_000.0)
                }
            },
        );
        let mut prev = g.generate();
        for _ in 0..4_000 {
            let curr = g.generate();
            assert!(prev < curr);
            prev = curr;
        }
        assert_eq!(extract_ts(prev.as_bytes()).unwrap(), 1_633_860_855.101);
    }

    /// Keeps monotonic order over process restarts
    #[test]
    fn keeps_monotonic_order_over_process_restarts() {
        // 100 seconds in the future
        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |_| || wall_ms() + 100_000.0,
        );
        let last_id = g.generate();
        assert_eq!(extract_seq(last_id.as_bytes()).unwrap(), 0);

        let config = Config::default().last_id(&last_id).unwrap();
        let mut g = IdSortable::with_config(config);
        let curr_id = g.generate();
        assert_ne!(last_id, curr_id);
        assert!(last_id < curr_id);

        let mut ids = vec![curr_id.clone(), last_id.clone()];
        ids.sort();
        assert_eq!(ids, [last_id, curr_id]);
    }

    /// Passes the last timestamp to the clock factory
    #[test]
    fn passes_the_last_timestamp_to_the_clock_factory() {
        let last_id = IdSortable::with_rand_and_time_sources(
            Config::default(),
            mock_rand_source(),
            |seed| {
                assert_eq!(seed, None);
                frozen_clock(1_633_860_855_102.0)
            },
        )
        .generate();

        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default().last_id(&last_id).unwrap(),
            mock_rand_source(),
            |seed| {
                assert_eq!(seed, Some(1_633_860_855_102.0));
                frozen_clock(seed.unwrap())
            },
        );
        let curr_id = g.generate();
        assert!(last_id < curr_id);
        assert_eq!(extract_seq(curr_id.as_bytes()).unwrap(), 1);
    }

    /// Embeds the node id from the most significant bit of the random field
    #[test]
    fn embeds_the_node_id_from_the_most_significant_bit_of_the_random_field() {
        let node_id = b"abcd";
        let mut g = IdSortable::with_config(Config::default().node_id(&node_id[..]));
        let ids: Vec<Id> = g.by_ref().take(3).collect();
        assert!(ids[0] < ids[1] && ids[1] < ids[2]);
        for e in &ids {
            let rand_bits = extract_rand(e.as_bytes()).unwrap();
            assert_eq!(rand_bits.len(), 62);
            let rand_bytes = bits::bits_to_bytes(&rand_bits).unwrap();
            assert_eq!(&rand_bytes[..4], node_id);
        }
    }

    /// Truncates node ids longer than the random field
    #[test]
    fn truncates_node_ids_longer_than_the_random_field() {
        let mut g = IdSortable::with_rand_and_time_sources(
            Config::default().node_id(vec![0xff; 12]),
            |_: &mut [u8]| panic!("no random bits are needed"),
            |_| frozen_clock(0.0),
        );
        let e = g.generate();
        assert_eq!(extract_rand(e.as_bytes()).unwrap(), "1".repeat(62));
    }

    /// Returns error if no identifier has been generated
    #[test]
    fn returns_error_if_no_identifier_has_been_generated() {
        let mut g = IdSortable::new();
        assert_eq!(g.last_id(), Err(Error::NotGenerated));
        let e = g.generate();
        assert_eq!(g.last_id(), Ok(&e));
    }

    /// Rejects identifiers that are not 16 bytes
    #[test]
    fn rejects_identifiers_that_are_not_16_bytes() {
        let short = Id::from(vec![0u8; 15]);
        assert!(extract_ts(short.as_bytes()).is_err());
        assert!(extract_seq(short.as_bytes()).is_err());
        assert!(extract_rand(short.as_bytes()).is_err());
        assert_eq!(
            Config::default().last_id(&short),
            Err(Error::InvalidLength {
                expected: 16,
                actual: 15
            })
        );
    }

    /// Decodes identifiers from any generator
    #[test]
    fn decodes_identifiers_from_any_generator() {
        let e = Id::from_hex("01858a9e0e5c73edbde194f017ebdb3b").unwrap();
        assert_eq!(extract_seq(e.as_bytes()).unwrap(), 0x3ed);
        assert_eq!(
            extract_rand(e.as_bytes()).unwrap(),
            &bits::bytes_to_bits(&e.as_bytes()[8..])[2..]
        );
        let ts = extract_ts(e.as_bytes()).unwrap();
        assert_eq!(ts, crate::fixed_point::round_precise(ts, 3));
    }
}
