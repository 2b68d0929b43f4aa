//! Random, namespaced and time-sortable identifiers
//!
//! ```rust
//! use sortable_id::IdSortable;
//!
//! let mut g = IdSortable::new();
//! let id = g.generate();
//! println!("{}", id.to_uuid()?); // e.g. "0185e1b3-e2ef-7000-a8d2-5f83cd0c9a77"
//! println!("{:?}", id.as_bytes()); // as 16-byte big-endian sequence
//! # Ok::<(), sortable_id::Error>(())
//! ```
//!
//! # Field and bit layout
//!
//! [`IdSortable`] produces identifiers with the following bit layout, a variant of the UUIDv7
//! layout that keeps whole seconds and a fraction of a second in separate fields:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            unixts                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |unixts |         msec          |  ver  |          seq          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                       rand / node                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          rand / node                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 36-bit `unixts` field holds the Unix timestamp in seconds.
//! - The 12-bit `msec` field holds the millisecond fraction of that second as a fixed-point
//!   number, `floor(ms / 1000 * 4096)`.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `seq` field is reset to zero whenever the timestamp advances and incremented
//!   for each identifier generated within the same millisecond.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 bits start with the configured node id, if any, and are filled with a
//!   cryptographically strong random number.
//!
//! The `seq` counter wraps around after 4096 identifiers within one millisecond, after which
//! the order within that millisecond is lost. If the clock moves backward, the generator keeps
//! the previous timestamp and goes on incrementing `seq`. Handing the last identifier of a
//! generator to its successor through [`Config::last_id`](generator::Config::last_id) keeps the
//! order across process restarts.
//!
//! # Other features
//!
//! Random (UUIDv4) and namespaced (UUIDv5) identifiers:
//!
//! ```rust
//! use sortable_id::{IdDeterministic, IdRandom};
//!
//! let random = IdRandom::new().generate();
//! let named = IdDeterministic::new("example.com").generate("alice");
//! assert_eq!(random.len(), 16);
//! assert_eq!(named, IdDeterministic::new("example.com").generate("alice"));
//! ```
//!
//! Textual and binary forms:
//!
//! ```rust
//! use sortable_id::{multibase::Format, Id};
//!
//! let id = Id::from_uuid("01858a9e-0e5c-73ed-bde1-94f017ebdb3b").unwrap();
//! assert_eq!(id.to_hex(), "01858a9e0e5c73edbde194f017ebdb3b");
//! let text = id.to_multibase(Format::Base32Hex);
//! assert_eq!(Id::from_multibase(&text), Some(id));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bits;
pub mod fixed_point;
pub mod generator;
pub mod multibase;
pub mod time;
pub mod uuid_str;

mod error;
pub use error::{Error, Result};

mod id;
pub use id::Id;

#[doc(inline)]
pub use generator::{IdDeterministic, IdRandom, IdSortable};
