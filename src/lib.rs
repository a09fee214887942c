//! A thread-safe 64-bit unique ID generator in the style of [Twitter's Snowflake].
//!
//! Each id packs, from the most significant bit down:
//!
//! ```text
//! 0 | 41 bits: milliseconds since epoch | 5 bits: worker id | 5 bits: datacenter id | 12 bits: sequence
//! ```
//!
//! The top bit is always zero, so ids stay positive when read as `i64`.
//! Up to 4096 ids are minted per millisecond per generator; uniqueness across
//! nodes relies on every node getting its own `(worker_id, datacenter_id)` pair.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! snowflake_idgen = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use snowflake_idgen::Snowflake;
//!
//! let sf = Snowflake::new(5, 3).unwrap();
//! let next_id = sf.next_id();
//! let parts = sf.decompose(next_id);
//! assert_eq!((parts.worker_id, parts.datacenter_id), (5, 3));
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread-safe. `clone` it before moving to another thread; the
//! clones share one lock and one sequence:
//! ```
//! use snowflake_idgen::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new(1, 1).unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Custom configuration
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use snowflake_idgen::{ConfigError, Error, Snowflake};
//!
//! let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let sf = Snowflake::builder()
//!     .worker_id(7)
//!     .datacenter_id(2)
//!     .epoch(epoch)
//!     .finalize()
//!     .unwrap();
//! assert!(sf.datetime_of(sf.next_id()).unwrap() >= epoch);
//!
//! assert!(matches!(
//!     Snowflake::new(32, 0),
//!     Err(Error::InvalidConfiguration(ConfigError::WorkerIdOutOfRange { value: 32, .. }))
//! ));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when a generator is built,
//! `trace` when a millisecond's sequence is exhausted and `warn` when the
//! clock is seen moving backwards.
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod error;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use error::*;
