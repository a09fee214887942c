use crate::builder::Builder;
use crate::clock::{SystemClock, TimeSource};
use crate::error::*;
use chrono::prelude::*;
use chrono::TimeDelta;
use parking_lot::Mutex;
use std::{fmt, hint, sync::Arc};
use tracing::{trace, warn};

/// bit length of time
pub const BIT_LEN_TIME: u64 = 41;
/// bit length of worker id
pub const BIT_LEN_WORKER_ID: u64 = 5;
/// bit length of the data center id
pub const BIT_LEN_DATACENTER_ID: u64 = 5;
/// bit length of sequence number
pub const BIT_LEN_SEQUENCE: u64 = 12;

/// largest timestamp that fits the time section
pub const MAX_TIME: u64 = (1 << BIT_LEN_TIME) - 1;
/// largest accepted worker id (31)
pub const MAX_WORKER_ID: u64 = (1 << BIT_LEN_WORKER_ID) - 1;
/// largest accepted data center id (31)
pub const MAX_DATACENTER_ID: u64 = (1 << BIT_LEN_DATACENTER_ID) - 1;
/// largest sequence number within one millisecond (4095)
pub const MAX_SEQUENCE: u64 = (1 << BIT_LEN_SEQUENCE) - 1;

pub(crate) const DATACENTER_ID_SHIFT: u64 = BIT_LEN_SEQUENCE;
pub(crate) const WORKER_ID_SHIFT: u64 = BIT_LEN_SEQUENCE + BIT_LEN_DATACENTER_ID;
pub(crate) const TIMESTAMP_SHIFT: u64 = BIT_LEN_SEQUENCE + BIT_LEN_DATACENTER_ID + BIT_LEN_WORKER_ID;

/// Mutable generation state, only touched under the lock.
#[derive(Debug, Default)]
pub(crate) struct Internals {
    pub(crate) last_timestamp: u64,
    pub(crate) sequence: u64,
}

/// SharedSnowflake is shared between clones of one Snowflake.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake<C> {
    pub(crate) epoch: DateTime<Utc>,
    pub(crate) epoch_millis: u64,
    pub(crate) worker_id: u8,
    pub(crate) datacenter_id: u8,
    pub(crate) clock: C,
    pub(crate) internals: Mutex<Internals>,
}

/// Snowflake is a 64-bit unique ID generator.
///
/// Every id is laid out, from the most significant bit down, as one reserved
/// zero bit, a 41-bit millisecond timestamp, a 5-bit worker id, a 5-bit data
/// center id and a 12-bit sequence.
///
/// It is thread-safe. Clones share the same state, so handing a clone to each
/// thread still yields unique ids.
pub struct Snowflake<C = SystemClock>(pub(crate) Arc<SharedSnowflake<C>>);

impl Snowflake {
    /// Create a new Snowflake for the given worker and data center, using the
    /// system clock and the Unix epoch.
    ///
    /// Both ids must be within `0..=31`, otherwise
    /// [`Error::InvalidConfiguration`] is returned.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self, Error> {
        Builder::new()
            .worker_id(worker_id)
            .datacenter_id(datacenter_id)
            .finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }
}

impl<C> Snowflake<C> {
    pub(crate) fn new_inner(shared: Arc<SharedSnowflake<C>>) -> Self {
        Self(shared)
    }

    pub fn worker_id(&self) -> u8 {
        self.0.worker_id
    }

    pub fn datacenter_id(&self) -> u8 {
        self.0.datacenter_id
    }

    /// The instant the timestamp section counts from.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.0.epoch
    }

    /// Break an id up into its parts.
    pub fn decompose(&self, id: u64) -> DecomposedSnowflake {
        decompose(id)
    }

    /// Returns the instant `id` was minted at, relative to this generator's
    /// epoch.
    pub fn datetime_of(&self, id: u64) -> Option<DateTime<Utc>> {
        decompose(id).datetime(self.0.epoch)
    }
}

impl<C: TimeSource> Snowflake<C> {
    /// Generate the next unique id.
    ///
    /// Up to 4096 ids are handed out per millisecond. Once the sequence is
    /// exhausted the call spins, holding the lock, until the clock reports a
    /// different millisecond.
    ///
    /// If the clock reports an earlier time than the previous call, that time
    /// is adopted and the sequence restarts at 0, so the returned id may be
    /// smaller than one issued before.
    pub fn next_id(&self) -> u64 {
        let mut internals = self.0.internals.lock();

        let current = self.elapsed_millis();
        if internals.last_timestamp == current {
            internals.sequence += 1;
            if internals.sequence > MAX_SEQUENCE {
                trace!(timestamp = current, "sequence exhausted, waiting for the next millisecond");
                internals.last_timestamp = self.til_next_millis(current);
                internals.sequence = 0;
            }
        } else {
            if current < internals.last_timestamp {
                warn!(
                    last_timestamp = internals.last_timestamp,
                    current,
                    "clock moved backwards, restarting from the earlier timestamp"
                );
            }
            internals.last_timestamp = current;
            internals.sequence = 0;
        }

        compose(
            internals.last_timestamp,
            u64::from(self.0.worker_id),
            u64::from(self.0.datacenter_id),
            internals.sequence,
        )
    }

    /// Milliseconds elapsed since the configured epoch.
    fn elapsed_millis(&self) -> u64 {
        self.0
            .clock
            .current_millis()
            .saturating_sub(self.0.epoch_millis)
    }

    /// Spin until the clock leaves `last_timestamp`.
    fn til_next_millis(&self, last_timestamp: u64) -> u64 {
        loop {
            let current = self.elapsed_millis();
            if current != last_timestamp {
                return current;
            }
            hint::spin_loop();
        }
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl<C> Clone for Snowflake<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C> fmt::Debug for Snowflake<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("worker_id", &self.0.worker_id)
            .field("datacenter_id", &self.0.datacenter_id)
            .field("epoch", &self.0.epoch)
            .finish_non_exhaustive()
    }
}

/// Pack the parts of an id into a single `u64`.
///
/// The worker id, data center id and sequence are masked to their bit
/// lengths. The timestamp is not: a value wider than 41 bits runs into the
/// reserved bit.
pub fn compose(timestamp: u64, worker_id: u64, datacenter_id: u64, sequence: u64) -> u64 {
    (timestamp << TIMESTAMP_SHIFT)
        | ((worker_id & MAX_WORKER_ID) << WORKER_ID_SHIFT)
        | ((datacenter_id & MAX_DATACENTER_ID) << DATACENTER_ID_SHIFT)
        | (sequence & MAX_SEQUENCE)
}

/// DecomposedSnowflake is the parts of a Snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedSnowflake {
    pub id: u64,
    pub msb: u64,
    pub time: u64,
    pub worker_id: u64,
    pub datacenter_id: u64,
    pub sequence: u64,
}

impl DecomposedSnowflake {
    /// Break a Snowflake ID up into its parts.
    pub fn decompose(id: u64) -> Self {
        Self {
            id,
            msb: id >> 63,
            time: (id >> TIMESTAMP_SHIFT) & MAX_TIME,
            worker_id: (id >> WORKER_ID_SHIFT) & MAX_WORKER_ID,
            datacenter_id: (id >> DATACENTER_ID_SHIFT) & MAX_DATACENTER_ID,
            sequence: id & MAX_SEQUENCE,
        }
    }

    /// Returns the instant this id was minted at, given the epoch its
    /// generator counted from.
    pub fn datetime(&self, epoch: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.time).ok()?;
        epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
    }
}

/// Break a Snowflake ID up into its parts.
pub fn decompose(id: u64) -> DecomposedSnowflake {
    DecomposedSnowflake::decompose(id)
}
