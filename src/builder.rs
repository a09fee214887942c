use crate::clock::{SystemClock, TimeSource};
use crate::error::{ConfigError, Error};
use crate::snowflake::{Internals, MAX_DATACENTER_ID, MAX_WORKER_ID, SharedSnowflake, Snowflake};
use chrono::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a, C = SystemClock> {
    epoch: Option<DateTime<Utc>>,
    worker_id: Option<i64>,
    datacenter_id: Option<i64>,
    check_worker_id: Option<&'a dyn Fn(u8) -> bool>,
    check_datacenter_id: Option<&'a dyn Fn(u8) -> bool>,
    clock: C,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            epoch: None,
            worker_id: None,
            datacenter_id: None,
            check_worker_id: None,
            check_datacenter_id: None,
            clock: SystemClock,
        }
    }
}

impl<'a, C> Builder<'a, C> {
    /// Set the epoch the timestamp section counts from.
    /// Defaults to the Unix epoch.
    /// If the epoch is later than the current time, 'finalize' will fail.
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Set the worker ID.
    /// It must be within `0..=31`, otherwise 'finalize' will fail.
    pub fn worker_id(mut self, worker_id: i64) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Set the data center ID.
    /// It must be within `0..=31`, otherwise 'finalize' will fail.
    pub fn datacenter_id(mut self, datacenter_id: i64) -> Self {
        self.datacenter_id = Some(datacenter_id);
        self
    }

    /// Set up a function to check the worker ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_worker_id(mut self, check_worker_id: &'a dyn Fn(u8) -> bool) -> Self {
        self.check_worker_id = Some(check_worker_id);
        self
    }

    /// Set up a function to check the data center ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_datacenter_id(mut self, check_datacenter_id: &'a dyn Fn(u8) -> bool) -> Self {
        self.check_datacenter_id = Some(check_datacenter_id);
        self
    }

    /// Replace the clock the generator reads its timestamps from.
    pub fn clock<T: TimeSource>(self, clock: T) -> Builder<'a, T> {
        Builder {
            epoch: self.epoch,
            worker_id: self.worker_id,
            datacenter_id: self.datacenter_id,
            check_worker_id: self.check_worker_id,
            check_datacenter_id: self.check_datacenter_id,
            clock,
        }
    }
}

impl<'a, C: TimeSource> Builder<'a, C> {
    /// Finish building and create a Snowflake instance.
    /// Every failure is reported as [`Error::InvalidConfiguration`]; no
    /// generator exists unless this returns `Ok`.
    pub fn finalize(self) -> Result<Snowflake<C>, Error> {
        let worker_id = self.worker_id.ok_or(ConfigError::WorkerIdMissing)?;
        let worker_id = validate_id(worker_id, MAX_WORKER_ID).ok_or(
            ConfigError::WorkerIdOutOfRange {
                value: worker_id,
                max: MAX_WORKER_ID,
            },
        )?;
        if let Some(check_worker_id) = self.check_worker_id {
            if !check_worker_id(worker_id) {
                return Err(ConfigError::CheckWorkerIdFailed(worker_id).into());
            }
        }

        let datacenter_id = self.datacenter_id.ok_or(ConfigError::DatacenterIdMissing)?;
        let datacenter_id = validate_id(datacenter_id, MAX_DATACENTER_ID).ok_or(
            ConfigError::DatacenterIdOutOfRange {
                value: datacenter_id,
                max: MAX_DATACENTER_ID,
            },
        )?;
        if let Some(check_datacenter_id) = self.check_datacenter_id {
            if !check_datacenter_id(datacenter_id) {
                return Err(ConfigError::CheckDatacenterIdFailed(datacenter_id).into());
            }
        }

        let epoch = self.epoch.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let epoch_millis = u64::try_from(epoch.timestamp_millis())
            .map_err(|_| ConfigError::EpochBeforeUnixEpoch(epoch))?;
        if epoch_millis > self.clock.current_millis() {
            return Err(ConfigError::EpochAheadOfCurrentTime(epoch).into());
        }

        debug!(worker_id, datacenter_id, %epoch, "snowflake generator configured");

        let shared = Arc::new(SharedSnowflake {
            epoch,
            epoch_millis,
            worker_id,
            datacenter_id,
            clock: self.clock,
            internals: Mutex::new(Internals::default()),
        });
        Ok(Snowflake::new_inner(shared))
    }
}

/// Returns the id as a `u8` when it lies within `0..=max`.
fn validate_id(id: i64, max: u64) -> Option<u8> {
    u64::try_from(id)
        .ok()
        .filter(|id| *id <= max)
        .and_then(|id| u8::try_from(id).ok())
}
