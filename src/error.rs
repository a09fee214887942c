// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The error type for this crate.
///
/// Only construction can fail; [`Snowflake::next_id`] is infallible.
///
/// [`Snowflake::next_id`]: crate::Snowflake::next_id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// The setting that made [`Builder::finalize`] reject the configuration.
///
/// [`Builder::finalize`]: crate::Builder::finalize
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker_id was not provided")]
    WorkerIdMissing,
    #[error("datacenter_id was not provided")]
    DatacenterIdMissing,
    #[error("worker_id {value} is outside the allowed range 0..={max}")]
    WorkerIdOutOfRange { value: i64, max: u64 },
    #[error("datacenter_id {value} is outside the allowed range 0..={max}")]
    DatacenterIdOutOfRange { value: i64, max: u64 },
    #[error("check_worker_id returned false for {0}")]
    CheckWorkerIdFailed(u8),
    #[error("check_datacenter_id returned false for {0}")]
    CheckDatacenterIdFailed(u8),
    #[error("epoch `{0}` is before the unix epoch")]
    EpochBeforeUnixEpoch(DateTime<Utc>),
    #[error("epoch `{0}` is ahead of current time")]
    EpochAheadOfCurrentTime(DateTime<Utc>),
}
