use chrono::Utc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// [`Snowflake`] reads its clock through this trait so that a real system
/// clock can be swapped for a simulated one in tests.
///
/// # Example
///
/// ```
/// use snowflake_idgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
///
/// [`Snowflake`]: crate::Snowflake
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01T00:00:00Z.
    fn current_millis(&self) -> u64;
}

/// The default clock, backed by [`Utc::now`].
///
/// It follows the system clock, so NTP steps and manual adjustments are
/// visible to the generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    #[inline]
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}
