//! Time abstraction traits for platform-agnostic timing.
//!
//! The animation engine never reads a global clock. Hosts implement these traits
//! over their own timer (embassy, fugit, `std::time`) and hand a [`TimeSource`]
//! to each [`Animation`](crate::Animation).

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations should saturate to zero if `earlier` is later than `self`.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Milliseconds elapsed between two instants as `f32`, the unit all progress math uses.
#[inline]
pub(crate) fn millis_between<I: TimeInstant>(earlier: I, later: I) -> f32 {
    later.duration_since(earlier).as_millis() as f32
}
