//! Time abstraction traits for platform-agnostic timing.
//!
//! The scheduler never reads a clock on its own. Hosts pass instants in from a
//! [`TimeSource`], so the same timers run against a hardware counter, a
//! `std::time::Instant`, or a hand-driven clock in tests.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant. Must be non-decreasing.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
///
/// Resolution is one microsecond; implementations with coarser ticks round.
pub trait TimeDuration: Copy + PartialEq + PartialOrd {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to microseconds.
    fn as_micros(&self) -> u64;

    /// Creates duration from microseconds.
    fn from_micros(micros: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;

    /// Creates duration from milliseconds.
    #[inline]
    fn from_millis(millis: u64) -> Self {
        Self::from_micros(millis.saturating_mul(1_000))
    }

    /// Converts duration to milliseconds, truncating.
    #[inline]
    fn as_millis(&self) -> u64 {
        self.as_micros() / 1_000
    }
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;

    /// Subtracts duration from instant, returns None on underflow.
    fn checked_sub(self, duration: Self::Duration) -> Option<Self>;
}

impl TimeDuration for core::time::Duration {
    const ZERO: Self = core::time::Duration::ZERO;

    fn as_micros(&self) -> u64 {
        // u128 micros only overflow u64 after ~584k years
        core::time::Duration::as_micros(self) as u64
    }

    fn from_micros(micros: u64) -> Self {
        core::time::Duration::from_micros(micros)
    }

    fn saturating_sub(self, other: Self) -> Self {
        core::time::Duration::saturating_sub(self, other)
    }
}

#[cfg(feature = "std")]
impl TimeInstant for std::time::Instant {
    type Duration = core::time::Duration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        self.saturating_duration_since(earlier)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        std::time::Instant::checked_add(&self, duration)
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        std::time::Instant::checked_sub(&self, duration)
    }
}

/// Monotonic time source backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdClock;

#[cfg(feature = "std")]
impl TimeSource<std::time::Instant> for StdClock {
    fn now(&self) -> std::time::Instant {
        std::time::Instant::now()
    }
}

/// Offsets `base` by `nominal + jitter * sample`.
///
/// `sample` is clamped to `[-1, 1]`. The combined offset may be negative, in
/// which case the result lies before `base`. Returns `None` when the instant
/// type cannot represent the result.
pub(crate) fn offset_instant<I: TimeInstant>(
    base: I,
    nominal: I::Duration,
    jitter: I::Duration,
    sample: f32,
) -> Option<I> {
    let offset = signed_offset_micros(nominal, jitter, sample);
    if offset >= 0 {
        base.checked_add(I::Duration::from_micros(offset as u64))
    } else {
        base.checked_sub(I::Duration::from_micros(offset.unsigned_abs() as u64))
    }
}

/// Like [`offset_instant`], but the combined offset is clamped at zero so the
/// result is never before `base`.
pub(crate) fn offset_instant_forward<I: TimeInstant>(
    base: I,
    nominal: I::Duration,
    jitter: I::Duration,
    sample: f32,
) -> Option<I> {
    let offset = signed_offset_micros(nominal, jitter, sample).max(0);
    base.checked_add(I::Duration::from_micros(offset as u64))
}

fn signed_offset_micros<D: TimeDuration>(nominal: D, jitter: D, sample: f32) -> i128 {
    // NaN falls through clamp unchanged; treat it as no jitter
    let sample = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
    let scaled = jitter.as_micros() as f64 * sample as f64;
    let magnitude = (if scaled < 0.0 { -scaled } else { scaled } + 0.5) as u64;
    let jitter_micros = if scaled < 0.0 {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    nominal.as_micros() as i128 + jitter_micros
}
