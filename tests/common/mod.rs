//! Shared test infrastructure for buoy-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use buoy_sequencer::{LightOutput, PixelId, RandomSource, TimeDuration, TimeInstant, TimeSource};
use palette::Srgb;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_micros(&self) -> u64 {
        self.0
    }

    fn from_micros(micros: u64) -> Self {
        TestDuration(micros)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing (microseconds since an arbitrary epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(TestInstant)
    }
}

pub fn ms(millis: u64) -> TestDuration {
    TestDuration(millis * 1_000)
}

pub fn at_ms(millis: u64) -> TestInstant {
    TestInstant(millis * 1_000)
}

// ============================================================================
// Mock Output
// ============================================================================

/// Mock output that records every pixel command
pub struct MockOutput {
    history: heapless::Vec<(PixelId, Srgb), 256>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            history: heapless::Vec::new(),
        }
    }

    pub fn history(&self) -> &[(PixelId, Srgb)] {
        &self.history
    }

    pub fn last_for(&self, pixel: PixelId) -> Option<Srgb> {
        self.history
            .iter()
            .rev()
            .find(|(p, _)| *p == pixel)
            .map(|(_, c)| *c)
    }
}

impl LightOutput for MockOutput {
    fn set_pixel(&mut self, pixel: PixelId, color: Srgb) {
        let _ = self.history.push((pixel, color));
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Random Source
// ============================================================================

/// Replays a fixed list of samples, cycling when exhausted
pub struct ScriptedRandom {
    samples: heapless::Vec<f32, 16>,
    index: usize,
}

impl ScriptedRandom {
    pub fn new(samples: &[f32]) -> Self {
        Self {
            samples: heapless::Vec::from_slice(samples).unwrap(),
            index: 0,
        }
    }

    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f32 {
        let sample = self.samples[self.index % self.samples.len()];
        self.index += 1;
        sample
    }
}

// ============================================================================
// Re-export color constants from library for test convenience
// ============================================================================

#[allow(unused_imports)]
pub use buoy_sequencer::{COLOR_OFF, GREEN, RED, WHITE, YELLOW};
