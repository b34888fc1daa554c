//! Per-light flash timer.
//!
//! Provides [`LightTimer`], which drives one light element through its flash
//! sequence against a shared clock, and the [`LightOutput`] trait that the
//! timer commands when it toggles.

use crate::colors::{COLOR_OFF, RED};
use crate::random::RandomSource;
use crate::sequence::FlashSequence;
use crate::time::{TimeDuration, TimeInstant, offset_instant, offset_instant_forward};
use crate::types::{InvalidSequence, LightState, PixelId};
use palette::Srgb;

/// Trait for abstracting the light elements.
///
/// Implement this for your output (a NeoPixel strip, GPIO pins, a terminal
/// renderer, ...). Timers only hold a [`PixelId`] and command the element
/// through this trait, so one output can be shared by every timer.
pub trait LightOutput {
    /// Sets `pixel` to `color`. [`COLOR_OFF`] blanks the element.
    ///
    /// Handle any hardware errors internally - this method cannot fail.
    fn set_pixel(&mut self, pixel: PixelId, color: Srgb);
}

impl<O: LightOutput + ?Sized> LightOutput for &mut O {
    fn set_pixel(&mut self, pixel: PixelId, color: Srgb) {
        (**self).set_pixel(pixel, color);
    }
}

/// A transition fired by [`LightTimer::poll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<I: TimeInstant> {
    /// State the light switched to.
    pub state: LightState,
    /// Instant passed to the poll that fired.
    pub fired_at: I,
    /// Nominal sequence duration consumed by this transition.
    pub duration: I::Duration,
    /// When the next transition becomes due.
    pub next_event: I,
}

/// Drives one light element through a repeating flash sequence.
///
/// The timer is armed once with a baseline shared by every light, then polled
/// with the current time as often as the host likes. A poll that finds the
/// next event strictly in the past toggles the light, commands the output and
/// schedules the following event from the sequence plus a fresh jitter sample.
///
/// # Type Parameters
/// * `'a` - Lifetime of the light's name
/// * `I` - Time instant type
/// * `N` - Maximum number of durations in the flash sequence
pub struct LightTimer<'a, I: TimeInstant, const N: usize> {
    name: &'a str,
    pixel: PixelId,
    color: Srgb,
    sequence: FlashSequence<I::Duration, N>,
    initial_delay: I::Duration,
    jitter: I::Duration,
    start_time: Option<I>,
    next_event: Option<I>,
    state: LightState,
}

impl<'a, I: TimeInstant, const N: usize> LightTimer<'a, I, N> {
    /// Creates an unarmed timer. The light starts off and is due immediately.
    pub fn new(
        name: &'a str,
        pixel: PixelId,
        color: Srgb,
        sequence: FlashSequence<I::Duration, N>,
        initial_delay: I::Duration,
        jitter: I::Duration,
    ) -> Self {
        Self {
            name,
            pixel,
            color,
            sequence,
            initial_delay,
            jitter,
            start_time: None,
            next_event: None,
            state: LightState::Off,
        }
    }

    /// Creates a builder with red colour, a 1s on / 1s off sequence and no
    /// delay or jitter.
    pub fn builder(name: &'a str, pixel: PixelId) -> LightTimerBuilder<'a, I, N> {
        LightTimerBuilder::new(name, pixel)
    }

    /// Establishes the start time from a baseline shared by all timers.
    ///
    /// `start = baseline + initial_delay + jitter * U(-1, 1)`, and the first
    /// transition becomes due at `start`. Timers armed with the same baseline,
    /// delay and zero jitter fire in lockstep. If the jitter would move the
    /// start before what the instant type can represent, the baseline is used.
    pub fn arm<R: RandomSource>(&mut self, baseline: I, rng: &mut R) {
        let start = offset_instant(baseline, self.initial_delay, self.jitter, rng.uniform())
            .unwrap_or(baseline);

        self.start_time = Some(start);
        self.next_event = Some(start);
    }

    /// Checks whether the next event is due and fires it if so.
    ///
    /// Fires only when `now` is strictly after the scheduled instant, so a
    /// timer is never due at the exact instant it was scheduled for. An
    /// unarmed timer is always due. Never blocks.
    ///
    /// # Returns
    /// * `Some(transition)` - The light toggled
    /// * `None` - Not due yet
    pub fn poll<R, O>(&mut self, now: I, rng: &mut R, output: &mut O) -> Option<Transition<I>>
    where
        R: RandomSource,
        O: LightOutput,
    {
        match self.next_event {
            Some(due) if now <= due => return None,
            _ => {}
        }

        let state = self.state.toggled();
        self.state = state;

        let color = match state {
            LightState::On => self.color,
            LightState::Off => COLOR_OFF,
        };
        output.set_pixel(self.pixel, color);

        let duration = self.sequence.next_duration();

        // Jitter larger than the duration would schedule into the past; clamp
        // at `now`. On instant overflow the timer stays due and fires again on
        // the next poll.
        let next_event =
            offset_instant_forward(now, duration, self.jitter, rng.uniform()).unwrap_or(now);
        self.next_event = Some(next_event);

        #[cfg(feature = "defmt")]
        defmt::trace!("{=str}: {} on pixel {}", self.name, state, self.pixel);

        Some(Transition {
            state,
            fired_at: now,
            duration,
            next_event,
        })
    }

    /// Replaces the flash sequence and resets its cursor.
    ///
    /// On error the previous sequence stays in place.
    pub fn set_sequence(&mut self, durations: &[I::Duration]) -> Result<(), InvalidSequence> {
        self.sequence.configure(durations)
    }

    /// Sets the colour shown while the light is on.
    ///
    /// Takes effect at the next on transition.
    pub fn set_color(&mut self, color: Srgb) {
        self.color = color;
    }

    /// Sets the delay applied by the next [`arm`](Self::arm).
    pub fn set_initial_delay(&mut self, initial_delay: I::Duration) {
        self.initial_delay = initial_delay;
    }

    /// Sets the jitter magnitude used from the next transition on.
    ///
    /// Choose a value below the shortest duration; larger values are clamped
    /// so that events never go backwards in time.
    pub fn set_jitter(&mut self, jitter: I::Duration) {
        self.jitter = jitter;
    }

    /// Returns the diagnostic name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the element this timer commands.
    pub fn pixel(&self) -> PixelId {
        self.pixel
    }

    /// Returns the colour shown while on.
    pub fn color(&self) -> Srgb {
        self.color
    }

    /// Returns the last commanded state.
    pub fn state(&self) -> LightState {
        self.state
    }

    /// Returns the flash sequence.
    pub fn sequence(&self) -> &FlashSequence<I::Duration, N> {
        &self.sequence
    }

    pub fn initial_delay(&self) -> I::Duration {
        self.initial_delay
    }

    pub fn jitter(&self) -> I::Duration {
        self.jitter
    }

    /// Returns the armed start time, if armed.
    pub fn start_time(&self) -> Option<I> {
        self.start_time
    }

    /// Returns when the next transition is due. `None` means due now.
    pub fn next_event(&self) -> Option<I> {
        self.next_event
    }

    /// Returns true once [`arm`](Self::arm) has been called.
    pub fn is_armed(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Builder for [`LightTimer`] from configuration fields.
pub struct LightTimerBuilder<'a, I: TimeInstant, const N: usize> {
    name: &'a str,
    pixel: PixelId,
    color: Srgb,
    sequence: Result<FlashSequence<I::Duration, N>, InvalidSequence>,
    initial_delay: I::Duration,
    jitter: I::Duration,
}

impl<'a, I: TimeInstant, const N: usize> LightTimerBuilder<'a, I, N> {
    fn new(name: &'a str, pixel: PixelId) -> Self {
        let one_second = I::Duration::from_millis(1_000);
        Self {
            name,
            pixel,
            color: RED,
            sequence: FlashSequence::new(&[one_second, one_second]),
            initial_delay: I::Duration::ZERO,
            jitter: I::Duration::ZERO,
        }
    }

    /// Sets the colour shown while on.
    pub fn color(mut self, color: Srgb) -> Self {
        self.color = color;
        self
    }

    /// Sets the on/off durations. Validation errors surface from `build`.
    pub fn sequence(mut self, durations: &[I::Duration]) -> Self {
        self.sequence = FlashSequence::new(durations);
        self
    }

    /// Uses an already validated sequence.
    pub fn flash_sequence(mut self, sequence: FlashSequence<I::Duration, N>) -> Self {
        self.sequence = Ok(sequence);
        self
    }

    /// Delays the first transition after arming.
    pub fn initial_delay(mut self, initial_delay: I::Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Sets the symmetric random perturbation applied to every interval.
    pub fn jitter(mut self, jitter: I::Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Builds the timer.
    ///
    /// # Errors
    /// Returns the sequence validation error, if any.
    pub fn build(self) -> Result<LightTimer<'a, I, N>, InvalidSequence> {
        Ok(LightTimer::new(
            self.name,
            self.pixel,
            self.color,
            self.sequence?,
            self.initial_delay,
            self.jitter,
        ))
    }
}
