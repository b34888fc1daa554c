use crate::time::TimeDuration;
use crate::types::InvalidSequence;
use heapless::Vec;

/// A repeating list of alternating on/off durations with a cursor.
///
/// Even positions are how long the light stays on, odd positions how long it
/// stays off. The sequence itself does not track on/off state; it only answers
/// "how long until the next toggle" and steps its cursor with wraparound.
///
/// # Type Parameters
/// * `D` - The duration type (e.g., `core::time::Duration`)
/// * `N` - Maximum number of durations this sequence can hold
#[derive(Debug, Clone)]
pub struct FlashSequence<D: TimeDuration, const N: usize> {
    durations: Vec<D, N>,
    cursor: usize,
}

impl<D: TimeDuration, const N: usize> FlashSequence<D, N> {
    /// Creates a validated sequence from a duration list.
    ///
    /// # Errors
    /// * `Empty` - No durations were given
    /// * `NonPositiveDuration` - A duration is zero
    /// * `CapacityExceeded` - More than `N` durations were given
    pub fn new(durations: &[D]) -> Result<Self, InvalidSequence> {
        Ok(Self {
            durations: Self::validate(durations)?,
            cursor: 0,
        })
    }

    /// Creates a new sequence builder.
    pub fn builder() -> SequenceBuilder<D, N> {
        SequenceBuilder::new()
    }

    /// Replaces the durations and resets the cursor to 0.
    ///
    /// On error the current durations and cursor are left untouched.
    pub fn configure(&mut self, durations: &[D]) -> Result<(), InvalidSequence> {
        self.durations = Self::validate(durations)?;
        self.cursor = 0;
        Ok(())
    }

    fn validate(durations: &[D]) -> Result<Vec<D, N>, InvalidSequence> {
        if durations.is_empty() {
            return Err(InvalidSequence::Empty);
        }

        if let Some(index) = durations.iter().position(|d| *d == D::ZERO) {
            return Err(InvalidSequence::NonPositiveDuration { index });
        }

        Vec::from_slice(durations).map_err(|_| InvalidSequence::CapacityExceeded { capacity: N })
    }

    /// Returns the duration at the cursor.
    #[inline]
    pub fn current_duration(&self) -> D {
        self.durations[self.cursor]
    }

    /// Moves the cursor to the next duration, wrapping to 0 after the last.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.durations.len() {
            self.cursor = 0;
        }
    }

    /// Returns the current duration and advances past it.
    #[inline]
    pub fn next_duration(&mut self) -> D {
        let duration = self.current_duration();
        self.advance();
        duration
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of durations.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Always false; a valid sequence has at least one duration.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Returns all durations in order.
    pub fn durations(&self) -> &[D] {
        &self.durations
    }

    /// Calculates the total duration of one complete cycle.
    pub fn period(&self) -> D {
        let total_micros = self
            .durations
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.as_micros()));
        D::from_micros(total_micros)
    }
}

/// Builder for constructing validated flash sequences.
///
/// Durations are appended in order; `on` and `off` are readability aliases
/// for [`SequenceBuilder::duration`] and do not check parity.
#[derive(Debug)]
pub struct SequenceBuilder<D: TimeDuration, const N: usize> {
    durations: Vec<D, N>,
    overflowed: bool,
}

impl<D: TimeDuration, const N: usize> SequenceBuilder<D, N> {
    /// Creates a new empty sequence builder.
    pub fn new() -> Self {
        Self {
            durations: Vec::new(),
            overflowed: false,
        }
    }

    /// Appends a duration.
    pub fn duration(mut self, duration: D) -> Self {
        if self.durations.push(duration).is_err() {
            self.overflowed = true;
        }
        self
    }

    /// Appends an on duration.
    pub fn on(self, duration: D) -> Self {
        self.duration(duration)
    }

    /// Appends an off duration.
    pub fn off(self, duration: D) -> Self {
        self.duration(duration)
    }

    /// Appends `count` identical on/off pairs.
    pub fn flashes(mut self, count: usize, on: D, off: D) -> Self {
        for _ in 0..count {
            self = self.on(on).off(off);
        }
        self
    }

    /// Builds and validates the sequence.
    ///
    /// # Errors
    /// * `CapacityExceeded` - More than `N` durations were appended
    /// * Any error from [`FlashSequence::new`]
    pub fn build(self) -> Result<FlashSequence<D, N>, InvalidSequence> {
        if self.overflowed {
            return Err(InvalidSequence::CapacityExceeded { capacity: N });
        }
        FlashSequence::new(&self.durations)
    }
}

impl<D: TimeDuration, const N: usize> Default for SequenceBuilder<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn new_sequence_starts_at_first_duration() {
        let seq = FlashSequence::<Duration, 4>::new(&[ms(500), ms(2000)]).unwrap();
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.current_duration(), ms(500));
    }

    #[test]
    fn current_duration_does_not_advance() {
        let seq = FlashSequence::<Duration, 4>::new(&[ms(500), ms(2000)]).unwrap();
        assert_eq!(seq.current_duration(), ms(500));
        assert_eq!(seq.current_duration(), ms(500));
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn single_duration_sequence_wraps_onto_itself() {
        let mut seq = FlashSequence::<Duration, 1>::new(&[ms(750)]).unwrap();
        seq.advance();
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.current_duration(), ms(750));
    }

    #[test]
    fn next_duration_returns_then_advances() {
        let mut seq = FlashSequence::<Duration, 4>::new(&[ms(1), ms(2), ms(3)]).unwrap();
        assert_eq!(seq.next_duration(), ms(1));
        assert_eq!(seq.next_duration(), ms(2));
        assert_eq!(seq.next_duration(), ms(3));
        assert_eq!(seq.next_duration(), ms(1));
    }

    #[test]
    fn zero_duration_reports_its_index() {
        let result = FlashSequence::<Duration, 4>::new(&[ms(1), ms(2), Duration::ZERO]);
        assert_eq!(
            result.unwrap_err(),
            InvalidSequence::NonPositiveDuration { index: 2 }
        );
    }

    #[test]
    fn period_sums_all_durations() {
        let seq = FlashSequence::<Duration, 8>::new(&[ms(500), ms(500), ms(500), ms(4500)]).unwrap();
        assert_eq!(seq.period(), ms(6000));
    }

    #[test]
    fn builder_flashes_appends_pairs() {
        let seq = FlashSequence::<Duration, 8>::builder()
            .flashes(2, ms(500), ms(500))
            .on(ms(2000))
            .off(ms(7000))
            .build()
            .unwrap();
        assert_eq!(
            seq.durations(),
            &[ms(500), ms(500), ms(500), ms(500), ms(2000), ms(7000)]
        );
    }

    #[test]
    fn builder_overflow_is_reported_at_build() {
        let result = FlashSequence::<Duration, 2>::builder()
            .on(ms(1))
            .off(ms(1))
            .on(ms(1))
            .build();
        assert_eq!(
            result.unwrap_err(),
            InvalidSequence::CapacityExceeded { capacity: 2 }
        );
    }

    #[test]
    fn empty_builder_is_rejected() {
        let result = FlashSequence::<Duration, 2>::builder().build();
        assert_eq!(result.unwrap_err(), InvalidSequence::Empty);
    }
}
