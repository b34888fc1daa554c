//! Core types shared by sequences, timers and the registry.

/// Handle to one addressable light element (e.g. a NeoPixel index).
///
/// Timers only hold the handle; the element itself belongs to the
/// [`LightOutput`](crate::LightOutput) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelId(pub usize);

impl From<usize> for PixelId {
    fn from(id: usize) -> Self {
        PixelId(id)
    }
}

impl From<PixelId> for usize {
    fn from(id: PixelId) -> Self {
        id.0
    }
}

/// Whether a light is currently lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightState {
    /// Element is blank.
    #[default]
    Off,
    /// Element shows the light's colour.
    On,
}

impl LightState {
    /// Returns the opposite state.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            LightState::Off => LightState::On,
            LightState::On => LightState::Off,
        }
    }

    /// Returns true if the light is lit.
    #[inline]
    pub fn is_on(self) -> bool {
        self == LightState::On
    }
}

/// Reasons a duration list cannot be used as a flash sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidSequence {
    /// No durations provided.
    Empty,

    /// A duration is zero.
    NonPositiveDuration {
        /// Position of the offending duration.
        index: usize,
    },

    /// More durations than the sequence can hold.
    CapacityExceeded {
        /// Maximum number of durations.
        capacity: usize,
    },
}

impl core::fmt::Display for InvalidSequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidSequence::Empty => {
                write!(f, "sequence must have at least one duration")
            }
            InvalidSequence::NonPositiveDuration { index } => {
                write!(f, "duration at index {} must be greater than zero", index)
            }
            InvalidSequence::CapacityExceeded { capacity } => {
                write!(f, "sequence capacity of {} durations exceeded", capacity)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidSequence {}
