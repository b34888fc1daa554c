#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`FlashSequence`**: A repeating list of alternating on/off durations with a cursor
//! - **`LightTimer`**: Drives one light element through its sequence, with start delay and jitter
//! - **`LightRegistry`**: Arms and polls every timer from a single drive loop
//! - **`Characteristic`**: Chart notation such as `Fl(2) WRG 6s`, expanded into a sequence
//! - **`LightOutput`**: Trait to implement for your light elements
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`RandomSource`**: Trait supplying jitter samples in `[-1, 1]`
//!
//! The library uses `Srgb<f32>` (0.0-1.0 range) for colours. When implementing
//! `LightOutput` for your hardware, convert these values to your device's native
//! format (e.g., 8-bit NeoPixel channels).

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod time;
pub mod types;
pub mod colors;
pub mod random;
pub mod sequence;
pub mod timer;
pub mod registry;
pub mod characteristic;

pub use characteristic::{Characteristic, CharacteristicError, LightClass, Phase};
pub use colors::{BLUE, COLOR_OFF, CYAN, ChartColour, GREEN, PURPLE, RED, WHITE, YELLOW};
pub use random::{NoJitter, RandomSource, RngSource};
pub use registry::{LightRegistry, RegistryError};
pub use sequence::{FlashSequence, SequenceBuilder};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::{LightOutput, LightTimer, LightTimerBuilder, Transition};
pub use types::{InvalidSequence, LightState, PixelId};

#[cfg(feature = "std")]
pub use time::StdClock;
