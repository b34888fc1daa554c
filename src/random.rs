//! Random sampling for timing jitter.

use rand::{Rng, RngCore};

/// Source of independent jitter samples.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[-1.0, 1.0]`.
    ///
    /// Values outside that range are clamped by the caller.
    fn uniform(&mut self) -> f32;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform(&mut self) -> f32 {
        (**self).uniform()
    }
}

/// Adapts any [`rand`] generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RngSource<R> {
    /// Wraps a generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn uniform(&mut self) -> f32 {
        self.0.gen_range(-1.0f32..=1.0)
    }
}

/// A source that always returns zero, for lights without jitter or for
/// deterministic runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl RandomSource for NoJitter {
    fn uniform(&mut self) -> f32 {
        0.0
    }
}
