use crate::random::RandomSource;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::{LightOutput, LightTimer, Transition};
use heapless::Vec;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// The registry is full and cannot accept more timers.
    Full {
        /// Maximum number of timers.
        capacity: usize,
    },
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::Full { capacity } => {
                write!(f, "registry is full, capacity is {} lights", capacity)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}

/// An insertion-ordered set of light timers driven from a single loop.
///
/// The registry is owned by whoever assembles the lights and is passed
/// explicitly to the arm and poll steps. Timers are polled in registration
/// order, all with the same `now` so no light gets a fresher clock reading
/// than another within one pass.
///
/// # Type Parameters
/// * `'a` - Lifetime of the light names
/// * `I` - Time instant type
/// * `N` - Maximum number of durations per flash sequence
/// * `MAX_LIGHTS` - Maximum number of timers this registry can hold
pub struct LightRegistry<'a, I: TimeInstant, const N: usize, const MAX_LIGHTS: usize> {
    timers: Vec<LightTimer<'a, I, N>, MAX_LIGHTS>,
}

impl<'a, I, const N: usize, const MAX_LIGHTS: usize> LightRegistry<'a, I, N, MAX_LIGHTS>
where
    I: TimeInstant,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Appends a timer. Duplicates are not detected.
    ///
    /// # Errors
    /// * `Full` - The registry already holds `MAX_LIGHTS` timers
    pub fn register(&mut self, timer: LightTimer<'a, I, N>) -> Result<(), RegistryError> {
        self.timers
            .push(timer)
            .map_err(|_| RegistryError::Full {
                capacity: MAX_LIGHTS,
            })
    }

    /// Arms every timer with the same baseline, in registration order.
    ///
    /// Call once, after all timers are registered and before polling starts.
    pub fn arm_all<R: RandomSource>(&mut self, baseline: I, rng: &mut R) {
        for timer in self.timers.iter_mut() {
            timer.arm(baseline, rng);
        }
    }

    /// Polls every timer once with the same `now`.
    ///
    /// Returns the number of transitions fired.
    pub fn poll_all_once<R, O>(&mut self, now: I, rng: &mut R, output: &mut O) -> usize
    where
        R: RandomSource,
        O: LightOutput,
    {
        self.poll_all_once_with(now, rng, output, |_, _| {})
    }

    /// Polls every timer once and reports each fired transition.
    ///
    /// `on_transition` receives the timer that fired and what it did, e.g. for
    /// diagnostic logging in the host.
    pub fn poll_all_once_with<R, O, F>(
        &mut self,
        now: I,
        rng: &mut R,
        output: &mut O,
        mut on_transition: F,
    ) -> usize
    where
        R: RandomSource,
        O: LightOutput,
        F: FnMut(&LightTimer<'a, I, N>, &Transition<I>),
    {
        let mut fired = 0;
        for timer in self.timers.iter_mut() {
            if let Some(transition) = timer.poll(now, rng, output) {
                on_transition(timer, &transition);
                fired += 1;
            }
        }
        fired
    }

    /// Runs the drive loop until `keep_running` returns false.
    ///
    /// Each pass reads the clock once and polls every timer. Passes run back
    /// to back with no sleep; hosts that want to trade timing fidelity for CPU
    /// can sleep inside `keep_running`, which is checked before every pass.
    /// Outputs are left in their last commanded state on return.
    ///
    /// Returns the number of passes completed.
    pub fn run<T, R, O, K>(
        &mut self,
        clock: &T,
        rng: &mut R,
        output: &mut O,
        mut keep_running: K,
    ) -> u64
    where
        T: TimeSource<I>,
        R: RandomSource,
        O: LightOutput,
        K: FnMut() -> bool,
    {
        let mut passes = 0;
        while keep_running() {
            self.poll_all_once(clock.now(), rng, output);
            passes += 1;
        }
        passes
    }

    /// Returns the timer at `index` in registration order.
    pub fn get(&self, index: usize) -> Option<&LightTimer<'a, I, N>> {
        self.timers.get(index)
    }

    /// Returns a mutable reference to the timer at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LightTimer<'a, I, N>> {
        self.timers.get_mut(index)
    }

    /// Iterates timers in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, LightTimer<'a, I, N>> {
        self.timers.iter()
    }

    /// Returns the number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if no timers are registered.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<'a, I: TimeInstant, const N: usize, const MAX_LIGHTS: usize> Default
    for LightRegistry<'a, I, N, MAX_LIGHTS>
{
    fn default() -> Self {
        Self::new()
    }
}
