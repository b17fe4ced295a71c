//! Injected randomness for spawn and loot rolls.
//!
//! Decisions never reach for a global RNG. Callers pass a [`RandomSource`],
//! so the host can hand in its world RNG, tests can replay fixed rolls, and
//! benches can use a seeded generator.

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform `[0, 1)` generator.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max]`; `max < min` yields `min`.
    fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        (min as i64 + offset).min(max as i64) as i32
    }

    /// Uniform index into a collection of `len` items (`len > 0`).
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<Xoshiro256PlusPlus> {
    /// Deterministic generator for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of rolls, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    rolls: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Values are clamped into `[0, 1)`. An empty list always rolls 0.
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        let rolls = rolls
            .into()
            .into_iter()
            .map(|r| r.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { rolls, cursor: 0 }
    }

    /// Same roll forever
    pub fn constant(roll: f64) -> Self {
        Self::new(vec![roll])
    }

    /// How many rolls have been drawn so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}
