//! Injectable randomness for the outcome engine.
//!
//! All statistical draws go through [`RandomSource`] so tests can substitute
//! deterministic sequences and verify the boundary arithmetic exactly.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source of the random draws the engine needs.
///
/// Implementations require no synchronization between calls; every draw is
/// independent.
pub trait RandomSource: Send + Sync {
    /// Uniform draw between two bounds. Reversed bounds are normalized, so
    /// the result always lies between the two values (small accounts produce
    /// an upper trade bound below the lower one).
    fn uniform(&self, a: f64, b: f64) -> f64;

    /// Draw from a normal distribution.
    fn normal(&self, mean: f64, stddev: f64) -> f64;

    /// Uniform draw in `[0, 1)`.
    fn unit(&self) -> f64;

    /// Uniform integer draw in `[lo, hi]` inclusive.
    fn int_range(&self, lo: u32, hi: u32) -> u32;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo == hi {
            return lo;
        }
        rand::thread_rng().gen_range(lo..hi)
    }

    fn normal(&self, mean: f64, stddev: f64) -> f64 {
        match Normal::new(mean, stddev) {
            Ok(dist) => dist.sample(&mut rand::thread_rng()),
            // Degenerate parameters collapse to the mean.
            Err(_) => mean,
        }
    }

    fn unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn int_range(&self, lo: u32, hi: u32) -> u32 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Test source replaying a scripted sequence of draws.
///
/// Every call pops the next value regardless of which method was invoked;
/// `int_range` truncates. Panics when the script runs out, which in a test
/// points at a missing draw.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    values: Mutex<VecDeque<f64>>,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: Mutex::new(values.into()),
        }
    }

    pub fn push(&self, value: f64) {
        self.values.lock().expect("scripted random poisoned").push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.values.lock().expect("scripted random poisoned").len()
    }

    fn next(&self) -> f64 {
        self.values
            .lock()
            .expect("scripted random poisoned")
            .pop_front()
            .expect("scripted random exhausted")
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&self, _a: f64, _b: f64) -> f64 {
        self.next()
    }

    fn normal(&self, _mean: f64, _stddev: f64) -> f64 {
        self.next()
    }

    fn unit(&self) -> f64 {
        self.next()
    }

    fn int_range(&self, _lo: u32, _hi: u32) -> u32 {
        self.next() as u32
    }
}
