// src/noise.rs
//
// Random sources feeding the noise processor.
//
// Each processor owns its own source, so two processors never share
// generator state.

use std::time::SystemTime;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed values in [0, 1).
pub trait NoiseSource: Send {
    fn next_uniform(&mut self) -> f32;

    /// Next bipolar value in [-1, 1).
    #[inline]
    fn next_bipolar(&mut self) -> f32 {
        self.next_uniform() * 2.0 - 1.0
    }
}

/// Default source: a `StdRng` seeded from the wall clock.
pub struct ClockSeeded {
    rng: StdRng,
}

impl ClockSeeded {
    /// Seed from the current wall-clock time.
    ///
    /// Falls back to a zero seed if the clock reads before the Unix epoch.
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Seed with a fixed value (reproducible output).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ClockSeeded {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for ClockSeeded {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        // Standard distribution for f32 yields [0, 1)
        self.rng.r#gen::<f32>()
    }
}

fn clock_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs() ^ u64::from(now.subsec_nanos())
}
