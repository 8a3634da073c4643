//! Bounded random walk
//!
//! Each cycle every reading is nudged by a random delta no larger than its
//! step, clamped back into its interval, and (for floats) rounded to two
//! decimals. Actuator flags are resampled from scratch.
//!
//! Randomness comes from a `NoiseSource` so the walk can be driven by a real
//! RNG in production and by fixed deltas in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::state::GreenhouseState;

/// Closed interval plus maximum per-cycle step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const AIR_TEMPERATURE: Bounds<f64> = Bounds { min: 15.0, max: 35.0, step: 1.0 };
pub const WATER_TEMPERATURE: Bounds<f64> = Bounds { min: 15.0, max: 30.0, step: 1.0 };
pub const AIR_HUMIDITY: Bounds<f64> = Bounds { min: 30.0, max: 90.0, step: 1.0 };
pub const LUMINOSITY: Bounds<f64> = Bounds { min: 0.0, max: 100.0, step: 1.0 };
pub const WATER_PH: Bounds<f64> = Bounds { min: 5.5, max: 8.5, step: 0.1 };
pub const NUTRIENTS: Bounds<i64> = Bounds { min: 200, max: 800, step: 10 };

/// Source of the random deltas applied each cycle
pub trait NoiseSource {
    /// Uniform draw in `[-step, step]`, or 0.0 for a non-positive step
    fn float_delta(&mut self, step: f64) -> f64;

    /// Uniform integer draw in `[-step, step]`, or 0 for a non-positive step
    fn int_delta(&mut self, step: i64) -> i64;

    /// Fair coin for on/off actuators
    fn coin(&mut self) -> bool;
}

/// Noise backed by a `rand` generator
pub struct RngNoise<R> {
    rng: R,
}

impl<R: Rng> RngNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNoise<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for RngNoise<R> {
    fn float_delta(&mut self, step: f64) -> f64 {
        if !step.is_finite() || step <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-step..=step)
    }

    fn int_delta(&mut self, step: i64) -> i64 {
        if step <= 0 {
            return 0;
        }
        self.rng.gen_range(-step..=step)
    }

    fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Noise that always yields the same deltas (clamped to the requested step)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise {
    pub float: f64,
    pub int: i64,
    pub coin: bool,
}

impl FixedNoise {
    pub fn new(float: f64, int: i64, coin: bool) -> Self {
        Self { float, int, coin }
    }

    /// No movement at all; flags stay on
    pub fn still() -> Self {
        Self::new(0.0, 0, true)
    }
}

impl NoiseSource for FixedNoise {
    fn float_delta(&mut self, step: f64) -> f64 {
        if !step.is_finite() || step <= 0.0 {
            return 0.0;
        }
        self.float.clamp(-step, step)
    }

    fn int_delta(&mut self, step: i64) -> i64 {
        if step <= 0 {
            return 0;
        }
        self.int.clamp(-step, step)
    }

    fn coin(&mut self) -> bool {
        self.coin
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Nudge a float reading by up to `step`, clamp into `[min, max]`, round to 2 decimals
pub fn vary<N: NoiseSource + ?Sized>(
    noise: &mut N,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
) -> f64 {
    let next = value + noise.float_delta(step);
    round2(next.min(max).max(min))
}

/// Integer counterpart of `vary`, no rounding
pub fn vary_int<N: NoiseSource + ?Sized>(
    noise: &mut N,
    value: i64,
    min: i64,
    max: i64,
    step: i64,
) -> i64 {
    value.saturating_add(noise.int_delta(step)).min(max).max(min)
}

fn vary_bounded<N: NoiseSource + ?Sized>(noise: &mut N, value: f64, bounds: Bounds<f64>) -> f64 {
    vary(noise, value, bounds.min, bounds.max, bounds.step)
}

/// Advance every reading by one cycle, in place
pub fn advance_state<'a, N: NoiseSource + ?Sized>(
    state: &'a mut GreenhouseState,
    noise: &mut N,
) -> &'a GreenhouseState {
    state.air_temperature = vary_bounded(noise, state.air_temperature, AIR_TEMPERATURE);
    state.water_temperature = vary_bounded(noise, state.water_temperature, WATER_TEMPERATURE);
    state.air_humidity = vary_bounded(noise, state.air_humidity, AIR_HUMIDITY);
    state.luminosity = vary_bounded(noise, state.luminosity, LUMINOSITY);
    state.water_ph = vary_bounded(noise, state.water_ph, WATER_PH);
    state.nutrients = vary_int(
        noise,
        state.nutrients,
        NUTRIENTS.min,
        NUTRIENTS.max,
        NUTRIENTS.step,
    );
    state.ventilation = noise.coin();
    state.lighting = noise.coin();
    state.water_pump = noise.coin();

    debug_assert!(state.within_bounds());
    state
}
