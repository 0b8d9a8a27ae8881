//! Simulated station collaborators.
//!
//! Real sensor integration is out of scope; these simulators stand in for
//! the weighing platform and the camera-line crossing detector. Both are
//! seedable so automated runs and tests are reproducible.

pub mod error;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tally_traits::{CrossingDetector, Direction, WeightSource};

use crate::error::HwError;

/// Simulated weighing platform: uniform readings in a configured kg range.
pub struct SimulatedScale {
    rng: SmallRng,
    min_kg: f32,
    max_kg: f32,
}

impl SimulatedScale {
    /// Non-deterministic simulator (entropy-seeded).
    pub fn new(min_kg: f32, max_kg: f32) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            min_kg,
            max_kg,
        }
    }

    /// Deterministic simulator for reproducible runs and tests.
    pub fn seeded(min_kg: f32, max_kg: f32, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            min_kg,
            max_kg,
        }
    }
}

impl WeightSource for SimulatedScale {
    fn sample(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        // A zero budget cannot produce a reading; real indicators need a
        // settling window too.
        if timeout.is_zero() {
            return Err(Box::new(HwError::Timeout));
        }
        // Two decimal places, like a platform indicator display.
        let raw: f32 = self.rng.gen_range(self.min_kg..=self.max_kg);
        let kg = (raw * 100.0).round() / 100.0;
        tracing::debug!(kg, "simulated platform sample");
        Ok(kg)
    }
}

/// Simulated crossing detector: every poll yields one crossing, outbound
/// with the configured probability. The feed's polling rate sets the
/// effective crossing rate.
pub struct SimulatedDetector {
    rng: SmallRng,
    out_ratio: f32,
}

impl SimulatedDetector {
    pub fn new(out_ratio: f32) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            out_ratio,
        }
    }

    pub fn seeded(out_ratio: f32, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            out_ratio,
        }
    }
}

impl CrossingDetector for SimulatedDetector {
    fn poll(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Option<Direction>, Box<dyn std::error::Error + Send + Sync>> {
        let direction = if self.rng.r#gen::<f32>() < self.out_ratio {
            Direction::Out
        } else {
            Direction::In
        };
        tracing::trace!(?direction, "simulated crossing");
        Ok(Some(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_millis(10);

    #[test]
    fn seeded_scales_are_reproducible() {
        let mut a = SimulatedScale::seeded(50.0, 100.0, 42);
        let mut b = SimulatedScale::seeded(50.0, 100.0, 42);
        for _ in 0..32 {
            assert_eq!(a.sample(TIMEOUT).unwrap(), b.sample(TIMEOUT).unwrap());
        }
    }

    #[rstest]
    #[case(50.0, 100.0)]
    #[case(0.0, 1.0)]
    #[case(300.0, 600.0)]
    fn samples_stay_in_range(#[case] min_kg: f32, #[case] max_kg: f32) {
        let mut scale = SimulatedScale::seeded(min_kg, max_kg, 7);
        for _ in 0..100 {
            let kg = scale.sample(TIMEOUT).unwrap();
            // Rounding to 2 decimals can nudge past the bounds slightly.
            assert!(kg >= min_kg - 0.005 && kg <= max_kg + 0.005, "{kg} out of range");
        }
    }

    #[test]
    fn zero_sample_timeout_is_a_typed_timeout() {
        let mut scale = SimulatedScale::seeded(50.0, 100.0, 1);
        let err = scale.sample(Duration::ZERO).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn zero_out_ratio_is_all_inbound() {
        let mut det = SimulatedDetector::seeded(0.0, 1);
        for _ in 0..50 {
            assert_eq!(det.poll(TIMEOUT).unwrap(), Some(Direction::In));
        }
    }

    #[test]
    fn full_out_ratio_is_all_outbound() {
        let mut det = SimulatedDetector::seeded(1.0, 1);
        for _ in 0..50 {
            assert_eq!(det.poll(TIMEOUT).unwrap(), Some(Direction::Out));
        }
    }
}
