//! Pause between a simulated user's tasks

use crate::error::LoadError;
use rand::Rng;
use std::time::Duration;

/// Uniformly distributed wait in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    /// Wait between `min` and `max`, both inclusive
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Config` if `min > max`
    pub fn between(min: Duration, max: Duration) -> Result<Self, LoadError> {
        if min > max {
            return Err(LoadError::Config(format!(
                "min wait {min:?} is greater than max wait {max:?}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Always wait exactly `pause`
    #[must_use]
    pub const fn constant(pause: Duration) -> Self {
        Self {
            min: pause,
            max: pause,
        }
    }

    /// Lower bound
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draw the next pause
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_is_one_to_five_seconds() {
        let wait = WaitTime::default();
        assert_eq!(wait.min(), Duration::from_secs(1));
        assert_eq!(wait.max(), Duration::from_secs(5));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(WaitTime::between(Duration::from_secs(5), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_constant_wait() {
        let mut rng = StdRng::seed_from_u64(7);
        let wait = WaitTime::constant(Duration::from_millis(250));
        assert_eq!(wait.sample(&mut rng), Duration::from_millis(250));
    }

    proptest! {
        #[test]
        fn sample_stays_within_bounds(min_ms in 0u64..10_000, span_ms in 0u64..10_000, seed: u64) {
            let min = Duration::from_millis(min_ms);
            let max = Duration::from_millis(min_ms + span_ms);
            let wait = WaitTime::between(min, max).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..16 {
                let pause = wait.sample(&mut rng);
                prop_assert!(pause >= min && pause <= max);
            }
        }
    }
}
