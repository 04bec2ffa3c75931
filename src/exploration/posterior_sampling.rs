use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    algo::tabular::QTable,
    ensure_interval,
    env::DiscreteActionSpace,
    error::{Error, Result},
    util::argmax,
};

use super::ActionSelection;

/// Noisy-greedy exploration in the spirit of Thompson sampling
///
/// For each action, `sample_count` draws from N(Q(s,a), noise²) are averaged and the action
/// with the highest mean is taken, lowest index among ties. This only approximates an
/// uncertainty-aware policy: the spread is a fixed `noise` rather than a posterior that
/// narrows as a state-action pair is visited, so it is not exact Thompson sampling.
#[derive(Debug, Clone)]
pub struct PosteriorSampling {
    noise: f32,
    sample_count: usize,
    dist: Normal<f32>,
}

impl PosteriorSampling {
    /// **Errors** if `noise` is negative or not finite, or if `sample_count` is zero
    pub fn new(noise: f32, sample_count: usize) -> Result<Self> {
        ensure_interval!(noise, from 0.0);
        if sample_count == 0 {
            return Err(Error::OutOfRange {
                name: "sample_count",
                value: 0.0,
                interval: "[1, ∞)".to_string(),
            });
        }
        let dist = Normal::new(0.0, noise).map_err(|_| Error::OutOfRange {
            name: "noise",
            value: noise as f64,
            interval: "[0, ∞)".to_string(),
        })?;
        Ok(Self {
            noise,
            sample_count,
            dist,
        })
    }

    pub fn noise(&self) -> f32 {
        self.noise
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Average of `sample_count` noisy draws around `value`
    fn sample_mean<R: Rng + ?Sized>(&self, rng: &mut R, value: f32) -> f32 {
        let total: f32 = (0..self.sample_count)
            .map(|_| value + self.dist.sample(rng))
            .sum();
        total / self.sample_count as f32
    }
}

impl PartialEq for PosteriorSampling {
    fn eq(&self, other: &Self) -> bool {
        self.noise == other.noise && self.sample_count == other.sample_count
    }
}

impl ActionSelection for PosteriorSampling {
    fn choose<E, R>(
        &self,
        env: &mut E,
        rng: &mut R,
        table: &QTable,
        state: E::State,
        _epsilon: f32,
    ) -> E::Action
    where
        E: DiscreteActionSpace,
        R: Rng + ?Sized,
    {
        let actions = env.actions();
        let means = actions
            .iter()
            .map(|&a| self.sample_mean(rng, table.get(state, a)))
            .collect::<Vec<_>>();
        let best = argmax(means).expect("There is always at least one action available");
        actions[best]
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::{Binomial, DiscreteCDF};

    use super::*;
    use crate::env::tests::MockEnv;

    #[test]
    fn posterior_sampling_validation() {
        let policy = PosteriorSampling::new(0.1, 2).unwrap();
        assert_eq!(policy.noise(), 0.1, "noise kept");
        assert_eq!(policy.sample_count(), 2, "sample count kept");
        assert!(PosteriorSampling::new(0.0, 1).is_ok(), "zero noise is greedy");
        assert!(PosteriorSampling::new(-0.1, 2).is_err(), "negative noise");
        assert!(PosteriorSampling::new(f32::INFINITY, 2).is_err(), "infinite noise");
        assert!(PosteriorSampling::new(0.1, 0).is_err(), "no samples");
    }

    #[test]
    fn zero_noise_is_greedy() {
        let policy = PosteriorSampling::new(0.0, 3).unwrap();
        let mut env = MockEnv::new();
        let mut rng = StdRng::seed_from_u64(6);
        let mut table = QTable::new(2, 2);
        assert_eq!(
            policy.choose(&mut env, &mut rng, &table, 0, 0.0),
            0,
            "ties go to the lowest index"
        );
        table[(0, 1)] = 0.01;
        for _ in 0..200 {
            assert_eq!(policy.choose(&mut env, &mut rng, &table, 0, 0.0), 1);
        }
    }

    #[test]
    fn many_samples_concentrate_on_best() {
        // Mean of 400 draws has std 0.005, far below the 0.2 gap
        let policy = PosteriorSampling::new(0.1, 400).unwrap();
        let mut env = MockEnv::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut table = QTable::new(2, 2);
        table[(0, 0)] = 0.2;
        for _ in 0..200 {
            assert_eq!(policy.choose(&mut env, &mut rng, &table, 0, 0.0), 0);
        }
    }

    #[test]
    fn noise_explores_close_values() {
        // Equal values: the noisy means decide, so both actions come up about evenly
        let policy = PosteriorSampling::new(0.1, 2).unwrap();
        let mut env = MockEnv::new();
        let mut rng = StdRng::seed_from_u64(8);
        let table = QTable::new(2, 2);
        let n = 4000;
        let ones = (0..n)
            .filter(|_| policy.choose(&mut env, &mut rng, &table, 0, 0.0) == 1)
            .count() as u64;
        let cdf = Binomial::new(0.5, n).unwrap().cdf(ones);
        assert!(
            cdf > 1e-4 && cdf < 1.0 - 1e-4,
            "{ones} of {n} picks of action 1 is plausible"
        );
    }
}
