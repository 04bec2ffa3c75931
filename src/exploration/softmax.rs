use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::{algo::tabular::QTable, ensure_interval, env::DiscreteActionSpace, error::Result};

use super::ActionSelection;

/// Softmax exploration policy (also known as Boltzmann exploration)
///
/// Actions are drawn with probability proportional to e<sup>Q(s,a) / τ</sup>. A large
/// temperature τ approaches uniform selection and a small one approaches greedy selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Softmax {
    temperature: f32,
}

impl Softmax {
    /// **Errors** if `temperature` is not finite and positive
    pub fn new(temperature: f32) -> Result<Self> {
        ensure_interval!(temperature, above 0.0);
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Selection probabilities for `q_values`
    ///
    /// The maximum is subtracted before exponentiating, so large values cannot overflow.
    pub fn probabilities(&self, q_values: &[f32]) -> Vec<f32> {
        let max = q_values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exponentials = q_values
            .iter()
            .map(|x| ((x - max) / self.temperature).exp())
            .collect::<Vec<_>>();
        let sum: f32 = exponentials.iter().sum();
        exponentials.into_iter().map(|x| x / sum).collect()
    }
}

impl ActionSelection for Softmax {
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
        let q_values = actions
            .iter()
            .map(|&a| table.get(state, a))
            .collect::<Vec<_>>();
        let dist = WeightedIndex::new(self.probabilities(&q_values))
            .expect("The largest action always has a positive weight");
        actions[dist.sample(rng)]
    }
}
