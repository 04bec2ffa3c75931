use rand::Rng;

use crate::{algo::tabular::QTable, env::DiscreteActionSpace};

use super::ActionSelection;

/// Uniformly random actions regardless of the value table
///
/// This is the no-learning baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Random;

impl ActionSelection for Random {
    fn choose<E, R>(
        &self,
        env: &mut E,
        _rng: &mut R,
        _table: &QTable,
        _state: E::State,
        _epsilon: f32,
    ) -> E::Action
    where
        E: DiscreteActionSpace,
        R: Rng + ?Sized,
    {
        env.random_action()
    }
}
