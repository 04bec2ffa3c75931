use rand::Rng;

use crate::{algo::tabular::QTable, env::DiscreteActionSpace};

use super::{greedy, ActionSelection, Choice};

/// Epsilon greedy exploration policy
///
/// The threshold is supplied on every call, so the trainer's decaying epsilon drives it.
/// With probability epsilon a uniformly random action is taken, otherwise the greedy one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    /// Invoke epsilon greedy policy for threshold `epsilon`
    ///
    /// `epsilon = 0` always exploits and `epsilon = 1` always explores.
    pub fn choose_with<R: Rng + ?Sized>(&self, rng: &mut R, epsilon: f32) -> Choice {
        if rng.gen::<f32>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

impl ActionSelection for EpsilonGreedy {
    fn choose<E, R>(
        &self,
        env: &mut E,
        rng: &mut R,
        table: &QTable,
        state: E::State,
        epsilon: f32,
    ) -> E::Action
    where
        E: DiscreteActionSpace,
        R: Rng + ?Sized,
    {
        match self.choose_with(rng, epsilon) {
            Choice::Explore => env.random_action(),
            Choice::Exploit => greedy(&*env, table, state),
        }
    }
}
