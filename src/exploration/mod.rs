use std::{fmt, str::FromStr};

use rand::Rng;

use crate::{
    algo::tabular::QTable,
    env::DiscreteActionSpace,
    error::{Error, Result},
    util::argmax,
};

/// Exploration policy result
pub enum Choice {
    Explore,
    Exploit,
}

mod epsilon_greedy;
mod posterior_sampling;
mod random;
mod softmax;

pub use epsilon_greedy::EpsilonGreedy;
pub use posterior_sampling::PosteriorSampling;
pub use random::Random;
pub use softmax::Softmax;

/// Temperature of a softmax policy parsed from its name
pub const DEFAULT_TEMPERATURE: f32 = 100.0;

/// Noise of a posterior-sampling policy parsed from its name
pub const DEFAULT_NOISE: f32 = 0.1;

/// Samples per action of a posterior-sampling policy parsed from its name
pub const DEFAULT_SAMPLE_COUNT: usize = 2;

/// Select an action for the current state from a value table
pub trait ActionSelection {
    /// Choose an action in `state`
    ///
    /// ### Parameters
    /// - `env` - Source of the action set and of uniform random actions
    /// - `rng` - Source of any other randomness the policy needs
    /// - `table` - Current value estimates
    /// - `epsilon` - The trainer's current exploration rate; policies that do not blend in
    ///   random actions ignore it
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
        R: Rng + ?Sized;
}

/// The action with the largest value in `state`, lowest index among ties
pub fn greedy<E: DiscreteActionSpace>(env: &E, table: &QTable, state: E::State) -> E::Action {
    let actions = env.actions();
    let best = argmax(actions.iter().map(|&a| table.get(state, a)))
        .expect("There is always at least one action available");
    actions[best]
}

/// An exploration policy, selected by name or built with explicit parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Random(Random),
    EpsilonGreedy(EpsilonGreedy),
    Softmax(Softmax),
    PosteriorSampling(PosteriorSampling),
}

impl Strategy {
    pub fn random() -> Self {
        Strategy::Random(Random)
    }

    pub fn epsilon_greedy() -> Self {
        Strategy::EpsilonGreedy(EpsilonGreedy)
    }

    /// **Errors** if `temperature` is not finite and positive
    pub fn softmax(temperature: f32) -> Result<Self> {
        Softmax::new(temperature).map(Strategy::Softmax)
    }

    /// **Errors** if `noise` is negative or not finite, or if `sample_count` is zero
    pub fn posterior_sampling(noise: f32, sample_count: usize) -> Result<Self> {
        PosteriorSampling::new(noise, sample_count).map(Strategy::PosteriorSampling)
    }

    /// The descriptor this strategy parses from
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random(_) => "random",
            Strategy::EpsilonGreedy(_) => "epsilon-greedy",
            Strategy::Softmax(_) => "softmax",
            Strategy::PosteriorSampling(_) => "posterior-sampling",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::epsilon_greedy()
    }
}

impl ActionSelection for Strategy {
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
        match self {
            Strategy::Random(s) => s.choose(env, rng, table, state, epsilon),
            Strategy::EpsilonGreedy(s) => s.choose(env, rng, table, state, epsilon),
            Strategy::Softmax(s) => s.choose(env, rng, table, state, epsilon),
            Strategy::PosteriorSampling(s) => s.choose(env, rng, table, state, epsilon),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    /// Parses `random` (or `all-random`), `epsilon-greedy`, `softmax`, and
    /// `posterior-sampling`, using the default parameters for the latter two
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" | "all-random" => Ok(Strategy::random()),
            "epsilon-greedy" => Ok(Strategy::epsilon_greedy()),
            "softmax" => Strategy::softmax(DEFAULT_TEMPERATURE),
            "posterior-sampling" => {
                Strategy::posterior_sampling(DEFAULT_NOISE, DEFAULT_SAMPLE_COUNT)
            }
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
