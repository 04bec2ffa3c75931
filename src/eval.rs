use crate::{
    algo::tabular::QTable,
    env::DiscreteActionSpace,
    exploration::greedy,
};

/// How actions are picked during an evaluation rollout
#[derive(Debug, Clone, Copy)]
pub enum Policy<'a> {
    /// Always the highest-valued action of a trained table
    Greedy(&'a QTable),
    /// Uniformly random actions, the no-learning baseline
    Random,
}

impl Policy<'_> {
    fn act<E: DiscreteActionSpace>(&self, env: &mut E, state: E::State) -> E::Action {
        match self {
            Policy::Greedy(table) => greedy(&*env, table, state),
            Policy::Random => env.random_action(),
        }
    }
}

/// Run one episode under `policy` without learning
///
/// **Returns** the total reward of the episode
pub fn run_episode<E: DiscreteActionSpace>(
    env: &mut E,
    policy: &Policy,
    step_limit: Option<u32>,
) -> f32 {
    let mut state = env.reset();
    let mut total = 0.0;
    let mut steps = 0;
    loop {
        let action = policy.act(env, state);
        let (next_state, reward, done) = env.step(action);
        total += reward;
        steps += 1;
        state = next_state;
        if done || step_limit.is_some_and(|limit| steps >= limit) {
            return total;
        }
    }
}

/// Configuration for repeated evaluation rollouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluator {
    /// Number of rollouts
    ///
    /// **Default**: `1000`
    pub episodes: u32,
    /// Number of players taking turns on the bridge
    ///
    /// **Default**: `6`
    pub players: usize,
    /// Cut a rollout off after this many steps
    ///
    /// **Default**: `None`
    pub step_limit: Option<u32>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            episodes: 1000,
            players: 6,
            step_limit: None,
        }
    }
}

/// Results of an [`Evaluator`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub episodes: u32,
    pub successes: u32,
    /// Successes credited to each player position
    pub position_wins: Vec<u32>,
}

impl Evaluation {
    /// Fraction of rollouts that earned a reward
    pub fn success_rate(&self) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f32 / self.episodes as f32
        }
    }
}

impl Evaluator {
    /// Roll out `policy` for the configured number of episodes
    ///
    /// Players take turns: a success is credited to the current player and the turn
    /// returns to the first player; a failure passes the turn to the next player, wrapping
    /// around after the last one.
    pub fn evaluate<E: DiscreteActionSpace>(&self, env: &mut E, policy: &Policy) -> Evaluation {
        let players = self.players.max(1);
        let mut evaluation = Evaluation {
            episodes: self.episodes,
            successes: 0,
            position_wins: vec![0; players],
        };

        let mut player = 0;
        for _ in 0..self.episodes {
            if run_episode(env, policy, self.step_limit) > 0.0 {
                evaluation.successes += 1;
                evaluation.position_wins[player] += 1;
                player = 0;
            } else {
                player = (player + 1) % players;
            }
        }

        evaluation
    }
}
