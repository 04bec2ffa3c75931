use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decay::Geometric,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    error::Result,
    exp::Exp,
    exploration::{ActionSelection, Strategy},
};

use super::tabular::{Learner, QTable, UpdateRule};

/// Epsilon at the start of every training run
pub const EPSILON_START: f32 = 1.0;

/// Multiplicative epsilon decay applied after every episode
pub const EPSILON_DECAY: f32 = 0.98;

/// Epsilon never decays below this
pub const EPSILON_FLOOR: f32 = 0.05;

/// Configuration for the [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Number of episodes in a [`run`](Trainer::run)
    ///
    /// **Default**: `1000`
    pub episodes: u32,
    /// Learning rate, in `(0, 1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor, in `[0, 1]`
    ///
    /// **Default**: `0.95`
    pub gamma: f32,
    /// **Default**: [`UpdateRule::QLearning`]
    pub rule: UpdateRule,
    /// **Default**: epsilon greedy
    pub strategy: Strategy,
    /// Seed for the trainer's own RNG, used by the exploration strategy
    ///
    /// **Default**: `0`
    pub seed: u64,
    /// Cut an episode off after this many steps
    ///
    /// Only needed for maps where a terminal cell may be unreachable.
    ///
    /// **Default**: `None`
    pub step_limit: Option<u32>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            alpha: 0.1,
            gamma: 0.95,
            rule: UpdateRule::QLearning,
            strategy: Strategy::default(),
            seed: 0,
            step_limit: None,
        }
    }
}

/// Progress of a single episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Running,
    Terminated,
}

impl EpisodeStatus {
    fn after_step(done: bool) -> Self {
        if done {
            EpisodeStatus::Terminated
        } else {
            EpisodeStatus::Running
        }
    }
}

/// Outcome of one training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub steps: u32,
    pub reward: f32,
    /// Epsilon used during the episode, before the end-of-episode decay
    pub epsilon: f32,
}

/// Drives episodes of temporal-difference learning over a tabular environment
///
/// The trainer is the only owner of the value table and of epsilon. Each step the
/// exploration strategy picks an action, the environment is stepped, and the learner
/// updates the table in place. After every episode epsilon decays by [`EPSILON_DECAY`]
/// down to [`EPSILON_FLOOR`], whichever strategy is in use.
pub struct Trainer {
    table: QTable,
    learner: Learner,
    strategy: Strategy,
    schedule: Geometric,
    epsilon: f32,
    episodes: u32,
    episode: u32,
    step_limit: Option<u32>,
    rng: StdRng,
}

impl Trainer {
    /// Initialize a trainer with a zeroed table sized for `env`
    ///
    /// **Errors** if `alpha` or `gamma` is out of range
    pub fn new<E>(env: &E, config: TrainerConfig) -> Result<Self>
    where
        E: DiscreteActionSpace + DiscreteStateSpace,
    {
        let learner = Learner::new(config.rule, config.alpha, config.gamma)?;
        let schedule = Geometric::new(EPSILON_DECAY, EPSILON_START, EPSILON_FLOOR)?;
        Ok(Self {
            table: QTable::new(env.num_states(), env.actions().len()),
            learner,
            strategy: config.strategy,
            epsilon: schedule.initial(),
            schedule,
            episodes: config.episodes,
            episode: 0,
            step_limit: config.step_limit,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Number of episodes completed
    pub fn episode(&self) -> u32 {
        self.episode
    }

    fn act<E: DiscreteActionSpace>(&mut self, env: &mut E, state: E::State) -> E::Action {
        self.strategy
            .choose(env, &mut self.rng, &self.table, state, self.epsilon)
    }

    fn limit_reached(&self, steps: u32) -> bool {
        self.step_limit.is_some_and(|limit| steps >= limit)
    }

    /// Run a single episode, then decay epsilon
    pub fn go<E: DiscreteActionSpace>(&mut self, env: &mut E) -> EpisodeSummary {
        let mut summary = EpisodeSummary {
            steps: 0,
            reward: 0.0,
            epsilon: self.epsilon,
        };

        let mut state = env.reset();
        let mut action = self.act(env, state);
        let mut status = EpisodeStatus::Running;
        while status == EpisodeStatus::Running {
            let (next_state, reward, done) = env.step(action);
            let exp = Exp::<E> {
                state,
                action,
                reward,
                next_state,
                done,
            };

            // SARSA bootstraps on a', so it is chosen before the update and reused next step
            let next_action = match self.learner {
                Learner::Sarsa(_) => {
                    let next_action = self.act(env, next_state);
                    self.learner.update(&mut self.table, exp, next_action);
                    next_action
                }
                Learner::QLearning(_) => {
                    self.learner.update(&mut self.table, exp, action);
                    if done {
                        action
                    } else {
                        self.act(env, next_state)
                    }
                }
            };

            summary.steps += 1;
            summary.reward += reward;
            state = next_state;
            action = next_action;
            status = EpisodeStatus::after_step(done);
            if self.limit_reached(summary.steps) {
                break;
            }
        }

        self.episode += 1;
        self.epsilon = self.schedule.next(self.epsilon);
        debug!(
            "Episode {} finished after {} steps with reward {} (epsilon {:.4})",
            self.episode, summary.steps, summary.reward, summary.epsilon
        );
        summary
    }

    /// Run the configured number of episodes and return the trained table
    pub fn run<E: DiscreteActionSpace>(mut self, env: &mut E) -> QTable {
        let mut successes = 0;
        for _ in 0..self.episodes {
            if self.go(env).reward > 0.0 {
                successes += 1;
            }
        }
        info!(
            "{} training finished: {} episodes, {} rewarded, final epsilon {:.4}",
            self.learner.rule(),
            self.episode,
            successes,
            self.epsilon
        );
        self.table
    }
}

/// Train a fresh value table on `env`
///
/// The trainer RNG is seeded with `0`; use [`Trainer`] directly for other seeds,
/// the SARSA rule, or a step limit.
///
/// **Errors** if `alpha` or `gamma` is out of range
pub fn train<E>(
    env: &mut E,
    episodes: u32,
    alpha: f32,
    gamma: f32,
    strategy: Strategy,
) -> Result<QTable>
where
    E: DiscreteActionSpace + DiscreteStateSpace,
{
    let config = TrainerConfig {
        episodes,
        alpha,
        gamma,
        strategy,
        ..Default::default()
    };
    Ok(Trainer::new(&*env, config)?.run(env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        env::tests::MockEnv,
        error::Error,
        eval::{Evaluator, Policy},
        gym::{GlassBridge, Layout},
    };

    fn config(rule: UpdateRule, strategy: Strategy, seed: u64) -> TrainerConfig {
        TrainerConfig {
            episodes: 2000,
            alpha: 0.5,
            gamma: 0.9,
            rule,
            strategy,
            seed,
            step_limit: None,
        }
    }

    #[test]
    fn trainer_rejects_bad_hyperparameters() {
        let env = MockEnv::new();
        let bad_alpha = TrainerConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Trainer::new(&env, bad_alpha),
            Err(Error::OutOfRange { name: "alpha", .. })
        ));
        let bad_gamma = TrainerConfig {
            gamma: 1.5,
            rule: UpdateRule::Sarsa,
            ..Default::default()
        };
        assert!(matches!(
            Trainer::new(&env, bad_gamma),
            Err(Error::OutOfRange { name: "gamma", .. })
        ));
    }

    #[test]
    fn trainer_starts_zeroed() {
        let env = GlassBridge::from_layout(Layout::Five, 0).unwrap();
        let trainer = Trainer::new(&env, TrainerConfig::default()).unwrap();
        assert_eq!(trainer.table(), &QTable::new(10, 2), "zero table");
        assert_eq!(trainer.epsilon(), EPSILON_START, "epsilon starts at 1");
        assert_eq!(trainer.episode(), 0, "no episodes yet");
    }

    #[test]
    fn epsilon_decays_to_floor() {
        let mut env = GlassBridge::from_layout(Layout::Five, 1).unwrap();
        for strategy in ["epsilon-greedy", "softmax", "posterior-sampling", "random"] {
            let strategy = strategy.parse().unwrap();
            let mut trainer = Trainer::new(&env, config(UpdateRule::QLearning, strategy, 1)).unwrap();
            let mut previous = trainer.epsilon();
            for _ in 0..300 {
                let summary = trainer.go(&mut env);
                assert_eq!(summary.epsilon, previous, "summary reports epsilon in use");
                assert!(trainer.epsilon() <= previous, "non-increasing");
                assert!(trainer.epsilon() >= EPSILON_FLOOR, "never below floor");
                previous = trainer.epsilon();
            }
            assert_eq!(trainer.epsilon(), EPSILON_FLOOR, "floor reached");
            assert_eq!(trainer.episode(), 300, "episodes counted");
        }
    }

    #[test]
    fn first_decay_is_multiplicative() {
        let mut env = MockEnv::new();
        let mut trainer = Trainer::new(&env, TrainerConfig::default()).unwrap();
        trainer.go(&mut env);
        assert_eq!(trainer.epsilon(), EPSILON_START * EPSILON_DECAY);
    }

    #[test]
    fn episode_ends_on_done() {
        let mut env = GlassBridge::from_layout(Layout::Eight, 2).unwrap();
        let mut trainer = Trainer::new(&env, TrainerConfig::default()).unwrap();
        for _ in 0..50 {
            let summary = trainer.go(&mut env);
            assert!(summary.steps >= 1, "at least one step");
            assert!(summary.steps <= 8, "one column per step, done by the far edge");
            assert!(env.cell(env.state()).is_terminal(), "stopped on a terminal cell");
            assert!(summary.reward == 0.0 || summary.reward == 1.0, "reward at most once");
        }
    }

    #[test]
    fn step_limit_truncates() {
        // Both far-edge panes are safe, so nothing terminates once there
        let mut env = GlassBridge::new(&["SO", "OO"], 3).unwrap();
        let config = TrainerConfig {
            step_limit: Some(25),
            ..Default::default()
        };
        let mut trainer = Trainer::new(&env, config).unwrap();
        assert_eq!(trainer.go(&mut env).steps, 25, "stopped at the limit");
    }

    #[test]
    fn q_learning_learns_the_mock_chain() {
        let mut env = MockEnv::new();
        let table = train(&mut env, 200, 0.5, 0.9, Strategy::epsilon_greedy()).unwrap();
        assert!(table[(0, 1)] > 0.9, "terminating action valued near 1");
        assert!(table[(0, 0)] < table[(0, 1)], "staying is worth less");
        assert_eq!(table.row(1), [0.0, 0.0], "terminal state never updated");
    }

    #[test]
    fn sarsa_learns_the_mock_chain() {
        let mut env = MockEnv::new();
        let config = TrainerConfig {
            episodes: 200,
            alpha: 0.5,
            gamma: 0.9,
            rule: UpdateRule::Sarsa,
            ..Default::default()
        };
        let table = Trainer::new(&env, config).unwrap().run(&mut env);
        assert!(table[(0, 1)] > 0.9, "terminating action valued near 1");
        assert!(table[(0, 0)] < table[(0, 1)], "staying is worth less");
    }

    /// Entries a training run moved away from zero
    fn updated_entries(table: &QTable) -> usize {
        (0..table.num_states())
            .flat_map(|s| table.row(s).iter().copied())
            .filter(|&v| v != 0.0)
            .count()
    }

    #[test]
    fn same_seeds_same_table() {
        for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
            for strategy in ["epsilon-greedy", "softmax", "posterior-sampling"] {
                let run = || {
                    let mut env = GlassBridge::from_layout(Layout::Five, 42).unwrap();
                    let config = TrainerConfig {
                        episodes: 500,
                        rule,
                        strategy: strategy.parse().unwrap(),
                        seed: 9,
                        ..Default::default()
                    };
                    Trainer::new(&env, config).unwrap().run(&mut env)
                };
                let table = run();
                assert!(
                    updated_entries(&table) > 1,
                    "{rule} with {strategy} learned something: {table:?}"
                );
                assert_eq!(table, run(), "{rule} with {strategy} is reproducible");
            }
        }
    }

    #[test]
    fn different_seeds_differ() {
        let run = |seed| {
            let mut env = GlassBridge::from_layout(Layout::Five, seed).unwrap();
            let config = TrainerConfig {
                episodes: 500,
                seed,
                ..Default::default()
            };
            Trainer::new(&env, config).unwrap().run(&mut env)
        };
        let (first, second) = (run(1), run(2));
        assert!(updated_entries(&first) > 0, "seed 1 learned something");
        assert!(updated_entries(&second) > 0, "seed 2 learned something");
        assert_ne!(first, second, "seeds change the trajectory");
    }

    const SEEDS: u64 = 5;

    /// Greedy success rate of a table trained on the 5x2 bridge, averaged over seeds
    fn greedy_success_rate(rule: UpdateRule, strategy: &str) -> f32 {
        let evaluator = Evaluator {
            episodes: 1000,
            ..Default::default()
        };
        let total: f32 = (0..SEEDS)
            .map(|seed| {
                let mut env = GlassBridge::from_layout(Layout::Five, seed).unwrap();
                let config = config(rule, strategy.parse().unwrap(), seed);
                let table = Trainer::new(&env, config).unwrap().run(&mut env);
                evaluator
                    .evaluate(&mut env, &Policy::Greedy(&table))
                    .success_rate()
            })
            .sum();
        total / SEEDS as f32
    }

    fn random_success_rate() -> f32 {
        let evaluator = Evaluator {
            episodes: 1000,
            ..Default::default()
        };
        let mut env = GlassBridge::from_layout(Layout::Five, 100).unwrap();
        evaluator.evaluate(&mut env, &Policy::Random).success_rate()
    }

    #[test]
    fn q_learning_beats_random_baseline() {
        // Best possible is 0.8^4 ≈ 0.41, random is 0.5^4 ≈ 0.06
        let baseline = random_success_rate();
        let learned = greedy_success_rate(UpdateRule::QLearning, "epsilon-greedy");
        assert!(
            learned > baseline + 0.1,
            "greedy success {learned} should clearly beat random {baseline}"
        );
    }

    #[test]
    fn sarsa_beats_random_baseline() {
        let baseline = random_success_rate();
        let learned = greedy_success_rate(UpdateRule::Sarsa, "epsilon-greedy");
        assert!(
            learned > baseline + 0.1,
            "greedy success {learned} should clearly beat random {baseline}"
        );
    }
}
