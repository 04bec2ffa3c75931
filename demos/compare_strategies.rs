use std::{env, error::Error};

use bridge_rl::{
    algo::{tabular::UpdateRule, Trainer, TrainerConfig},
    eval::{Evaluator, Policy},
    exploration::Strategy,
    gym::{GlassBridge, Layout},
};

const NUM_EPISODES: u32 = 2000;
const ALPHA: f32 = 0.5;
const GAMMA: f32 = 0.9;

const STRATEGIES: [&str; 4] = ["random", "epsilon-greedy", "softmax", "posterior-sampling"];

/// Usage: `compare_strategies [layout]`
fn main() -> Result<(), Box<dyn Error>> {
    let layout = Layout::by_name(&env::args().nth(1).unwrap_or_else(|| "5x2".to_string()))?;
    let evaluator = Evaluator::default();

    let mut env = GlassBridge::from_layout(layout, 0)?;
    let baseline = evaluator.evaluate(&mut env, &Policy::Random);
    println!(
        "{layout} no learning: {:.1}% success, wins by position {:?}",
        baseline.success_rate() * 100.0,
        baseline.position_wins
    );

    for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
        for name in STRATEGIES {
            let mut env = GlassBridge::from_layout(layout, 0)?;
            let config = TrainerConfig {
                episodes: NUM_EPISODES,
                alpha: ALPHA,
                gamma: GAMMA,
                rule,
                strategy: name.parse::<Strategy>()?,
                ..Default::default()
            };
            let table = Trainer::new(&env, config)?.run(&mut env);
            let evaluation = evaluator.evaluate(&mut env, &Policy::Greedy(&table));

            println!(
                "{layout} {rule} {name}: {:.1}% success, wins by position {:?}",
                evaluation.success_rate() * 100.0,
                evaluation.position_wins
            );
        }
    }

    Ok(())
}
