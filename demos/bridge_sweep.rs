use std::{env, error::Error, fs, path::Path};

use bridge_rl::{
    algo::{tabular::UpdateRule, Trainer, TrainerConfig},
    eval::{Evaluator, Policy},
    exploration::Strategy,
    gym::{GlassBridge, Layout},
};

const NUM_EPISODES: u32 = 1000;
const GRID_POINTS: u32 = 21;

/// Usage: `bridge_sweep [layout] [rule] [strategy]`, e.g. `bridge_sweep 8x2 sarsa softmax`
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let layout = Layout::by_name(&args.next().unwrap_or_else(|| "5x2".to_string()))?;
    let rule = UpdateRule::by_name(&args.next().unwrap_or_else(|| "q-learning".to_string()))?;
    let strategy: Strategy = args
        .next()
        .unwrap_or_else(|| "epsilon-greedy".to_string())
        .parse()?;

    let path = Path::new("demos/out");
    fs::create_dir_all(path)?;

    let mut wtr = csv::Writer::from_path(path.join(format!("sweep_{layout}_{rule}_{strategy}.csv")))?;
    wtr.write_record(["alpha", "gamma", "success_rate"])?;

    let grid = (0..GRID_POINTS)
        .map(|i| i as f32 / (GRID_POINTS - 1) as f32)
        .collect::<Vec<_>>();

    let evaluator = Evaluator::default();
    let mut best = (0.0, 0.0, f32::NEG_INFINITY);

    // A zero learning rate never updates the table, so the sweep starts one step in
    for &alpha in &grid[1..] {
        for &gamma in &grid {
            let mut env = GlassBridge::from_layout(layout, 0)?;
            let config = TrainerConfig {
                episodes: NUM_EPISODES,
                alpha,
                gamma,
                rule,
                strategy: strategy.clone(),
                ..Default::default()
            };
            let table = Trainer::new(&env, config)?.run(&mut env);
            let rate = evaluator
                .evaluate(&mut env, &Policy::Greedy(&table))
                .success_rate();

            wtr.write_record(&[alpha.to_string(), gamma.to_string(), rate.to_string()])?;
            if rate > best.2 {
                best = (alpha, gamma, rate);
            }
        }
    }

    wtr.flush()?;

    println!(
        "{layout} {rule} {strategy}: best alpha {:.2}, gamma {:.2}, success {:.1}%",
        best.0,
        best.1,
        best.2 * 100.0
    );

    Ok(())
}
