use crate::{ensure_interval, env::Environment, error::Result, exp::Exp};

use super::QTable;

/// Off-policy temporal-difference control
///
/// Q(s,a) ← Q(s,a) + α(r + γ max<sub>a'</sub> Q(s',a') - Q(s,a))
///
/// The target bootstraps on the best action in the next state regardless of what the
/// exploration policy does next. A terminal `next_state` contributes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct QLearning {
    alpha: f32, // learning rate
    gamma: f32, // discount factor
}

impl QLearning {
    /// ### Parameters
    /// - `alpha` - The learning rate - must be in `(0, 1]`
    /// - `gamma` - The discount factor - must be in `[0, 1]`
    pub fn new(alpha: f32, gamma: f32) -> Result<Self> {
        ensure_interval!(alpha, above 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        Ok(Self { alpha, gamma })
    }

    pub fn update<E: Environment>(&self, table: &mut QTable, exp: Exp<E>) {
        let Exp {
            state,
            action,
            reward,
            next_state,
            done,
        } = exp;
        let (state, action): (usize, usize) = (state.into(), action.into());

        let q_value = table[(state, action)];
        let target = if done {
            reward
        } else {
            reward + self.gamma * table.max(Into::<usize>::into(next_state))
        };
        table[(state, action)] += self.alpha * (target - q_value);
    }
}
