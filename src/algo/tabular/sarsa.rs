use crate::{ensure_interval, env::Environment, error::Result, exp::Exp};

use super::QTable;

/// On-policy temporal-difference control
///
/// Q(s,a) ← Q(s,a) + α(r + γ Q(s',a') - Q(s,a))
///
/// `a'` is the action the exploration policy has already chosen for `s'`; the caller
/// must take that same action on the next step. A terminal `next_state` contributes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Sarsa {
    alpha: f32,
    gamma: f32,
}

impl Sarsa {
    /// ### Parameters
    /// - `alpha` - The learning rate - must be in `(0, 1]`
    /// - `gamma` - The discount factor - must be in `[0, 1]`
    pub fn new(alpha: f32, gamma: f32) -> Result<Self> {
        ensure_interval!(alpha, above 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        Ok(Self { alpha, gamma })
    }

    pub fn update<E: Environment>(&self, table: &mut QTable, exp: Exp<E>, next_action: E::Action) {
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
            let next = (Into::<usize>::into(next_state), Into::<usize>::into(next_action));
            reward + self.gamma * table[next]
        };
        table[(state, action)] += self.alpha * (target - q_value);
    }
}
