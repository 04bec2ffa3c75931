pub mod q_learning;
pub mod sarsa;

use std::ops::{Index, IndexMut};

use strum::{Display, EnumString};

use crate::{
    env::Environment,
    error::{Error, Result},
    exp::Exp,
    util::argmax,
};

pub use q_learning::QLearning;
pub use sarsa::Sarsa;

/// A dense table of state-action values
///
/// Every `(state, action)` pair has an entry, initialized to zero. Index with
/// `table[(state, action)]`, where both are table indices.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f32>,
    num_actions: usize,
}

impl QTable {
    /// A zeroed table for `num_states` states and `num_actions` actions
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        Self {
            values: vec![0.0; num_states * num_actions],
            num_actions,
        }
    }

    pub fn num_states(&self) -> usize {
        self.values.len().checked_div(self.num_actions).unwrap_or(0)
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Value of taking `action` in `state`
    pub fn get(&self, state: impl Into<usize>, action: impl Into<usize>) -> f32 {
        self[(Into::<usize>::into(state), Into::<usize>::into(action))]
    }

    /// Values of every action in `state`, in action index order
    ///
    /// **Panics** if `state` is out of range
    pub fn row(&self, state: usize) -> &[f32] {
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    /// Largest action value in `state`
    pub fn max(&self, state: usize) -> f32 {
        self.row(state)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Action index with the largest value in `state`, lowest index among ties
    pub fn greedy(&self, state: usize) -> usize {
        argmax(self.row(state).iter().copied()).expect("A table has at least one action")
    }

    /// A copy of the table scaled so that its largest entry is 1
    ///
    /// Tables whose largest entry is not positive are returned unchanged.
    pub fn normalize(&self) -> Self {
        let max = self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut table = self.clone();
        if max > 0.0 {
            table.values.iter_mut().for_each(|v| *v /= max);
        }
        table
    }
}

impl Index<(usize, usize)> for QTable {
    type Output = f32;

    fn index(&self, (state, action): (usize, usize)) -> &Self::Output {
        assert!(action < self.num_actions, "action {action} out of range");
        &self.values[state * self.num_actions + action]
    }
}

impl IndexMut<(usize, usize)> for QTable {
    fn index_mut(&mut self, (state, action): (usize, usize)) -> &mut Self::Output {
        assert!(action < self.num_actions, "action {action} out of range");
        &mut self.values[state * self.num_actions + action]
    }
}

/// Which temporal-difference rule a learner applies
#[derive(EnumString, Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateRule {
    /// Off-policy: bootstrap on the best next action
    #[strum(serialize = "q-learning")]
    QLearning,
    /// On-policy: bootstrap on the next action actually taken
    #[strum(serialize = "sarsa")]
    Sarsa,
}

impl UpdateRule {
    /// Look up a rule by name (`q-learning` or `sarsa`)
    ///
    /// **Errors** with [`Error::UnknownUpdateRule`] for any other name
    pub fn by_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::UnknownUpdateRule(name.to_string()))
    }
}

/// A temporal-difference learner with validated hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub enum Learner {
    QLearning(QLearning),
    Sarsa(Sarsa),
}

impl Learner {
    /// **Errors** if `alpha` is not in `(0, 1]` or `gamma` is not in `[0, 1]`
    pub fn new(rule: UpdateRule, alpha: f32, gamma: f32) -> Result<Self> {
        Ok(match rule {
            UpdateRule::QLearning => Learner::QLearning(QLearning::new(alpha, gamma)?),
            UpdateRule::Sarsa => Learner::Sarsa(Sarsa::new(alpha, gamma)?),
        })
    }

    pub fn rule(&self) -> UpdateRule {
        match self {
            Learner::QLearning(_) => UpdateRule::QLearning,
            Learner::Sarsa(_) => UpdateRule::Sarsa,
        }
    }

    /// Apply the update for `exp`
    ///
    /// `next_action` is only read by SARSA, which needs the action the policy will take
    /// from `exp.next_state`.
    pub fn update<E: Environment>(&self, table: &mut QTable, exp: Exp<E>, next_action: E::Action) {
        match self {
            Learner::QLearning(learner) => learner.update(table, exp),
            Learner::Sarsa(learner) => learner.update(table, exp, next_action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_table_functional() {
        let mut table = QTable::new(3, 2);
        assert_eq!(table.num_states(), 3, "state count");
        assert_eq!(table.num_actions(), 2, "action count");
        assert!(table.row(2).iter().all(|&v| v == 0.0), "zero initialized");

        table[(1, 1)] = 0.5;
        table[(1, 0)] = -0.25;
        assert_eq!(table.get(1usize, 1usize), 0.5, "write visible");
        assert_eq!(table.row(1), [-0.25, 0.5], "row view");
        assert_eq!(table.max(1), 0.5, "row max");
        assert_eq!(table.greedy(1), 1, "greedy picks max");
        assert_eq!(table.greedy(0), 0, "ties go to lowest index");
    }

    #[test]
    #[should_panic]
    fn q_table_rejects_out_of_range_action() {
        let table = QTable::new(3, 2);
        let _ = table[(0, 2)];
    }

    #[test]
    fn q_table_normalize() {
        let mut table = QTable::new(2, 2);
        table[(0, 0)] = 2.0;
        table[(1, 1)] = 0.5;
        let normalized = table.normalize();
        assert_eq!(normalized.row(0), [1.0, 0.0], "scaled by max");
        assert_eq!(normalized.row(1), [0.0, 0.25], "scaled by max");

        let mut negative = QTable::new(1, 2);
        negative[(0, 0)] = -1.0;
        assert_eq!(negative.normalize(), negative, "non-positive max untouched");
    }

    #[test]
    fn update_rule_by_name() {
        assert_eq!(UpdateRule::by_name("sarsa"), Ok(UpdateRule::Sarsa));
        assert_eq!(UpdateRule::by_name("q-learning"), Ok(UpdateRule::QLearning));
        assert_eq!(
            UpdateRule::by_name("td-lambda"),
            Err(Error::UnknownUpdateRule("td-lambda".to_string()))
        );
    }

    #[test]
    fn learner_validates_hyperparameters() {
        assert!(Learner::new(UpdateRule::QLearning, 0.5, 0.9).is_ok());
        assert!(Learner::new(UpdateRule::Sarsa, 1.0, 0.0).is_ok(), "closed bounds");
        assert!(Learner::new(UpdateRule::QLearning, 0.0, 0.9).is_err(), "alpha 0");
        assert!(Learner::new(UpdateRule::Sarsa, 1.1, 0.9).is_err(), "alpha > 1");
        assert!(Learner::new(UpdateRule::QLearning, 0.5, -0.1).is_err(), "gamma < 0");
        assert!(Learner::new(UpdateRule::Sarsa, 0.5, 1.5).is_err(), "gamma > 1");
        assert_eq!(
            Learner::new(UpdateRule::Sarsa, 0.5, 0.9).unwrap().rule(),
            UpdateRule::Sarsa
        );
    }
}
