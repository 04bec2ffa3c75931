use crate::env::Environment;

/// Represents a single experience or transition in the environment
pub struct Exp<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The action taken in the given state
    pub action: E::Action,
    /// The reward received after taking the action
    pub reward: f32,
    /// The state of the environment after the action is taken
    pub next_state: E::State,
    /// Whether `next_state` ends the episode
    pub done: bool,
}

impl<E: Environment> Clone for Exp<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Environment> Copy for Exp<E> {}

impl<E: Environment> std::fmt::Debug for Exp<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exp")
            .field("state", &Into::<usize>::into(self.state))
            .field("action", &Into::<usize>::into(self.action))
            .field("reward", &self.reward)
            .field("next_state", &Into::<usize>::into(self.next_state))
            .field("done", &self.done)
            .finish()
    }
}
