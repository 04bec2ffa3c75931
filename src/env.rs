/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space. States and actions convert into the
/// row and column indices of a [`QTable`](crate::algo::tabular::QTable).
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy + Into<usize>;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy + Into<usize>;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Sample an action uniformly from the action space
    fn random_action(&mut self) -> Self::Action;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions, ordered by their table index
    ///
    /// The returned vector should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// An environment with a finite, enumerable set of states
pub trait DiscreteStateSpace: Environment {
    /// Number of states; every state converts to an index below this
    fn num_states(&self) -> usize;
}
