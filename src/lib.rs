/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Crate error type
pub mod error;

/// Rolling out trained and baseline policies
pub mod eval;

/// Single transitions observed by an agent
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

mod util;

pub use error::{Error, Result};
