/// Tabular value estimates and the update rules that write to them
pub mod tabular;

/// Episode loop driving a learner through an environment
pub mod trainer;

pub use trainer::{train, EpisodeStatus, EpisodeSummary, Trainer, TrainerConfig};
