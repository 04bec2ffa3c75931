use thiserror::Error;

/// Errors raised while building environments, configuring training, or stepping
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The bridge map has no rows, or its rows have no cells
    #[error("bridge map must contain at least one row and one column")]
    EmptyMap,

    /// A row of the bridge map has a different length than the first row
    #[error("row {row} of the bridge map has {found} cells, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character in the bridge map is not one of `S`, `O`, `-`, `G`
    #[error("unknown cell code `{0}`, expected one of `S`, `O`, `-`, `G`")]
    UnknownCell(char),

    /// The bridge map has no start cell, so no initial state can be drawn
    #[error("bridge map contains no start cell")]
    NoStartCell,

    /// No built-in layout has the requested name
    #[error("unknown bridge layout `{0}`")]
    UnknownLayout(String),

    /// A numeric hyperparameter lies outside its valid interval
    #[error("invalid value for `{name}`: {value}. Must be in the interval {interval}.")]
    OutOfRange {
        name: &'static str,
        value: f64,
        interval: String,
    },

    /// An exploration strategy descriptor did not name a known strategy
    #[error("unknown exploration strategy `{0}`")]
    UnknownStrategy(String),

    /// An update rule descriptor did not name a known learner
    #[error("unknown update rule `{0}`")]
    UnknownUpdateRule(String),

    /// An action index outside the legal action set
    #[error("action {0} is outside the legal action set")]
    InvalidAction(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
