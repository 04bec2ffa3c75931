use log::{info, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use strum::{Display, EnumString, VariantArray};

use crate::{
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment},
    error::{Error, Result},
};

/// Probability that the chosen action is the one performed
pub const INTENDED_PROB: f32 = 0.8;

/// Probability that the opposite action is performed instead
pub const SLIP_PROB: f32 = 0.2;

/// A single pane of the bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Starting platform, safe
    Start,
    /// Tempered glass, safe
    Safe,
    /// Thin glass, breaks and ends the episode
    Fail,
    /// Far side of the bridge, ends the episode with a reward of 1
    Goal,
}

impl Cell {
    /// Fail and goal cells end the episode
    pub fn is_terminal(self) -> bool {
        matches!(self, Cell::Fail | Cell::Goal)
    }

    /// The map character for this cell
    pub fn code(self) -> char {
        match self {
            Cell::Start => 'S',
            Cell::Safe => 'O',
            Cell::Fail => '-',
            Cell::Goal => 'G',
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'S' => Ok(Cell::Start),
            'O' => Ok(Cell::Safe),
            '-' => Ok(Cell::Fail),
            'G' => Ok(Cell::Goal),
            other => Err(Error::UnknownCell(other)),
        }
    }
}

#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move one column forward in the same row
    Advance = 0,
    /// Move one column forward and switch rows
    Diagonal = 1,
}

impl Action {
    /// The action performed when the footing slips
    pub fn opposite(self) -> Self {
        match self {
            Action::Advance => Action::Diagonal,
            Action::Diagonal => Action::Advance,
        }
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Action::VARIANTS
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction(index))
    }
}

/// One possible outcome of taking an action in a state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub prob: f32,
    pub next_state: usize,
    pub reward: f32,
    pub done: bool,
}

/// Built-in bridge layouts, named by `columns x rows`
#[derive(EnumString, Display, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    #[strum(serialize = "5x2")]
    Five,
    #[strum(serialize = "8x2")]
    Eight,
    #[strum(serialize = "10x2")]
    Ten,
    #[strum(serialize = "12x2")]
    Twelve,
}

impl Layout {
    /// Look up a layout by its name, e.g. `"8x2"`
    ///
    /// **Errors** with [`Error::UnknownLayout`] for any other name
    pub fn by_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::UnknownLayout(name.to_string()))
    }

    /// The two map rows of this layout, top row first
    pub fn rows(self) -> [&'static str; 2] {
        match self {
            Layout::Five => ["SO--G", "--OO-"],
            Layout::Eight => ["SO--O-O-", "--OO-O-G"],
            Layout::Ten => ["--------O-", "SOOOOOOO-G"],
            Layout::Twelve => ["--OO-O--OO-G", "SO--O-OO--O-"],
        }
    }
}

/// The glass bridge: a grid of panes crossed one column at a time
///
/// Every step moves one column forward, either in the same row ([`Action::Advance`]) or
/// switching rows ([`Action::Diagonal`]). Footing is imperfect: the chosen action happens
/// with probability [`INTENDED_PROB`] and its opposite with probability [`SLIP_PROB`].
/// Landing on a [`Cell::Fail`] or [`Cell::Goal`] ends the episode, and only landing on a goal
/// pays a reward. The transition table is computed once at construction.
///
/// States are `row * cols + col`. All sampling uses an RNG owned by the environment, so
/// equal seeds reproduce equal trajectories.
pub struct GlassBridge {
    map: Vec<Cell>,
    rows: usize,
    cols: usize,
    transitions: Vec<[Vec<Transition>; 2]>,
    starts: Vec<usize>,
    state: usize,
    rng: StdRng,
}

impl GlassBridge {
    /// Build a bridge from map rows of cell codes (`S`, `O`, `-`, `G`); whitespace is ignored
    ///
    /// **Errors** if the map is empty, ragged, has an unknown code, or has no start cell
    pub fn new<R: AsRef<str>>(map: &[R], seed: u64) -> Result<Self> {
        let cells = map
            .iter()
            .map(|row| {
                row.as_ref()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Cell::try_from)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(cells, seed)
    }

    /// Build one of the built-in [layouts](Layout)
    pub fn from_layout(layout: Layout, seed: u64) -> Result<Self> {
        Self::new(&layout.rows(), seed)
    }

    /// Build a bridge from a rectangular grid of cells
    pub fn from_cells(grid: Vec<Vec<Cell>>, seed: u64) -> Result<Self> {
        let rows = grid.len();
        if grid.iter().all(Vec::is_empty) {
            return Err(Error::EmptyMap);
        }
        let cols = grid[0].len();
        if let Some((row, found)) = grid
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(Error::RaggedMap {
                row,
                expected: cols,
                found,
            });
        }

        let map = grid.into_iter().flatten().collect::<Vec<_>>();
        let starts = map
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Start)
            .map(|(s, _)| s)
            .collect::<Vec<_>>();
        if starts.is_empty() {
            return Err(Error::NoStartCell);
        }

        let mut env = Self {
            map,
            rows,
            cols,
            transitions: Vec::new(),
            state: starts[0],
            starts,
            rng: StdRng::seed_from_u64(seed),
        };
        let transitions = (0..rows * cols)
            .map(|s| [Action::Advance, Action::Diagonal].map(|a| env.outcomes(s, a)))
            .collect();
        env.transitions = transitions;

        info!(
            "Built {}x{} glass bridge with {} start cell(s)",
            cols,
            rows,
            env.starts.len()
        );
        Ok(env)
    }

    /// Possible outcomes of taking `action` in `state`
    fn outcomes(&self, state: usize, action: Action) -> Vec<Transition> {
        if self.map[state].is_terminal() {
            return vec![Transition {
                prob: 1.0,
                next_state: state,
                reward: 0.0,
                done: true,
            }];
        }

        [(INTENDED_PROB, action), (SLIP_PROB, action.opposite())]
            .into_iter()
            .map(|(prob, performed)| {
                let next_state = self.destination(state, performed);
                let cell = self.map[next_state];
                Transition {
                    prob,
                    next_state,
                    reward: if cell == Cell::Goal { 1.0 } else { 0.0 },
                    done: cell.is_terminal(),
                }
            })
            .collect()
    }

    /// The state reached by performing `action` in `state`
    ///
    /// The column is clamped to the far edge; a diagonal swaps rows 0 and 1 and leaves any
    /// other row in place.
    fn destination(&self, state: usize, action: Action) -> usize {
        let (row, col) = self.position(state);
        let col = (col + 1).min(self.cols - 1);
        let row = match (action, row) {
            (Action::Diagonal, 0) if self.rows > 1 => 1,
            (Action::Diagonal, 1) => 0,
            _ => row,
        };
        self.to_state(row, col)
    }

    /// Take a step with a raw action index
    ///
    /// **Errors** with [`Error::InvalidAction`] if `index` is not a legal action
    pub fn step_index(&mut self, index: usize) -> Result<(usize, f32, bool)> {
        let action = Action::try_from(index)?;
        Ok(self.step(action))
    }

    /// Alias for [`Environment::random_action`]
    pub fn sample_action(&mut self) -> Action {
        self.random_action()
    }

    /// Recorded outcomes of taking `action` in `state`
    ///
    /// **Panics** if `state` is out of range
    pub fn transitions(&self, state: usize, action: Action) -> &[Transition] {
        &self.transitions[state][usize::from(action)]
    }

    /// Cell kind of `state`
    ///
    /// **Panics** if `state` is out of range
    pub fn cell(&self, state: usize) -> Cell {
        self.map[state]
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `(row, col)` of `state`
    pub fn position(&self, state: usize) -> (usize, usize) {
        (state / self.cols, state % self.cols)
    }

    /// State index of the pane at `(row, col)`
    pub fn to_state(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// States of all start cells; [`reset`](Environment::reset) draws uniformly from these
    pub fn start_states(&self) -> &[usize] {
        &self.starts
    }

    /// The current state
    pub fn state(&self) -> usize {
        self.state
    }
}

impl Environment for GlassBridge {
    type State = usize;
    type Action = Action;

    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool) {
        let &Transition {
            next_state,
            reward,
            done,
            ..
        } = self.transitions[self.state][usize::from(action)]
            .choose_weighted(&mut self.rng, |t| t.prob)
            .expect("Transition probabilities are positive and sum to 1");

        trace!(
            "{} --{:?}--> {} (reward {}, done {})",
            self.state,
            action,
            next_state,
            reward,
            done
        );
        self.state = next_state;
        (next_state, reward, done)
    }

    fn reset(&mut self) -> Self::State {
        self.state = *self
            .starts
            .choose(&mut self.rng)
            .expect("A bridge always has at least one start cell");
        self.state
    }

    fn random_action(&mut self) -> Self::Action {
        if self.rng.gen::<bool>() {
            Action::Diagonal
        } else {
            Action::Advance
        }
    }
}

impl DiscreteActionSpace for GlassBridge {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl DiscreteStateSpace for GlassBridge {
    fn num_states(&self) -> usize {
        self.rows * self.cols
    }
}
