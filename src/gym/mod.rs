pub mod glass_bridge;

pub use glass_bridge::{Action, Cell, GlassBridge, Layout, Transition};
