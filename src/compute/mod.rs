//! Compute module - Grid state, transition rule, and the run driver.

mod grid;
mod propagator;
mod rule;
mod stack;

pub use grid::*;
pub use propagator::*;
pub use rule::*;
pub use stack::*;
