//! Conway's Game of Life over NPY grids.
//!
//! A starting grid is loaded from a 2-D `.npy` file, advanced a fixed number
//! of generations, and every generation (including the first) is written to
//! a single 3-D `.npy` file of shape `(iterations + 1, rows, cols)`.
//!
//! # Architecture
//!
//! - `npy`: Memory-mapped reader and buffered writer for 1-byte NPY arrays
//! - `compute`: Grid type, B3/S23 transition rule, and the run driver
//! - `schema`: Run configuration and seed patterns
//! - `platform`: Host core counts for sizing the worker pool
//!
//! # Example
//!
//! ```rust,no_run
//! use npy_life::{LifePropagator, SimulationConfig, npy};
//!
//! let config = SimulationConfig::default();
//!
//! let grid = npy::load(&config.input)?;
//! let propagator = LifePropagator::new(&config)?;
//! let stack = propagator.run(&grid, config.iterations)?;
//! npy::save(&config.output, &stack)?;
//! # Ok::<(), npy_life::LifeError>(())
//! ```

pub mod compute;
pub mod error;
pub mod npy;
pub mod platform;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::{Grid, LifePropagator, SnapshotStack, step};
pub use error::LifeError;
pub use schema::{CellPolicy, ParallelConfig, Pattern, Seed, SimulationConfig};
