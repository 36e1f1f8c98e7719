//! Life Propagator - Main simulation driver.
//!
//! Advances a grid generation by generation and records every state.

use log::{debug, info, trace};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{Grid, SnapshotStack, step_into, step_rows};
use crate::error::{LifeError, Result};
use crate::platform;
use crate::schema::{CellPolicy, SimulationConfig};

/// Two working grids: one is read while the other is written, then they swap
/// roles by flipping `active`.
struct GridBuffers {
    cells: [Vec<u8>; 2],
    active: usize,
    rows: usize,
    cols: usize,
}

impl GridBuffers {
    fn new(initial: &Grid) -> Self {
        Self {
            cells: [initial.cells().to_vec(), vec![0u8; initial.len()]],
            active: 0,
            rows: initial.rows(),
            cols: initial.cols(),
        }
    }

    #[inline]
    fn current(&self) -> &[u8] {
        &self.cells[self.active]
    }

    /// Compute the next generation into the inactive buffer and make it current.
    fn advance(&mut self, pool: Option<&ThreadPool>) {
        let (rows, cols) = (self.rows, self.cols);
        let [a, b] = &mut self.cells;
        let (current, next) = if self.active == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        };

        match pool {
            Some(pool) => step_parallel(pool, current, next, rows, cols),
            None => step_into(current, next, rows, cols),
        }
        self.active ^= 1;
    }
}

/// Row-partitioned step: each task reads the frozen current grid and writes
/// one row of the next grid.
fn step_parallel(pool: &ThreadPool, current: &[u8], next: &mut [u8], rows: usize, cols: usize) {
    if cols == 0 {
        return;
    }
    pool.install(|| {
        next.par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| step_rows(current, out, rows, cols, row));
    });
}

/// CPU Game of Life propagator.
///
/// Usage:
/// ```ignore
/// let propagator = LifePropagator::new(&config)?;
/// let stack = propagator.run(&grid, config.iterations)?;
/// assert_eq!(stack.depth(), config.iterations + 1);
/// ```
pub struct LifePropagator {
    cells: CellPolicy,
    /// Smallest grid worth handing to the pool.
    parallel_min_cells: usize,
    pool: Option<ThreadPool>,
}

impl LifePropagator {
    /// Create a propagator, building a worker pool if parallel stepping is on.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.parallel.enabled {
            let threads = config
                .parallel
                .threads
                .unwrap_or_else(platform::available_core_count);
            if threads > 1 {
                debug!("Building stepping pool with {} threads", threads);
                Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
            } else {
                None
            }
        } else {
            None
        };

        Ok(Self {
            cells: config.cells,
            parallel_min_cells: config.parallel.min_cells,
            pool,
        })
    }

    /// Worker threads used for large grids (1 when stepping sequentially).
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    /// Advance `initial` by `iterations` generations.
    ///
    /// The returned stack holds `iterations + 1` snapshots; the first is
    /// `initial` exactly as given.
    pub fn run(&self, initial: &Grid, iterations: usize) -> Result<SnapshotStack> {
        if self.cells == CellPolicy::Strict {
            initial.validate_binary()?;
        }

        let depth = iterations
            .checked_add(1)
            .ok_or_else(|| LifeError::Shape(format!("{} iterations overflow", iterations)))?;
        let mut stack = SnapshotStack::with_capacity(initial.rows(), initial.cols(), depth)?;
        stack.push(initial.cells())?;

        let pool = self
            .pool
            .as_ref()
            .filter(|_| initial.len() >= self.parallel_min_cells);
        info!(
            "Simulating {}x{} grid for {} steps ({})",
            initial.rows(),
            initial.cols(),
            iterations,
            match pool {
                Some(p) => format!("{} threads", p.current_num_threads()),
                None => "sequential".to_owned(),
            }
        );

        let mut buffers = GridBuffers::new(initial);
        for step in 0..iterations {
            buffers.advance(pool);
            stack.push(buffers.current())?;
            trace!("Step {}/{} committed", step + 1, iterations);
        }

        Ok(stack)
    }
}
