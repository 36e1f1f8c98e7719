//! Configuration types for a Game of Life run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_iterations() -> usize {
    3
}

fn default_input() -> PathBuf {
    PathBuf::from("examples/input.npy")
}

fn default_output() -> PathBuf {
    PathBuf::from("output/out.npy")
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of generations to advance. The output holds iterations + 1 snapshots.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// 2-D NPY file holding the starting grid.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// 3-D NPY file receiving every snapshot.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// How cell values other than 0 and 1 are treated.
    #[serde(default)]
    pub cells: CellPolicy,
    /// Row-parallel stepping.
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            input: default_input(),
            output: default_output(),
            cells: CellPolicy::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate configuration parameters.
    ///
    /// Input and output are compared after resolving symlinks and `.`/`..`
    /// when both exist, and textually otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if same_path(&self.input, &self.output) {
            return Err(ConfigError::SameInputOutput(self.input.clone()));
        }
        if self.parallel.threads == Some(0) {
            return Err(ConfigError::InvalidThreadCount);
        }
        if self.parallel.min_cells == 0 {
            return Err(ConfigError::InvalidMinCells);
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Handling of loaded cell values outside {0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellPolicy {
    /// Any nonzero byte is a live cell.
    #[default]
    Permissive,
    /// Reject the grid if any byte is not 0 or 1.
    Strict,
}

/// Row-parallel stepping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Allow stepping rows on a worker pool.
    pub enabled: bool,
    /// Worker count. None uses every core available to the process.
    pub threads: Option<usize>,
    /// Grids smaller than this are stepped on the calling thread.
    pub min_cells: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threads: None,
            min_cells: 1 << 16,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Input and output both point at {0}")]
    SameInputOutput(PathBuf),
    #[error("Thread count must be non-zero")]
    InvalidThreadCount,
    #[error("Parallel cell threshold must be non-zero")]
    InvalidMinCells,
}
