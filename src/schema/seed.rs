//! Seed patterns for generating starting grids.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compute::Grid;
use crate::error::Result;

/// Complete seed specification for a starting grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Glider { origin: (0, 0) },
        }
    }
}

/// Predefined patterns. Coordinates are (row, col); cells that fall outside
/// the grid are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// All cells dead.
    Empty,
    /// Period-2 oscillator, vertical phase, centered on `center`.
    Blinker { center: (usize, usize) },
    /// South-east travelling glider with its bounding box at `origin`.
    Glider { origin: (usize, usize) },
    /// Each cell alive with probability `density`.
    Random {
        /// Probability in [0, 1]; values outside are clamped.
        density: f64,
        /// Random seed.
        seed: u64,
    },
    /// Explicit list of live cells.
    Custom { cells: Vec<(usize, usize)> },
}

const GLIDER: [(usize, usize); 5] = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

impl Seed {
    /// Generate a starting grid from the seed.
    ///
    /// Fails only when a `rows` x `cols` grid cannot be created.
    pub fn generate(&self, rows: usize, cols: usize) -> Result<Grid> {
        let mut grid = Grid::empty(rows, cols)?;

        match &self.pattern {
            Pattern::Empty => {}
            Pattern::Blinker { center } => {
                let (r, c) = *center;
                if let Some(top) = r.checked_sub(1) {
                    grid.set(top, c, 1);
                }
                grid.set(r, c, 1);
                if let Some(bottom) = r.checked_add(1) {
                    grid.set(bottom, c, 1);
                }
            }
            Pattern::Glider { origin } => {
                for (dr, dc) in GLIDER {
                    let cell = origin.0.checked_add(dr).zip(origin.1.checked_add(dc));
                    if let Some((r, c)) = cell {
                        grid.set(r, c, 1);
                    }
                }
            }
            Pattern::Random { density, seed } => {
                let density = density.clamp(0.0, 1.0);
                let mut rng = StdRng::seed_from_u64(*seed);
                for row in 0..rows {
                    for col in 0..cols {
                        if rng.gen_bool(density) {
                            grid.set(row, col, 1);
                        }
                    }
                }
            }
            Pattern::Custom { cells } => {
                for &(r, c) in cells {
                    grid.set(r, c, 1);
                }
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::step;
    use crate::error::LifeError;

    #[test]
    fn test_glider_translates() {
        let seed = Seed::default();
        let mut grid = seed.generate(8, 8).unwrap();
        assert_eq!(grid.population(), 5);
        for _ in 0..4 {
            grid = step(&grid);
        }
        let moved = Seed {
            pattern: Pattern::Glider { origin: (1, 1) },
        }
        .generate(8, 8)
        .unwrap();
        assert_eq!(grid, moved);
    }

    #[test]
    fn test_blinker_at_edge_is_clipped() {
        let grid = Seed {
            pattern: Pattern::Blinker { center: (0, 0) },
        }
        .generate(3, 3)
        .unwrap();
        assert_eq!(grid.population(), 2);
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(1, 0), Some(1));
    }

    #[test]
    fn test_custom_drops_outside_cells() {
        let grid = Seed {
            pattern: Pattern::Custom {
                cells: vec![(0, 0), (5, 5), (1, 2)],
            },
        }
        .generate(2, 3)
        .unwrap();
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn test_far_coordinates_are_dropped() {
        let edge = usize::MAX;
        for pattern in [
            Pattern::Blinker {
                center: (edge, edge),
            },
            Pattern::Glider {
                origin: (edge - 1, 0),
            },
            Pattern::Glider {
                origin: (0, edge),
            },
        ] {
            let grid = Seed { pattern }.generate(4, 4).unwrap();
            assert_eq!(grid.population(), 0);
        }

        // Only the cells that land inside survive
        let grid = Seed {
            pattern: Pattern::Blinker { center: (3, 1) },
        }
        .generate(4, 4)
        .unwrap();
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn test_oversized_grid_is_error() {
        let err = Seed::default().generate(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, LifeError::Shape(_)));
    }

    #[test]
    fn test_random_is_deterministic() {
        let seed = Seed {
            pattern: Pattern::Random {
                density: 0.4,
                seed: 42,
            },
        };
        let a = seed.generate(16, 16).unwrap();
        let b = seed.generate(16, 16).unwrap();
        assert_eq!(a, b);
        assert!(a.population() > 0 && a.population() < 256);
        assert!(a.validate_binary().is_ok());
    }

    #[test]
    fn test_random_density_bounds() {
        let full = Seed {
            pattern: Pattern::Random {
                density: 2.0,
                seed: 1,
            },
        }
        .generate(4, 4)
        .unwrap();
        assert_eq!(full.population(), 16);

        let none = Seed {
            pattern: Pattern::Random {
                density: -1.0,
                seed: 1,
            },
        }
        .generate(4, 4)
        .unwrap();
        assert_eq!(none.population(), 0);
    }

    #[test]
    fn test_seed_json() {
        let seed: Seed =
            serde_json::from_str(r#"{"pattern": {"type": "Blinker", "center": [2, 3]}}"#).unwrap();
        let grid = seed.generate(5, 5).unwrap();
        assert_eq!(grid.population(), 3);
        assert_eq!(grid.get(1, 3), Some(1));
    }
}
