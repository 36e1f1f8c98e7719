//! Transition rule for Conway's Game of Life (B3/S23).
//!
//! Neighbors are the 8 surrounding cells that lie inside the grid. Cells past
//! an edge count as dead: there is no wraparound and no padding border.

use super::Grid;

/// Next state of a cell given whether it is alive and its live neighbor count.
///
/// A live cell survives with 2 or 3 neighbors; a dead cell is born with exactly 3.
#[inline]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (_, 3))
}

/// Count live in-bounds neighbors of (row, col) in a row-major grid.
#[inline]
pub fn neighbor_count(cells: &[u8], rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    let y0 = row.saturating_sub(1);
    let y1 = (row + 1).min(rows - 1);
    let x0 = col.saturating_sub(1);
    let x1 = (col + 1).min(cols - 1);

    let mut count = 0u8;
    for y in y0..=y1 {
        let base = y * cols;
        for x in x0..=x1 {
            if (y != row || x != col) && cells[base + x] != 0 {
                count += 1;
            }
        }
    }
    count
}

/// Update a run of whole rows starting at `first_row`.
///
/// `out` holds the next-state rows only and must be a multiple of `cols` long.
/// Reads touch nothing but `current`, so disjoint row ranges can be computed
/// on separate threads.
pub fn step_rows(current: &[u8], out: &mut [u8], rows: usize, cols: usize, first_row: usize) {
    if cols == 0 {
        return;
    }
    debug_assert_eq!(out.len() % cols, 0);

    for (offset, out_row) in out.chunks_mut(cols).enumerate() {
        let row = first_row + offset;
        let base = row * cols;
        for (col, cell) in out_row.iter_mut().enumerate() {
            let alive = current[base + col] != 0;
            let neighbors = neighbor_count(current, rows, cols, row, col);
            *cell = next_state(alive, neighbors) as u8;
        }
    }
}

/// Compute the next generation of `current` into `next`.
///
/// Both slices must hold exactly `rows * cols` cells.
pub fn step_into(current: &[u8], next: &mut [u8], rows: usize, cols: usize) {
    debug_assert_eq!(current.len(), rows * cols);
    debug_assert_eq!(next.len(), rows * cols);
    step_rows(current, next, rows, cols, 0);
}

/// Compute the next generation as a new grid.
pub fn step(grid: &Grid) -> Grid {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut cells = vec![0u8; grid.len()];
    step_into(grid.cells(), &mut cells, rows, cols);
    Grid::from_parts(rows, cols, cells)
}
