//! Snapshot stack - every generation of a run in one contiguous buffer.

use crate::error::{LifeError, Result};

use super::Grid;

/// Contiguous sequence of same-sized grids, snapshot-major then row-major.
///
/// This is exactly the byte order of a `(depth, rows, cols)` NPY array, so the
/// writer can emit `as_bytes()` verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStack {
    rows: usize,
    cols: usize,
    depth: usize,
    data: Vec<u8>,
}

impl SnapshotStack {
    /// Create an empty stack with room for `capacity` snapshots.
    ///
    /// The whole buffer is reserved up front, so a request the allocator
    /// cannot satisfy fails here as a `Shape` error.
    pub fn with_capacity(rows: usize, cols: usize, capacity: usize) -> Result<Self> {
        let bytes = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(capacity))
            .ok_or_else(|| {
                LifeError::Shape(format!(
                    "{} snapshots of {}x{} overflow the address space",
                    capacity, rows, cols
                ))
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes).map_err(|_| {
            LifeError::Shape(format!(
                "{} snapshots of {}x{} ({} bytes) cannot be allocated",
                capacity, rows, cols, bytes
            ))
        })?;
        Ok(Self {
            rows,
            cols,
            depth: 0,
            data,
        })
    }

    /// Wrap raw bytes read back from a 3-D file.
    pub fn from_bytes(depth: usize, rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        let expected = depth
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(cols))
            .ok_or_else(|| LifeError::Shape(format!("({}, {}, {}) overflows", depth, rows, cols)))?;
        if data.len() != expected {
            return Err(LifeError::Shape(format!(
                "({}, {}, {}) stack needs {} bytes, got {}",
                depth,
                rows,
                cols,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            depth,
            data,
        })
    }

    /// Append one snapshot. Its length must be rows * cols.
    pub fn push(&mut self, cells: &[u8]) -> Result<()> {
        if cells.len() != self.grid_size() {
            return Err(LifeError::Shape(format!(
                "snapshot has {} cells, stack expects {}",
                cells.len(),
                self.grid_size()
            )));
        }
        self.data.extend_from_slice(cells);
        self.depth += 1;
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of snapshots held.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Cells per snapshot.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols
    }

    /// NPY shape of the stack: (depth, rows, cols).
    pub fn shape(&self) -> [usize; 3] {
        [self.depth, self.rows, self.cols]
    }

    /// Cells of snapshot `index`.
    pub fn snapshot(&self, index: usize) -> Option<&[u8]> {
        if index >= self.depth {
            return None;
        }
        let size = self.grid_size();
        Some(&self.data[index * size..(index + 1) * size])
    }

    /// Copy snapshot `index` out as a grid.
    pub fn grid(&self, index: usize) -> Option<Grid> {
        self.snapshot(index)
            .map(|cells| Grid::from_parts(self.rows, self.cols, cells.to_vec()))
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<Grid> {
        self.depth.checked_sub(1).and_then(|i| self.grid(i))
    }

    /// All snapshots in file order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Live cell count of each snapshot.
    pub fn populations(&self) -> Vec<usize> {
        (0..self.depth)
            .filter_map(|i| self.snapshot(i))
            .map(|cells| cells.iter().filter(|&&c| c != 0).count())
            .collect()
    }
}
