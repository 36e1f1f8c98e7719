//! Grid - a single Game of Life state.

use std::fmt;

use crate::error::{LifeError, Result};

/// Rectangular cell grid stored row-major as one byte per cell.
///
/// 0 is dead; any other value is alive. Grids produced by stepping only ever
/// contain 0 or 1, but grids loaded from disk keep whatever bytes the file held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Create a grid from flat row-major cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<u8>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| LifeError::Shape(format!("{}x{} overflows", rows, cols)))?;
        if cells.len() != expected {
            return Err(LifeError::Shape(format!(
                "{}x{} grid needs {} cells, got {}",
                rows,
                cols,
                expected,
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Wrap cells already known to match the dimensions.
    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// Create an all-dead grid.
    ///
    /// Fails with `Shape` when `rows * cols` overflows or cannot be allocated.
    pub fn empty(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| LifeError::Shape(format!("{}x{} overflows", rows, cols)))?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| {
            LifeError::Shape(format!("{}x{} grid cannot be allocated", rows, cols))
        })?;
        cells.resize(len, 0);
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(LifeError::Shape(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    cols
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, cells)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count (rows * cols).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat row-major cells.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Convert (row, col) to flat index.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Cell value at (row, col), or None when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.cells[self.idx(row, col)])
        } else {
            None
        }
    }

    /// Set a cell. Out-of-range coordinates are ignored and return false.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> bool {
        if row < self.rows && col < self.cols {
            let i = self.idx(row, col);
            self.cells[i] = value;
            true
        } else {
            false
        }
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Fail with the first cell that is neither 0 nor 1.
    pub fn validate_binary(&self) -> Result<()> {
        match self.cells.iter().position(|&c| c > 1) {
            Some(index) => Err(LifeError::Data {
                index,
                value: self.cells[index],
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.cols) {
            for &cell in row {
                f.write_str(if cell != 0 { "█" } else { "-" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Grid::new(2, 3, vec![0; 5]).unwrap_err();
        assert!(matches!(err, LifeError::Shape(_)));
    }

    #[test]
    fn test_empty_rejects_oversized() {
        assert!(matches!(
            Grid::empty(usize::MAX, 2),
            Err(LifeError::Shape(_))
        ));
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            Grid::empty(1 << 32, 1 << 31),
            Err(LifeError::Shape(_))
        ));
        assert_eq!(Grid::empty(usize::MAX, 0).unwrap().len(), 0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Grid::from_rows(&[vec![0u8, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, LifeError::Shape(_)));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::empty(2, 3).unwrap();
        assert!(grid.set(1, 2, 1));
        assert!(!grid.set(2, 0, 1));
        assert_eq!(grid.get(1, 2), Some(1));
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.cells()[5], 1);
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_validate_binary() {
        let ok = Grid::from_rows(&[[0u8, 1], [1, 0]]).unwrap();
        assert!(ok.validate_binary().is_ok());

        let bad = Grid::from_rows(&[[0u8, 1], [2, 0]]).unwrap();
        match bad.validate_binary() {
            Err(LifeError::Data { index, value }) => {
                assert_eq!(index, 2);
                assert_eq!(value, 2);
            }
            other => panic!("expected data error, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(&[[0u8, 1], [1, 0]]).unwrap();
        assert_eq!(grid.to_string(), "-█\n█-\n");
        assert_eq!(Grid::empty(0, 0).unwrap().to_string(), "");
    }
}
