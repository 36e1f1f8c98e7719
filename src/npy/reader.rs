//! Memory-mapped NPY reader.

use std::fs::File;
use std::path::Path;

use log::debug;
use memmap2::{Mmap, MmapOptions};

use super::format::NpyHeader;
use crate::compute::{Grid, SnapshotStack};
use crate::error::{LifeError, Result};

/// Read-only mapping of an NPY file holding 1-byte elements.
///
/// The mapping covers the header and the data region and is released when
/// the value drops.
///
/// Usage:
/// ```ignore
/// let matrix = MappedMatrix::open("input.npy")?;
/// println!("shape {:?}", matrix.shape());
/// let grid = matrix.to_grid()?;
/// ```
pub struct MappedMatrix {
    map: Mmap,
    header: NpyHeader,
    /// Byte offset of the first element.
    offset: usize,
    /// Element count.
    len: usize,
}

impl MappedMatrix {
    /// Parse the header and map the file through the end of its data.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| LifeError::io("opening", path, e))?;

        let (header, offset) = NpyHeader::read_from(&mut file)?;
        header.check_byte_elements()?;
        let len = header.element_count()?;

        let end = offset
            .checked_add(len)
            .ok_or_else(|| LifeError::Shape(format!("{:?} overflows", header.shape)))?;
        let file_len = file
            .metadata()
            .map_err(|e| LifeError::io("inspecting", path, e))?
            .len();
        if file_len < end as u64 {
            return Err(LifeError::Format(format!(
                "{} is truncated: shape {:?} needs {} bytes, file has {}",
                path.display(),
                header.shape,
                end,
                file_len
            )));
        }

        // SAFETY: the map is read-only and `end` lies within the file. Callers
        // copy out of it right away; concurrent truncation of the input by
        // another process is outside what this reader guards against.
        let map = unsafe { MmapOptions::new().len(end).map(&file) }
            .map_err(|e| LifeError::io("mapping", path, e))?;

        debug!(
            "Mapped {} (shape {:?}, {} data bytes at offset {})",
            path.display(),
            header.shape,
            len,
            offset
        );

        Ok(Self {
            map,
            header,
            offset,
            len,
        })
    }

    pub fn header(&self) -> &NpyHeader {
        &self.header
    }

    /// Array dimensions, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.header.shape
    }

    /// Element bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.map[self.offset..self.offset + self.len]
    }

    /// Copy a 1-D or 2-D array into a grid. A 1-D array becomes a single row.
    pub fn to_grid(&self) -> Result<Grid> {
        let (rows, cols) = match *self.shape() {
            [cols] => (1, cols),
            [rows, cols] => (rows, cols),
            ref other => {
                return Err(LifeError::Shape(format!(
                    "expected a 1-D or 2-D grid, found rank {} {:?}",
                    other.len(),
                    other
                )));
            }
        };
        Grid::new(rows, cols, self.data().to_vec())
    }

    /// Copy a 3-D array into a snapshot stack.
    pub fn to_stack(&self) -> Result<SnapshotStack> {
        match *self.shape() {
            [depth, rows, cols] => {
                SnapshotStack::from_bytes(depth, rows, cols, self.data().to_vec())
            }
            ref other => Err(LifeError::Shape(format!(
                "expected a 3-D snapshot stack, found rank {} {:?}",
                other.len(),
                other
            ))),
        }
    }
}

/// Load a starting grid. The mapping is dropped as soon as the cells are copied.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let matrix = MappedMatrix::open(&path)?;
    let grid = matrix.to_grid()?;
    drop(matrix);
    debug!(
        "Loaded {}x{} grid from {}",
        grid.rows(),
        grid.cols(),
        path.as_ref().display()
    );
    Ok(grid)
}

/// Load every snapshot from a `(depth, rows, cols)` file.
pub fn load_stack<P: AsRef<Path>>(path: P) -> Result<SnapshotStack> {
    MappedMatrix::open(path)?.to_stack()
}
