//! NPY codec for Game of Life grids.
//!
//! Only the slice of the numpy `.npy` format this crate needs is supported:
//! 1-byte unsigned (or boolean) elements in C order.
//!
//! # File Format
//!
//! ```text
//! Preamble:
//!   Magic: "\x93NUMPY" (6 bytes)
//!   Version: major u8, minor u8 (1.0 written; 1.x, 2.x, 3.x read)
//!   Header length: u16 LE (v1) or u32 LE (v2, v3)
//!
//! Header (ASCII dict, space padded, newline terminated):
//!   {'descr': '<u1', 'fortran_order': False, 'shape': (depth, rows, cols), }
//!
//! Data:
//!   Raw bytes, row-major. For snapshot stacks, snapshot-major then row-major.
//! ```
//!
//! Snapshot stacks are always written with a 128-byte header block
//! (preamble + dict + padding), so the data starts at offset 128.

mod format;
mod reader;
mod writer;

pub use format::{
    NPY_MAGIC, NpyHeader, PREAMBLE_LEN_V1, PREAMBLE_LEN_V2, STACK_HEADER_LEN, U1_DESCR,
};
pub use reader::{MappedMatrix, load, load_stack};
pub use writer::{save, save_grid, write_stack};
