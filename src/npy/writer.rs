//! Buffered NPY writer for grids and snapshot stacks.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use tempfile::Builder;

use super::format::NpyHeader;
use crate::compute::{Grid, SnapshotStack};
use crate::error::{LifeError, Result};

/// Encode the header for `shape`, checking that `data` fills it exactly.
fn encode_header(shape: &[usize], data: &[u8]) -> Result<Vec<u8>> {
    let header = NpyHeader::u1(shape);
    let expected = header.element_count()?;
    if data.len() != expected {
        return Err(LifeError::Shape(format!(
            "shape {:?} needs {} bytes, got {}",
            shape,
            expected,
            data.len()
        )));
    }
    header.encode()
}

/// Write a `(depth, rows, cols)` `u1` array: header block, then `data` verbatim.
///
/// A short write surfaces as an `Io` error (`WriteZero`).
pub fn write_stack<W: Write>(
    w: &mut W,
    data: &[u8],
    depth: usize,
    rows: usize,
    cols: usize,
) -> Result<()> {
    let header = encode_header(&[depth, rows, cols], data)?;
    w.write_all(&header)
        .and_then(|_| w.write_all(data))
        .map_err(|e| LifeError::Io {
            context: "writing NPY stack".to_owned(),
            source: e,
        })
}

/// Save every snapshot to `path` as a 3-D array. Returns the file size.
pub fn save<P: AsRef<Path>>(path: P, stack: &SnapshotStack) -> Result<u64> {
    save_array(path.as_ref(), &stack.shape(), stack.as_bytes())
}

/// Save a single grid to `path` as a 2-D array. Returns the file size.
pub fn save_grid<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<u64> {
    save_array(path.as_ref(), &[grid.rows(), grid.cols()], grid.cells())
}

/// Write the array to `path` through [`write_atomically`].
fn save_array(path: &Path, shape: &[usize], data: &[u8]) -> Result<u64> {
    let header = encode_header(shape, data)?;

    write_atomically(path, |w| {
        w.write_all(&header)?;
        w.write_all(data)
    })?;

    let total = (header.len() + data.len()) as u64;
    debug!(
        "Wrote {} (shape {:?}, {} bytes)",
        path.display(),
        shape,
        total
    );
    Ok(total)
}

/// Run `write` against a temporary file beside `path`, then rename it over
/// `path`. On failure the temporary file is deleted and `path` is untouched.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".npy-life-").suffix(".tmp");
    #[cfg(unix)]
    {
        // Same mode File::create would use, before umask
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| LifeError::io("creating temporary file for", path, e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| LifeError::io("writing", path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| LifeError::io("replacing", path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npy::{STACK_HEADER_LEN, load, load_stack};
    use std::fs;
    use tempfile::tempdir;

    /// Writer that accepts a fixed number of bytes, then reports zero progress.
    struct ShortWriter {
        remaining: usize,
        out: Vec<u8>,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_stack_layout() {
        let data: Vec<u8> = (0..12).map(|i| (i % 2) as u8).collect();
        let mut buf = Vec::new();
        write_stack(&mut buf, &data, 3, 2, 2).unwrap();

        assert_eq!(buf.len(), STACK_HEADER_LEN + 12);
        assert_eq!(buf[STACK_HEADER_LEN - 1], b'\n');
        assert!(
            std::str::from_utf8(&buf[10..STACK_HEADER_LEN])
                .unwrap()
                .contains("'shape': (3, 2, 2)")
        );
        assert_eq!(&buf[STACK_HEADER_LEN..], &data[..]);
    }

    #[test]
    fn test_write_stack_length_mismatch() {
        let mut buf = Vec::new();
        let err = write_stack(&mut buf, &[0; 5], 1, 2, 2).unwrap_err();
        assert!(matches!(err, LifeError::Shape(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_short_write_is_io_error() {
        let mut w = ShortWriter {
            remaining: STACK_HEADER_LEN + 3,
            out: Vec::new(),
        };
        match write_stack(&mut w, &[1; 8], 2, 2, 2) {
            Err(LifeError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::WriteZero)
            }
            other => panic!("expected io error, got {:?}", other),
        }
        assert_eq!(w.out.len(), STACK_HEADER_LEN + 3);
    }

    #[test]
    fn test_save_then_load_first_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.npy");

        let first = Grid::from_rows(&[[0u8, 1, 0, 1], [1, 1, 0, 0], [0, 0, 1, 1]]).unwrap();
        let mut stack = SnapshotStack::with_capacity(3, 4, 2).unwrap();
        stack.push(first.cells()).unwrap();
        stack.push(&[0; 12]).unwrap();

        let size = save(&path, &stack).unwrap();
        assert_eq!(size, (STACK_HEADER_LEN + 24) as u64);

        let loaded = load_stack(&path).unwrap();
        assert_eq!(loaded, stack);

        // First snapshot reinterpreted as a 2-D matrix
        let bytes = fs::read(&path).unwrap();
        let reread = Grid::new(
            loaded.rows(),
            loaded.cols(),
            bytes[STACK_HEADER_LEN..STACK_HEADER_LEN + 12].to_vec(),
        )
        .unwrap();
        assert_eq!(reread, first);
    }

    #[test]
    fn test_save_grid_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.npy");
        let grid = Grid::from_rows(&[[1u8, 0, 1], [0, 1, 0]]).unwrap();

        save_grid(&path, &grid).unwrap();
        assert_eq!(load(&path).unwrap(), grid);
    }

    #[test]
    fn test_save_into_missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.npy");
        let stack = SnapshotStack::with_capacity(1, 1, 1).unwrap();

        assert!(matches!(save(&path, &stack), Err(LifeError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.npy");

        let err = write_atomically(&path, |w| {
            w.write_all(&[1; 4096])?;
            Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
        })
        .unwrap_err();

        match err {
            LifeError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::StorageFull),
            other => panic!("expected io error, got {:?}", other),
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_existing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.npy");
        fs::write(&path, b"previous run").unwrap();

        let result = write_atomically(&path, |w| {
            w.write_all(b"half")?;
            Err(io::Error::from(io::ErrorKind::WriteZero))
        });

        assert!(matches!(result, Err(LifeError::Io { .. })));
        assert_eq!(fs::read(&path).unwrap(), b"previous run");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.npy");
        fs::write(&path, vec![0xff; 1024]).unwrap();

        let grid = Grid::from_rows(&[[0u8, 1], [1, 1]]).unwrap();
        let size = save_grid(&path, &grid).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), size);
        assert_eq!(load(&path).unwrap(), grid);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_shape_error_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.npy");
        let grid = Grid::empty(2, 2).unwrap();

        assert!(save_array(&path, &[3, 3], grid.cells()).is_err());
        assert!(!path.exists());
    }
}
