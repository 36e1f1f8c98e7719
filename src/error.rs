//! Error type shared by the codec and the simulation engine.

use std::io;
use std::path::Path;

use crate::schema::ConfigError;

/// Errors produced while loading, simulating, or saving grids.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    /// A file could not be opened, mapped, read, or written.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The file is not an NPY array this crate can read.
    #[error("Unsupported NPY file: {0}")]
    Format(String),

    /// The array rank or dimensions are not usable as a grid.
    #[error("Unsupported shape: {0}")]
    Shape(String),

    /// A cell holds a value other than 0 or 1 (strict cell policy only).
    #[error("Cell {index} holds {value}, expected 0 or 1")]
    Data { index: usize, value: u8 },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl LifeError {
    /// Wrap an I/O error with the action and path that caused it.
    pub fn io(action: &str, path: &Path, source: io::Error) -> Self {
        LifeError::Io {
            context: format!("{} {}", action, path.display()),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_context_names_path() {
        let err = LifeError::io(
            "opening",
            Path::new("missing.npy"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("opening missing.npy"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_data_error_message() {
        let err = LifeError::Data { index: 7, value: 2 };
        assert_eq!(err.to_string(), "Cell 7 holds 2, expected 0 or 1");
    }
}
