use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The rows of the input do not form a square.
    #[error("matrix must be square: {rows} rows, {cols} columns")]
    NotSquare { rows: usize, cols: usize },

    #[error("row {row} has {len} entries, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A flat row-major buffer does not hold exactly n² entries.
    #[error("buffer length must be {expected}, got {got}")]
    BufferLength { expected: usize, got: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Only raised by the checked factorizations.
    #[error("pivot at step {step} is numerically zero (|u_kk| = {magnitude:e})")]
    SingularPivot { step: usize, magnitude: f64 },

    #[error("permutation is not a bijection on 0..{n}: {indices:?}")]
    InvalidPermutation { n: usize, indices: Vec<i64> },

    #[error("dimension {n} exceeds the native integer range")]
    TooLarge { n: usize },

    /// The native library or one of its symbols could not be loaded.
    #[error("native backend unavailable ({}): {cause}", .path.display())]
    BackendUnavailable { path: PathBuf, cause: String },
}
