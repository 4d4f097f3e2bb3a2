use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the assembly pipeline.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("malformed read file {}: line {line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("k-mer table serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}
