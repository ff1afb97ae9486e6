//! Shared error types for pseu-util's own subsystems.

use thiserror::Error;

/// Errors raised by [`crate::span::SourceMap`].
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid line number: {line} (source has {max_lines} lines)")]
    InvalidLine { line: usize, max_lines: usize },

    #[error("span out of bounds: source is {len} bytes, span is {start}..{end}")]
    SpanOutOfBounds { len: usize, start: usize, end: usize },
}

/// Errors raised by [`crate::index_vec::IndexVec`] accessors that return
/// `Result` instead of panicking (bounds-checked paths used outside the
/// hot interpreter loop, e.g. symbol table lookups by id).
#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },
}

pub type SourceMapResult<T> = std::result::Result<T, SourceMapError>;
pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;
