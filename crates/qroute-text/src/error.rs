//! Error types for the text formats.

use thiserror::Error;

/// Errors that can occur while reading instances or solution streams.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// One-based identifier was zero.
    #[error("Identifiers are one-based, found 0 at line {line}")]
    ZeroIndex { line: usize },

    /// Identifier does not fit the index type.
    #[error("Identifier {value} at line {line} is too large")]
    IndexOverflow { line: usize, value: u64 },

    /// Operation tag other than `CNOT` or `SWAP`.
    #[error("Unknown operation '{tag}' at line {line}")]
    UnknownOperation { line: usize, tag: String },

    /// Initial mapping line for an out-of-range logical qubit.
    #[error("Mapping line {line} names logical qubit {logical}, but only {num_logical} exist")]
    MappingOutOfRange {
        line: usize,
        logical: u32,
        num_logical: u32,
    },

    /// Initial mapping assigns the same logical qubit twice.
    #[error("Logical qubit {logical} is mapped twice (line {line})")]
    DuplicateMapping { line: usize, logical: u32 },

    /// Extra tokens after a complete instance.
    #[error("Trailing input at line {line}: {found}")]
    TrailingInput { line: usize, found: String },

    /// Structural error in the decoded problem.
    #[error("Invalid instance: {0}")]
    Ir(#[from] qroute_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
