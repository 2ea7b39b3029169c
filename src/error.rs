//! Typed error surface shared by every coder in the lab.
//!
//! Each core returns `Result<T, CodecError>`. The CLI binaries widen this
//! into `anyhow::Result` so a single `?` chain can also carry `io::Error`
//! and argument-parsing failures.

use std::fmt;
use std::io;

/// Process exit code a given error should map to, mirroring the original
/// tools' convention of 0 = success, non-zero = failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    IoError = 1,
    UnexpectedEof = 2,
    InvalidCode = 3,
    DictionaryOverflow = 4,
    ArgumentError = 5,
}

#[derive(Debug)]
pub enum CodecError {
    /// Reading from the upstream source failed.
    IoRead(io::Error),
    /// Writing to the downstream sink failed.
    IoWrite(io::Error),
    /// A VLC or codec needed more bits than remained before end of stream.
    UnexpectedEof(&'static str),
    /// LZW saw `w > next_code` outside the KωK case, or Huffman walked off
    /// its tree.
    InvalidCode(&'static str),
    /// A fixed-capacity dictionary (currently: the PPM context table)
    /// filled up.
    DictionaryOverflow(&'static str),
    /// A CLI argument was missing or malformed.
    ArgumentError(String),
}

impl CodecError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CodecError::IoRead(_) | CodecError::IoWrite(_) => ExitCode::IoError,
            CodecError::UnexpectedEof(_) => ExitCode::UnexpectedEof,
            CodecError::InvalidCode(_) => ExitCode::InvalidCode,
            CodecError::DictionaryOverflow(_) => ExitCode::DictionaryOverflow,
            CodecError::ArgumentError(_) => ExitCode::ArgumentError,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::IoRead(e) => write!(f, "error reading input: {e}"),
            CodecError::IoWrite(e) => write!(f, "error writing output: {e}"),
            CodecError::UnexpectedEof(ctx) => write!(f, "unexpected end of stream: {ctx}"),
            CodecError::InvalidCode(ctx) => write!(f, "invalid code in stream: {ctx}"),
            CodecError::DictionaryOverflow(ctx) => write!(f, "dictionary overflow: {ctx}"),
            CodecError::ArgumentError(msg) => write!(f, "argument error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::IoRead(e) | CodecError::IoWrite(e) => Some(e),
            _ => None,
        }
    }
}

/// Lifts an upstream `io::Error` hit while reading into a `CodecError`.
pub fn read_err(e: io::Error) -> CodecError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CodecError::UnexpectedEof("upstream source exhausted")
    } else {
        CodecError::IoRead(e)
    }
}

/// Lifts an upstream `io::Error` hit while writing into a `CodecError`.
pub fn write_err(e: io::Error) -> CodecError {
    CodecError::IoWrite(e)
}

pub type Result<T> = std::result::Result<T, CodecError>;
