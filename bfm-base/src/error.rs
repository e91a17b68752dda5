//! Engine errors

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or running a program.
///
/// Every error is fatal for the call that produced it. Output written before
/// a runtime error stays readable through [`crate::Engine::output`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid source kind `{0}`, expected `T` or `F`")]
    InvalidSourceKind(String),

    #[error("failed to load program from {}", .path.display())]
    FileLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("command `{instruction}` at {position} is not yet functional")]
    UnimplementedInstruction { instruction: char, position: usize },

    #[error("invalid program pointer ({position}), program length is {len}")]
    ProgramCounterOutOfRange { position: isize, len: usize },

    #[error("data pointer moved below cell 0 at {position}")]
    DataPointerUnderflow { position: usize },

    #[error("cell value {value} at {position} is not a character")]
    InvalidCodePoint { value: i64, position: usize },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

impl Error {
    /// Gets the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSourceKind(_) => ErrorKind::InvalidSourceKind,
            Error::FileLoad { .. } => ErrorKind::FileLoad,
            Error::UnimplementedInstruction { .. } => ErrorKind::UnimplementedInstruction,
            Error::ProgramCounterOutOfRange { .. } => ErrorKind::ProgramCounterOutOfRange,
            Error::DataPointerUnderflow { .. } => ErrorKind::DataPointerUnderflow,
            Error::InvalidCodePoint { .. } => ErrorKind::InvalidCodePoint,
            Error::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
        }
    }
}

/// Fieldless mirror of [`Error`], printed as the variant name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSourceKind,
    FileLoad,
    UnimplementedInstruction,
    ProgramCounterOutOfRange,
    DataPointerUnderflow,
    InvalidCodePoint,
    StepLimitExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidSourceKind => "InvalidSourceKind",
            ErrorKind::FileLoad => "FileLoad",
            ErrorKind::UnimplementedInstruction => "UnimplementedInstruction",
            ErrorKind::ProgramCounterOutOfRange => "ProgramCounterOutOfRange",
            ErrorKind::DataPointerUnderflow => "DataPointerUnderflow",
            ErrorKind::InvalidCodePoint => "InvalidCodePoint",
            ErrorKind::StepLimitExceeded => "StepLimitExceeded",
        };
        f.write_str(name)
    }
}
