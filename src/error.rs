use thiserror::Error;

/// Errors produced by the acceleration-structure builder, linearizer,
/// assemblers and serializer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("device memory allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
}

impl Error {
    pub fn invalid<S: Into<String>>(msg: S) -> Error {
        Error::InvalidInput(msg.into())
    }

    pub fn invariant<S: Into<String>>(msg: S) -> Error {
        Error::InvariantViolation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
