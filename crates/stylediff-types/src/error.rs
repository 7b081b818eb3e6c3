use thiserror::Error;

use crate::operation::Operation;

/// Errors produced while reading style documents or decoding commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{what} is not a JSON object")]
    NotAnObject { what: &'static str },

    #[error("{what} is not a JSON array")]
    NotAnArray { what: &'static str },

    #[error("{what} has no string id")]
    MissingId { what: &'static str },

    #[error("duplicate {what} id: {id}")]
    DuplicateId { what: &'static str, id: String },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} expects {expected} arguments, got {actual}")]
    Arity {
        operation: Operation,
        expected: &'static str,
        actual: usize,
    },

    #[error("invalid argument {index} for {operation}: {reason}")]
    InvalidArgument {
        operation: Operation,
        index: usize,
        reason: &'static str,
    },
}

/// Convenience alias for results carrying a [`TypeError`].
pub type TypeResult<T> = Result<T, TypeError>;
