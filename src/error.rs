use std::fmt;

/// Unified error type for the map and its iteration contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was not supplied.
    InvalidArgument(&'static str),
    /// A walk was requested while another walk is running on the same context.
    IteratorBusy,
    /// The iteration context has been closed.
    IteratorClosed,
    /// The iteration context was never bound to a map.
    IteratorUninitialized,
    /// The map was mutated while a walk was in flight.
    ConcurrentModification,
    /// A structural invariant of the tree does not hold.
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(name) => write!(f, "Invalid argument: '{name}' is required"),
            Error::IteratorBusy => write!(f, "Iterator already running"),
            Error::IteratorClosed => write!(f, "Iteration context closed"),
            Error::IteratorUninitialized => write!(f, "Iteration context uninitialized"),
            Error::ConcurrentModification => write!(f, "Map modified while iterating"),
            Error::InvariantViolation(msg) => write!(f, "Invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
