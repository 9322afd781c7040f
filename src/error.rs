//! Shared error classification for the property validator and the table engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a failure.
///
// Callers inspect this instead of matching on messages; the Python bindings
// map each kind onto a distinct exception class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The input does not have the required structural shape
    /// (wrong container, wrong element type, wrong arity).
    Type,
    /// The shape is right but a value is out of its domain
    /// (coordinate range, unknown address key, row length, unknown year).
    Value,
    /// A calculator read a row or cell that was never populated.
    Missing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Type => "type error",
            ErrorKind::Value => "value error",
            ErrorKind::Missing => "missing dependency",
        };
        f.write_str(s)
    }
}
