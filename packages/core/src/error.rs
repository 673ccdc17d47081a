//! Invalid-argument errors shared by every layer of the engine.
//!
//! These describe contract violations by the caller (asking for a conversion
//! between a unit and itself, asking for the far end of an edge from a unit
//! that is not on it, and so on). Expected outcomes such as "no such edge" or
//! "edge already present" are not errors and are returned as `Option`/`bool`.

use thiserror::Error;

/// A caller passed an argument the engine refuses to act on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentError {
    #[error("a conversion needs two distinct units, got {0:?} twice")]
    SameUnit(String),

    #[error("unit {unit:?} is not an endpoint of the conversion {unit_a:?} <-> {unit_b:?}")]
    NotAnEndpoint {
        unit: String,
        unit_a: String,
        unit_b: String,
    },

    #[error("unit {0:?} already carries a metric prefix")]
    AlreadyPrefixed(String),

    #[error("unit identifier must not be empty")]
    EmptyUnit,

    #[error("conversion {unit_a:?} <-> {unit_b:?} has no operations")]
    EmptySequence { unit_a: String, unit_b: String },

    #[error("operand must be a finite number greater than zero, got {0}")]
    InvalidOperand(f64),
}
