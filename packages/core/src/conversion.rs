//! A direct conversion between two units: one edge of the conversion graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ArgumentError;
use crate::grammar::ParseError;
use crate::sequence::OperationSequence;

/// Why a `(unitA, unitB, operations)` triple could not become a [`Conversion`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("invalid operation sequence: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/// A conversion between `unit_a` and `unit_b`.
///
/// `operations` turns a value measured in `unit_a` into the same quantity
/// measured in `unit_b`; its inverse goes the other way. For storage the edge
/// is identified by the unordered pair of its units.
///
/// Serialises as `{"from": .., "to": .., "operations": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    #[serde(rename = "from")]
    unit_a: String,
    #[serde(rename = "to")]
    unit_b: String,
    operations: OperationSequence,
}

impl Conversion {
    /// Build an edge. Both units must be non-empty and distinct, and the
    /// sequence must have at least one step so its text form parses back.
    pub fn new(
        unit_a: impl Into<String>,
        unit_b: impl Into<String>,
        operations: OperationSequence,
    ) -> Result<Self, ArgumentError> {
        let unit_a = unit_a.into();
        let unit_b = unit_b.into();
        if unit_a.is_empty() || unit_b.is_empty() {
            return Err(ArgumentError::EmptyUnit);
        }
        if unit_a == unit_b {
            return Err(ArgumentError::SameUnit(unit_a));
        }
        if operations.is_empty() {
            return Err(ArgumentError::EmptySequence { unit_a, unit_b });
        }
        Ok(Self {
            unit_a,
            unit_b,
            operations,
        })
    }

    /// Build an edge from a population triple, parsing `operations`.
    pub fn parse(
        unit_a: impl Into<String>,
        unit_b: impl Into<String>,
        operations: &str,
    ) -> Result<Self, ConversionError> {
        let seq = OperationSequence::parse(operations)?;
        Ok(Self::new(unit_a, unit_b, seq)?)
    }

    pub fn unit_a(&self) -> &str {
        &self.unit_a
    }

    pub fn unit_b(&self) -> &str {
        &self.unit_b
    }

    /// The forward sequence, `unit_a` → `unit_b`.
    pub fn operations(&self) -> &OperationSequence {
        &self.operations
    }

    /// Convert a value measured in `unit_a` into `unit_b`.
    ///
    /// Division by a value that underflowed to zero mid-sequence follows
    /// IEEE-754 and yields an infinity or NaN rather than an error.
    pub fn apply(&self, value: f64) -> f64 {
        self.operations.apply(value)
    }

    pub fn includes_unit(&self, unit: &str) -> bool {
        self.unit_a == unit || self.unit_b == unit
    }

    /// Whether this edge joins `unit1` and `unit2`, in either order.
    pub fn includes_units(&self, unit1: &str, unit2: &str) -> Result<bool, ArgumentError> {
        if unit1 == unit2 {
            return Err(ArgumentError::SameUnit(unit1.to_string()));
        }
        Ok((self.unit_a == unit1 && self.unit_b == unit2)
            || (self.unit_a == unit2 && self.unit_b == unit1))
    }

    /// The endpoint across the edge from `unit`.
    pub fn opposite_unit(&self, unit: &str) -> Result<&str, ArgumentError> {
        if self.unit_a == unit {
            Ok(&self.unit_b)
        } else if self.unit_b == unit {
            Ok(&self.unit_a)
        } else {
            Err(ArgumentError::NotAnEndpoint {
                unit: unit.to_string(),
                unit_a: self.unit_a.clone(),
                unit_b: self.unit_b.clone(),
            })
        }
    }

    /// Whether walking the edge away from `unit` follows the stored direction.
    pub fn runs_from(&self, unit: &str) -> bool {
        self.unit_a == unit
    }

    /// Replace the forward sequence with its inverse. The endpoints keep
    /// their places, so afterwards `apply` maps `unit_b` values to `unit_a`.
    ///
    /// Only meant for copies obtained from the graph.
    pub fn invert_in_place(&mut self) {
        self.operations.invert();
    }

    pub fn into_operations(self) -> OperationSequence {
        self.operations
    }
}

/// An unparsed `(unitA, unitB, operations)` triple as supplied by a data
/// source. Parsing is deferred so each record can fail on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub from: String,
    pub to: String,
    pub operations: String,
}

impl ConversionRecord {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        operations: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            operations: operations.into(),
        }
    }

    pub fn to_conversion(&self) -> Result<Conversion, ConversionError> {
        Conversion::parse(self.from.as_str(), self.to.as_str(), &self.operations)
    }
}

impl From<&Conversion> for ConversionRecord {
    fn from(c: &Conversion) -> Self {
        Self::new(c.unit_a(), c.unit_b(), c.operations().to_string())
    }
}

/// `unit_a unit_b operations`, the same layout as a conversions file line.
impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.unit_a, self.unit_b, self.operations)
    }
}

// --- tests -------------------------------------------------------------------
