//! Arithmetic steps and the ordered sequences built from them.
//!
//! An [`OperationSequence`] is a left fold of single-argument steps over a
//! running value: `((x op₁ a₁) op₂ a₂) …`. Its text form is the conversion
//! literal accepted by [`crate::grammar`], e.g. `*9/5+32`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;
use crate::grammar::{self, ParseError};

/// One of the four arithmetic operators a step may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The character this operator is written as in the conversion literal.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Parses an operator character. Returns `None` for anything else.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The operator that undoes this one for the same operand.
    pub fn inverse(self) -> Self {
        match self {
            Operator::Add => Operator::Subtract,
            Operator::Subtract => Operator::Add,
            Operator::Multiply => Operator::Divide,
            Operator::Divide => Operator::Multiply,
        }
    }

    /// `lhs OP rhs` with plain IEEE-754 semantics.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single arithmetic step: an operator and its operand.
///
/// The operand is always finite and strictly positive. Zero is excluded so
/// every step can be inverted; negatives are excluded because the sign is
/// expressed by the operator and the literal grammar has no way to write one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operation {
    operator: Operator,
    operand: f64,
}

impl Operation {
    /// Build a step, rejecting operands that are zero, negative, or not finite.
    pub fn new(operator: Operator, operand: f64) -> Result<Self, ArgumentError> {
        if !operand.is_finite() || operand <= 0.0 {
            return Err(ArgumentError::InvalidOperand(operand));
        }
        Ok(Self { operator, operand })
    }

    // Only for operands known at compile time to be finite and positive.
    pub(crate) const fn from_positive(operator: Operator, operand: f64) -> Self {
        Self { operator, operand }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> f64 {
        self.operand
    }

    /// The step that undoes this one: same operand, inverse operator.
    pub fn inverse(&self) -> Self {
        Self {
            operator: self.operator.inverse(),
            operand: self.operand,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.operator.apply(value, self.operand)
    }
}

/// Renders as the operator followed by the shortest decimal that reads back
/// as the same operand: `*1000`, `-273.15`, `/0.0254`.
///
/// `f64`'s `Display` never switches to exponent notation and always uses `.`,
/// which is exactly what the literal grammar expects.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.operand)
    }
}

/// An ordered, composable, invertible list of [`Operation`]s.
///
/// Serialises as its canonical text form and deserialises through the
/// literal grammar, so a malformed string in a data file is a deserialisation
/// error rather than a silently truncated sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationSequence {
    operations: Vec<Operation>,
}

impl OperationSequence {
    /// An empty sequence; applying it returns the input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a conversion literal such as `-273.15*9/5+32`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        grammar::parse_sequence(text).map(Self::from)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Compose: append `other`'s steps after this sequence's own.
    ///
    /// Taking `&mut self` and `&OperationSequence` means a sequence can never
    /// be appended to itself, and there is no null sequence to pass.
    pub fn append(&mut self, other: &OperationSequence) {
        self.operations.extend_from_slice(&other.operations);
    }

    /// The sequence that undoes this one: steps reversed, each inverted.
    pub fn inverse(&self) -> Self {
        self.operations.iter().rev().map(Operation::inverse).collect()
    }

    /// Replace this sequence with its inverse.
    pub fn invert(&mut self) {
        *self = self.inverse();
    }

    /// Fold `value` through every step in order.
    pub fn apply(&self, value: f64) -> f64 {
        self.operations.iter().fold(value, |acc, op| op.apply(acc))
    }
}

impl From<Vec<Operation>> for OperationSequence {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<Operation> for OperationSequence {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OperationSequence {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl fmt::Display for OperationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.operations {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl FromStr for OperationSequence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OperationSequence {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OperationSequence> for String {
    fn from(seq: OperationSequence) -> Self {
        seq.to_string()
    }
}

// --- tests -------------------------------------------------------------------
