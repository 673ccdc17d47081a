//! The fixed table of metric prefixes used by bulk edge generation.

use crate::sequence::{Operation, OperationSequence, Operator};

/// A metric prefix and the step that turns a base-unit value into a value in
/// the prefixed unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPrefix {
    pub symbol: &'static str,
    pub step: Operation,
}

impl MetricPrefix {
    const fn new(symbol: &'static str, operator: Operator, factor: f64) -> Self {
        Self {
            symbol,
            step: Operation::from_positive(operator, factor),
        }
    }

    /// The single-step sequence converting `base` into `symbol + base`.
    pub fn sequence(&self) -> OperationSequence {
        OperationSequence::from(vec![self.step])
    }
}

/// Prefixes in generation order. Larger-than-base prefixes divide and
/// smaller ones multiply, so every factor is an exact integer.
pub static METRIC_PREFIXES: [MetricPrefix; 12] = [
    MetricPrefix::new("T", Operator::Divide, 1e12),
    MetricPrefix::new("G", Operator::Divide, 1e9),
    MetricPrefix::new("M", Operator::Divide, 1e6),
    MetricPrefix::new("k", Operator::Divide, 1e3),
    MetricPrefix::new("h", Operator::Divide, 1e2),
    MetricPrefix::new("da", Operator::Divide, 1e1),
    MetricPrefix::new("d", Operator::Multiply, 1e1),
    MetricPrefix::new("c", Operator::Multiply, 1e2),
    MetricPrefix::new("m", Operator::Multiply, 1e3),
    MetricPrefix::new("μ", Operator::Multiply, 1e6),
    MetricPrefix::new("n", Operator::Multiply, 1e9),
    MetricPrefix::new("p", Operator::Multiply, 1e12),
];

/// The prefix `unit` starts with, if any.
///
/// A unit consisting of nothing but a prefix symbol (`m` for metre, `d` for
/// day) is treated as unprefixed. `da` sits before `d` in the table, so
/// `dag` resolves to deca rather than deci.
pub fn metric_prefix_of(unit: &str) -> Option<&'static MetricPrefix> {
    if METRIC_PREFIXES.iter().any(|p| p.symbol == unit) {
        return None;
    }
    METRIC_PREFIXES
        .iter()
        .find(|p| unit.len() > p.symbol.len() && unit.starts_with(p.symbol))
}

pub fn has_metric_prefix(unit: &str) -> bool {
    metric_prefix_of(unit).is_some()
}
