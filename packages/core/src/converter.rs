//! Shortest-path conversion across the graph.
//!
//! Units with no direct edge are converted by finding the path with the
//! fewest edges between them (breadth-first, treating every edge as
//! two-way) and composing the per-hop sequences along it. Hops walked
//! against an edge's stored direction use a copy of that edge, inverted.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::conversion::Conversion;
use crate::graph::ConversionGraph;
use crate::sequence::OperationSequence;
use crate::types::Quantity;

/// Path engine bound to one [`ConversionGraph`].
///
/// The converter borrows the graph, so the graph cannot change while a
/// converter is alive. When the owner replaces the graph, build a new
/// converter for the new one.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'g> {
    graph: &'g ConversionGraph,
}

impl<'g> Converter<'g> {
    pub fn new(graph: &'g ConversionGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g ConversionGraph {
        self.graph
    }

    /// Convert `value` from `from` into `to`.
    ///
    /// Returns `None` when no chain of conversions joins the two units. A
    /// unit is never treated as convertible to itself.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Option<Quantity> {
        let conversion = self.conversion_between(from, to)?;
        Some(Quantity::new(conversion.apply(value), to))
    }

    /// The composite edge `from` → `to`: every hop's sequence, oriented along
    /// the path, appended in path order.
    pub fn conversion_between(&self, from: &str, to: &str) -> Option<Conversion> {
        let path = self.find_path(from, to)?;
        self.compose_path(&path)
    }

    /// The composite edge along an already-found path, first unit to last.
    ///
    /// Returns `None` if the path has fewer than two units or some hop has no
    /// edge in this graph.
    pub fn compose_path(&self, path: &[String]) -> Option<Conversion> {
        let (from, to) = (path.first()?, path.last()?);

        let mut composite = OperationSequence::new();
        for hop in path.windows(2) {
            let (here, next) = (hop[0].as_str(), hop[1].as_str());
            let mut edge = self.graph.lookup(here, next).ok().flatten()?;
            if !edge.runs_from(here) {
                edge.invert_in_place();
            }
            composite.append(edge.operations());
        }

        Conversion::new(from.as_str(), to.as_str(), composite).ok()
    }

    /// The fewest-edges path from `from` to `to`, both ends included.
    ///
    /// Among equally short paths, the one found first wins; that follows the
    /// graph's edge storage order, not any ordering of unit names.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut frontier: VecDeque<&str> = VecDeque::from([from]);
        // child -> the unit it was discovered from
        let mut parent: HashMap<&str, &str> = HashMap::new();

        while let Some(current) = frontier.pop_front() {
            let discovered = self.graph.neighbors(current, &visited);
            for &next in &discovered {
                visited.insert(next);
                parent.insert(next, current);
                frontier.push_back(next);
            }

            if discovered.iter().any(|u| *u == to) {
                let path = rebuild_path(to, &parent);
                tracing::debug!("path {from} -> {to}: {}", path.join(" -> "));
                return Some(path);
            }
        }

        tracing::debug!("no path {from} -> {to} ({} units reached)", visited.len());
        None
    }
}

// Walk parent links back from `to`; the start unit is the only one without a
// parent, so the walk ends there.
fn rebuild_path(to: &str, parent: &HashMap<&str, &str>) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut cursor = to;
    while let Some(&prev) = parent.get(cursor) {
        path.push(prev.to_string());
        cursor = prev;
    }
    path.reverse();
    path
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str, &str)]) -> ConversionGraph {
        ConversionGraph::from_conversions(
            edges
                .iter()
                .map(|(a, b, ops)| Conversion::parse(*a, *b, ops).unwrap()),
        )
    }

    fn temperature_and_length() -> ConversionGraph {
        graph(&[
            ("°C", "°F", "*9/5+32"),
            ("K", "°F", "-273.15*9/5+32"),
            ("m", "km", "*0.001"),
            ("m", "ft", "*3.28084"),
            ("ft", "in", "*12"),
        ])
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn converts_along_multi_hop_paths() {
        let g = temperature_and_length();
        let c = Converter::new(&g);

        let cases = [
            (10.5, "°C", "K", 283.65),
            (10.5, "°F", "°C", -11.94444),
            (10.5, "km", "in", 413385.8),
            (10.5, "ft", "km", 0.0032),
            (10.5, "km", "m", 10500.0),
        ];
        for (value, from, to, expected) in cases {
            let q = c.convert(value, from, to).unwrap();
            assert_eq!(q.unit, to);
            assert_close(q.value, expected, 0.1);
        }
    }

    #[test]
    fn disconnected_units_have_no_path() {
        let g = temperature_and_length();
        let c = Converter::new(&g);
        for (from, to) in [("A", "B"), ("m", "°C"), ("K", "°in"), ("m", "B")] {
            assert_eq!(c.convert(10.5, from, to), None, "{from} -> {to}");
        }
    }

    #[test]
    fn same_unit_has_no_path() {
        let g = temperature_and_length();
        assert_eq!(Converter::new(&g).convert(1.0, "m", "m"), None);
    }

    #[test]
    fn breadth_first_finds_shortest_path() {
        let g = graph(&[
            ("a", "b", "+2"),
            ("c", "d", "+2"),
            ("ab", "xy", "+1*2"),
            ("c", "a", "+2"),
        ]);
        let c = Converter::new(&g);

        assert_eq!(
            c.find_path("a", "d"),
            Some(vec!["a".to_string(), "c".to_string(), "d".to_string()])
        );
        let composite = c.conversion_between("a", "d").unwrap();
        assert_eq!(composite.operations().to_string(), "-2+2");
        assert_eq!(c.convert(1.0, "a", "d").unwrap().value, 1.0);
    }

    #[test]
    fn compose_path_reuses_a_found_path() {
        let g = temperature_and_length();
        let c = Converter::new(&g);
        let path = c.find_path("km", "in").unwrap();
        let composite = c.compose_path(&path).unwrap();
        assert_eq!(composite.unit_a(), "km");
        assert_eq!(composite.unit_b(), "in");
        assert_eq!(composite.operations().to_string(), "/0.001*3.28084*12");
        assert_eq!(Some(composite), c.conversion_between("km", "in"));

        assert_eq!(c.compose_path(&["m".to_string()]), None);
        assert_eq!(c.compose_path(&["m".to_string(), "in".to_string()]), None);
    }

    #[test]
    fn ties_follow_edge_storage_order() {
        // Two two-hop routes from s to t; the one whose first edge was stored
        // first wins, regardless of unit names.
        let g = graph(&[
            ("s", "z", "*2"),
            ("s", "a", "*3"),
            ("a", "t", "*1"),
            ("z", "t", "*1"),
        ]);
        let c = Converter::new(&g);
        assert_eq!(
            c.find_path("s", "t"),
            Some(vec!["s".to_string(), "z".to_string(), "t".to_string()])
        );
        assert_eq!(c.convert(1.0, "s", "t").unwrap().value, 2.0);
    }

    #[test]
    fn direct_edge_reversed_is_inverted() {
        let g = graph(&[("°C", "°F", "*9/5+32")]);
        let c = Converter::new(&g);
        assert_close(c.convert(212.0, "°F", "°C").unwrap().value, 100.0, 1e-9);
        // The stored edge is unchanged by the traversal.
        assert_eq!(
            g.lookup("°C", "°F").unwrap().unwrap().operations().to_string(),
            "*9/5+32"
        );
    }

    #[test]
    fn division_steps_follow_ieee_semantics() {
        let g = graph(&[("x", "y", "/0.5")]);
        let q = Converter::new(&g).convert(f64::INFINITY, "x", "y").unwrap();
        assert!(q.value.is_infinite());
    }
}
