use std::collections::{HashMap, HashSet};

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use crate::conversion::{Conversion, ConversionError, ConversionRecord};
use crate::error::ArgumentError;
use crate::prefix::{metric_prefix_of, METRIC_PREFIXES};

/// The set of direct conversions known to the engine.
///
/// The graph is not a storage engine. Load conversions from wherever you keep
/// them, add them here, and hand the graph to a [`Converter`] to query it.
///
/// Edges are keyed by the *unordered* pair of their units, so there is at
/// most one conversion between any two units. Adding a second one for the
/// same pair is refused rather than overwriting the first. Iteration,
/// [`neighbors`](Self::neighbors), and therefore path tie-breaking all follow
/// insertion order.
///
/// [`Converter`]: crate::converter::Converter
#[derive(Debug, Clone, Default)]
pub struct ConversionGraph {
    edges: IndexMap<UnitPair, Conversion>,
    // unit -> keys of its edges, in the same relative order as `edges`
    incident: HashMap<String, IndexSet<UnitPair>>,
}

/// Outcome of adding one record through [`ConversionGraph::populate`].
#[derive(Debug, Clone, PartialEq)]
pub enum PopulateOutcome {
    Added,
    /// An edge between the same two units was already present.
    Duplicate,
    Rejected(ConversionError),
}

impl PopulateOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, PopulateOutcome::Added)
    }
}

impl ConversionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from conversions, keeping the first edge for any pair.
    pub fn from_conversions(iter: impl IntoIterator<Item = Conversion>) -> Self {
        let mut g = Self::new();
        for c in iter {
            g.add(c);
        }
        g
    }

    /// Insert an edge unless its unit pair is already taken.
    ///
    /// Returns `false`, leaving the graph untouched, for a duplicate pair.
    pub fn add(&mut self, conversion: Conversion) -> bool {
        let key = UnitPair::new(conversion.unit_a(), conversion.unit_b());
        match self.edges.entry(key) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    "conversion {} <-> {} already present as {}",
                    conversion.unit_a(),
                    conversion.unit_b(),
                    existing.get()
                );
                false
            }
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                for unit in [&key.0, &key.1] {
                    self.incident
                        .entry(unit.clone())
                        .or_default()
                        .insert(key.clone());
                }
                slot.insert(conversion);
                true
            }
        }
    }

    /// Remove the edge between two units. Returns whether one was removed.
    ///
    /// The remaining edges keep their relative order.
    pub fn delete(&mut self, unit1: &str, unit2: &str) -> Result<bool, ArgumentError> {
        let key = UnitPair::checked(unit1, unit2)?;
        if self.edges.shift_remove(&key).is_none() {
            return Ok(false);
        }
        for unit in [&key.0, &key.1] {
            if let Some(pairs) = self.incident.get_mut(unit) {
                pairs.shift_remove(&key);
                if pairs.is_empty() {
                    self.incident.remove(unit);
                }
            }
        }
        Ok(true)
    }

    pub fn exists(&self, unit1: &str, unit2: &str) -> Result<bool, ArgumentError> {
        let key = UnitPair::checked(unit1, unit2)?;
        Ok(self.edges.contains_key(&key))
    }

    /// A copy of the edge between two units, in either order.
    ///
    /// The copy is owned by the caller, who may invert it freely.
    pub fn lookup(&self, unit1: &str, unit2: &str) -> Result<Option<Conversion>, ArgumentError> {
        let key = UnitPair::checked(unit1, unit2)?;
        Ok(self.edges.get(&key).cloned())
    }

    /// Every unit with a direct edge to `unit`, minus those in `excluded`,
    /// in edge storage order.
    ///
    /// Only the edges touching `unit` are visited.
    pub fn neighbors<'g>(&'g self, unit: &str, excluded: &HashSet<&str>) -> Vec<&'g str> {
        let Some(pairs) = self.incident.get(unit) else {
            return vec![];
        };
        pairs
            .iter()
            .map(|pair| pair.opposite(unit))
            .filter(|other| !excluded.contains(*other))
            .collect()
    }

    /// Add an edge from `base` to each of its metric-prefixed variants.
    ///
    /// `base` must not itself carry a prefix. Pairs that already have an edge
    /// are skipped. Returns how many edges were added.
    pub fn add_metric_prefix_edges(&mut self, base: &str) -> Result<usize, ArgumentError> {
        if base.is_empty() {
            return Err(ArgumentError::EmptyUnit);
        }
        if let Some(prefix) = metric_prefix_of(base) {
            tracing::debug!("{base} starts with metric prefix {}", prefix.symbol);
            return Err(ArgumentError::AlreadyPrefixed(base.to_string()));
        }

        let mut added = 0;
        for prefix in METRIC_PREFIXES.iter() {
            let prefixed = format!("{}{}", prefix.symbol, base);
            let conversion = Conversion::new(base, prefixed.as_str(), prefix.sequence())?;
            if self.add(conversion) {
                added += 1;
            } else {
                tracing::debug!("skipping metric edge {base} <-> {prefixed}: already present");
            }
        }
        Ok(added)
    }

    /// Parse and add each record in order, reporting one outcome per record.
    ///
    /// A bad record never stops the rest of the batch.
    pub fn populate(
        &mut self,
        records: impl IntoIterator<Item = ConversionRecord>,
    ) -> Vec<PopulateOutcome> {
        records
            .into_iter()
            .map(|record| match record.to_conversion() {
                Ok(conversion) => {
                    if self.add(conversion) {
                        PopulateOutcome::Added
                    } else {
                        PopulateOutcome::Duplicate
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "rejected conversion {} -> {} ({:?}): {e}",
                        record.from,
                        record.to,
                        record.operations
                    );
                    PopulateOutcome::Rejected(e)
                }
            })
            .collect()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.incident.clear();
    }

    /// Iterate over all edges in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.edges.values()
    }

    /// Every unit that appears on some edge, in order of first appearance.
    pub fn units(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for c in self.edges.values() {
            for u in [c.unit_a(), c.unit_b()] {
                if seen.insert(u) {
                    out.push(u);
                }
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a ConversionGraph {
    type Item = &'a Conversion;
    type IntoIter = indexmap::map::Values<'a, UnitPair, Conversion>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.values()
    }
}

/// Storage key: two unit identifiers held in sorted order so that `(a, b)`
/// and `(b, a)` hash and compare the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitPair(String, String);

impl UnitPair {
    fn new(unit1: &str, unit2: &str) -> Self {
        if unit1 <= unit2 {
            UnitPair(unit1.to_string(), unit2.to_string())
        } else {
            UnitPair(unit2.to_string(), unit1.to_string())
        }
    }

    // `unit` must be one of the two; the other one is returned.
    fn opposite(&self, unit: &str) -> &str {
        if self.0 == unit {
            &self.1
        } else {
            &self.0
        }
    }

    fn checked(unit1: &str, unit2: &str) -> Result<Self, ArgumentError> {
        if unit1 == unit2 {
            return Err(ArgumentError::SameUnit(unit1.to_string()));
        }
        Ok(Self::new(unit1, unit2))
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(a: &str, b: &str, ops: &str) -> Conversion {
        Conversion::parse(a, b, ops).unwrap()
    }

    fn length_graph() -> ConversionGraph {
        ConversionGraph::from_conversions([
            conv("m", "km", "/1000"),
            conv("m", "ft", "*3.28084"),
            conv("ft", "in", "*12"),
        ])
    }

    #[test]
    fn add_and_lookup_in_either_order() {
        let g = length_graph();
        assert_eq!(g.len(), 3);
        assert_eq!(g.lookup("km", "m").unwrap(), Some(conv("m", "km", "/1000")));
        assert_eq!(g.exists("ft", "m"), Ok(true));
        assert_eq!(g.exists("km", "in"), Ok(false));
        assert_eq!(g.lookup("km", "in"), Ok(None));
    }

    #[test]
    fn duplicate_pair_is_refused_without_change() {
        let mut g = length_graph();
        let before: Vec<Conversion> = g.iter().cloned().collect();

        assert!(!g.add(conv("km", "m", "*1000")));
        assert!(!g.add(conv("m", "km", "*0.001")));

        let after: Vec<Conversion> = g.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn same_unit_queries_are_rejected() {
        let mut g = length_graph();
        assert_eq!(g.exists("m", "m"), Err(ArgumentError::SameUnit("m".into())));
        assert!(g.lookup("m", "m").is_err());
        assert!(g.delete("m", "m").is_err());
    }

    #[test]
    fn delete_preserves_order_of_the_rest() {
        let mut g = length_graph();
        assert_eq!(g.delete("ft", "m"), Ok(true));
        assert_eq!(g.delete("ft", "m"), Ok(false));
        let pairs: Vec<String> = g.iter().map(|c| c.to_string()).collect();
        assert_eq!(pairs, vec!["m km /1000", "ft in *12"]);
    }

    #[test]
    fn lookup_returns_an_independent_copy() {
        let g = length_graph();
        let mut copy = g.lookup("m", "km").unwrap().unwrap();
        copy.invert_in_place();
        assert_eq!(
            g.lookup("m", "km").unwrap().unwrap().operations().to_string(),
            "/1000"
        );
    }

    #[test]
    fn neighbors_follow_storage_order_and_exclusions() {
        let mut g = length_graph();
        g.add(conv("yd", "m", "/1.0936"));

        let none = HashSet::new();
        assert_eq!(g.neighbors("m", &none), vec!["km", "ft", "yd"]);

        let excluded: HashSet<&str> = ["ft"].into_iter().collect();
        assert_eq!(g.neighbors("m", &excluded), vec!["km", "yd"]);
        assert!(g.neighbors("lightyear", &none).is_empty());
    }

    #[test]
    fn neighbors_keep_storage_order_after_delete_and_readd() {
        let mut g = length_graph();
        g.add(conv("yd", "m", "/1.0936"));

        assert_eq!(g.delete("m", "km"), Ok(true));
        let none = HashSet::new();
        assert_eq!(g.neighbors("m", &none), vec!["ft", "yd"]);
        assert!(g.neighbors("km", &none).is_empty());

        // Re-adding puts the edge at the end of storage order.
        g.add(conv("km", "m", "*1000"));
        assert_eq!(g.neighbors("m", &none), vec!["ft", "yd", "km"]);
        let stored: Vec<String> = g.iter().map(|c| c.to_string()).collect();
        assert_eq!(stored.last().map(String::as_str), Some("km m *1000"));
    }

    #[test]
    fn clear_drops_neighbors() {
        let mut g = length_graph();
        g.clear();
        assert!(g.is_empty());
        assert!(g.neighbors("m", &HashSet::new()).is_empty());
    }

    #[test]
    fn metric_prefix_edges_for_deca_symbol_as_base() {
        let mut g = ConversionGraph::new();
        assert_eq!(g.add_metric_prefix_edges("da"), Ok(12));
        assert!(g.exists("da", "kda").unwrap());
    }

    #[test]
    fn metric_prefix_edges_for_bare_unit() {
        let mut g = ConversionGraph::new();
        assert_eq!(g.add_metric_prefix_edges("m"), Ok(12));
        assert_eq!(g.len(), 12);
        assert!(g.exists("m", "km").unwrap());
        assert!(g.exists("m", "μm").unwrap());
        assert!(g.exists("m", "dam").unwrap());
        assert_eq!(g.lookup("m", "cm").unwrap().unwrap().apply(1.5), 150.0);
    }

    #[test]
    fn metric_prefix_edges_skip_existing_pairs() {
        let mut g = ConversionGraph::new();
        g.add(conv("km", "m", "*1000"));
        assert_eq!(g.add_metric_prefix_edges("m"), Ok(11));
        assert_eq!(g.len(), 12);
        // The hand-written edge survives.
        assert_eq!(g.lookup("m", "km").unwrap().unwrap().unit_a(), "km");
    }

    #[test]
    fn metric_prefix_edges_reject_prefixed_base() {
        let mut g = ConversionGraph::new();
        assert_eq!(
            g.add_metric_prefix_edges("km"),
            Err(ArgumentError::AlreadyPrefixed("km".into()))
        );
        assert_eq!(g.add_metric_prefix_edges(""), Err(ArgumentError::EmptyUnit));
        assert!(g.is_empty());
    }

    #[test]
    fn populate_reports_each_record() {
        let mut g = ConversionGraph::new();
        let outcomes = g.populate([
            ConversionRecord::new("°C", "°F", "*9/5+32"),
            ConversionRecord::new("°F", "°C", "-32*5/9"),
            ConversionRecord::new("K", "°C", "-273.15x"),
            ConversionRecord::new("K", "K", "*1"),
            ConversionRecord::new("K", "°F", "-273.15*9/5+32"),
        ]);

        assert_eq!(outcomes[0], PopulateOutcome::Added);
        assert_eq!(outcomes[1], PopulateOutcome::Duplicate);
        assert!(matches!(
            outcomes[2],
            PopulateOutcome::Rejected(ConversionError::Parse(_))
        ));
        assert!(matches!(
            outcomes[3],
            PopulateOutcome::Rejected(ConversionError::Argument(_))
        ));
        assert!(outcomes[4].is_added());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn units_in_first_seen_order() {
        let g = length_graph();
        assert_eq!(g.units(), vec!["m", "km", "ft", "in"]);
    }
}
