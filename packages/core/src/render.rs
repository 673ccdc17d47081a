//! Human-readable text rendering of conversions, graphs, and paths.
//!
//! The output is stable plain text for terminals and logs. It is not a
//! canonical format; the conversions file layout in [`crate::listing`] is the
//! one meant to be read back.

use crate::conversion::Conversion;
use crate::graph::ConversionGraph;
use crate::types::Quantity;

/// Render a single edge as `from → to  operations`.
pub fn render_conversion(conversion: &Conversion) -> String {
    format!(
        "{} → {}  {}",
        conversion.unit_a(),
        conversion.unit_b(),
        conversion.operations()
    )
}

/// Render the whole graph, one edge per line in storage order, with the
/// unit columns padded so the operation sequences line up.
///
/// ```text
/// Conversion Graph  3 edges, 4 units
/// ──────────────────────────────────
///   °C  → °F   *9/5+32
///   K   → °F   -273.15*9/5+32
///   m   → ft   *3.28084
/// ```
pub fn render_graph(graph: &ConversionGraph) -> String {
    let edges = graph.len();
    let units = graph.units().len();
    let header = format!(
        "Conversion Graph  {} edge{}, {} unit{}",
        edges,
        plural(edges),
        units,
        plural(units)
    );
    let rule = "─".repeat(header.chars().count());
    let mut out = format!("{header}\n{rule}\n");

    if graph.is_empty() {
        out.push_str("  (no conversions)\n");
        return out;
    }

    let width_a = graph.iter().map(|c| c.unit_a().chars().count()).max().unwrap_or(0);
    let width_b = graph.iter().map(|c| c.unit_b().chars().count()).max().unwrap_or(0);
    for c in graph {
        out.push_str(&format!(
            "  {:<wa$} → {:<wb$}  {}\n",
            c.unit_a(),
            c.unit_b(),
            c.operations(),
            wa = width_a,
            wb = width_b,
        ));
    }
    out
}

/// Render a path and the composite conversion found for it.
///
/// ```text
/// °C → °F → K
/// operations: *9/5+32-32*5/9+273.15
/// ```
pub fn render_path(path: &[String], composite: &Conversion) -> String {
    format!(
        "{}\noperations: {}\n",
        path.join(" → "),
        composite.operations()
    )
}

/// Render a conversion result as `10.5 °C = 283.65 K`.
pub fn render_result(input: &Quantity, output: &Quantity) -> String {
    format!("{input} = {output}")
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

// --- tests -------------------------------------------------------------------
