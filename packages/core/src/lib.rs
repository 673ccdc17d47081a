//! Unit-conversion graph engine.
//!
//! Units are opaque names joined by user-defined conversions: each edge
//! carries an invertible sequence of arithmetic steps such as `*9/5+32`.
//! Units without a direct edge are converted along the shortest chain of
//! edges, with steps composed and, where an edge is walked backwards,
//! inverted.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sequence`] | [`Operation`] and [`OperationSequence`]: composition, inversion, application |
//! | [`grammar`] | Parser for the conversion literal; [`ParseError`] |
//! | [`conversion`] | The [`Conversion`] edge and the unparsed [`ConversionRecord`] triple |
//! | [`graph`] | [`ConversionGraph`], the edge store, plus metric-prefix generation |
//! | [`converter`] | [`Converter`], breadth-first path search and composite conversion |
//! | [`prefix`] | The fixed metric prefix table |
//! | [`listing`] | Line-oriented conversions files |
//! | [`render`] | Human-readable text rendering |
//!
//! # Quick start
//!
//! ```rust
//! use unitgraph::{Conversion, ConversionGraph, Converter};
//!
//! let mut graph = ConversionGraph::new();
//! graph.add(Conversion::parse("°C", "°F", "*9/5+32").unwrap());
//! graph.add(Conversion::parse("K", "°F", "-273.15*9/5+32").unwrap());
//!
//! let kelvin = Converter::new(&graph).convert(10.5, "°C", "K").unwrap();
//! assert!((kelvin.value - 283.65).abs() < 1e-9);
//! ```
//!
//! The graph has no internal locking. Share it between threads behind a
//! `RwLock`, or publish immutable snapshots and bind a [`Converter`] to one
//! snapshot per request.

pub mod conversion;
pub mod converter;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod listing;
pub mod prefix;
pub mod render;
pub mod sequence;
pub mod types;

pub use conversion::{Conversion, ConversionError, ConversionRecord};
pub use converter::Converter;
pub use error::ArgumentError;
pub use grammar::ParseError;
pub use graph::{ConversionGraph, PopulateOutcome};
pub use listing::{load_listing, ListingError};
pub use sequence::{Operation, OperationSequence, Operator};
pub use types::Quantity;
