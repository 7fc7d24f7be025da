//! mensur-graph: bore network layer for mensur.
//!
//! Provides:
//! - Segment arena with chain and junction topology (Segment, ChildLink, Graph)
//! - Incremental builder with group resolution and validation
//! - Subdivision of sections into short slices for profile output
//!
//! # Example
//!
//! ```
//! use mensur_graph::{GraphBuilder, MAIN_GROUP};
//!
//! let mut builder = GraphBuilder::new();
//! builder.begin_group(MAIN_GROUP).unwrap();
//! builder.add_section(0.012, 0.012, 0.3).unwrap();
//! builder.add_section(0.012, 0.02, 0.2).unwrap();
//! builder.add_open_end().unwrap();
//! builder.end_group().unwrap();
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.len(), 3);
//! assert_eq!(graph.chain_tail(graph.head()).index(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod refine;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{GraphBuilder, MAIN_GROUP};
pub use error::{GraphError, GraphResult};
pub use graph::{ChildLink, Graph, Junction, Segment};
