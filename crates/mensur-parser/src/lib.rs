//! Bore description parsing.
//!
//! Turns the comma-separated mensur text format into a validated
//! [`mensur_graph::Graph`]. See [`reader`] for the format itself.

pub mod error;
pub(crate) mod expr;
pub mod reader;

pub use error::{ParseError, ParseResult};
pub use reader::{parse_str, read_graph};
