//! mensur-core: the leaf crate every other mensur crate builds on.
//!
//! Holds only what the whole workspace agrees on: the segment id type
//! used to address bore-network arenas.

pub mod ids;

pub use ids::SegId;
