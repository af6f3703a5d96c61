//! Shelfplan Core Data Structures
//!
//! This crate contains the core data structures for store layout editing:
//! - Transform: grid moves and quarter-turn rotation
//! - Layout: aisles, racks, sides, shelves and slots in an id-keyed arena
//! - Document: the wire shape exchanged with the layout API
//! - Search: product lookup across the layout tree

pub mod constants;
pub mod document;
pub mod ids;
pub mod layout;
pub mod search;
pub mod transform;

pub use constants::*;
pub use document::*;
pub use ids::*;
pub use layout::*;
pub use search::*;
pub use transform::*;
