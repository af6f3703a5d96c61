//! Editing components for racks and aisles
//!
//! Components keep per-entity UI state (selection, hidden side, selected
//! shelf) and read the layout tree through shared references. They never
//! mutate the tree: each operation returns an event describing the change,
//! or `None` when the operation is a no-op at a boundary.

mod aisle;
mod events;
mod rack;
mod throttle;

pub use aisle::AisleEditor;
pub use events::{AisleEvent, RackEvent, RackListAction};
pub use rack::RackEditor;
pub use throttle::KeyThrottle;

/// Direction of a shelf or slot count change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    Add,
    Remove,
}

impl CountChange {
    /// Parse `add` / `remove` (also `+` / `-`)
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Some(CountChange::Add),
            "remove" | "rm" | "-" => Some(CountChange::Remove),
            _ => None,
        }
    }
}
