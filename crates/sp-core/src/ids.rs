//! Stable keys and display labels
//!
//! Aisles and racks are keyed by opaque uuids that never change once
//! assigned. The path-shaped labels shown to users (`A1-R2`, `A1-R2-L-SH3-S1`)
//! are derived from the current position in the tree whenever they are needed.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable key of an aisle in the layout arena
pub type AisleId = Uuid;

/// Stable key of a rack in the layout arena
pub type RackId = Uuid;

/// One face of a rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Single-letter code used inside display ids
    pub fn code(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }

    /// Parse `L`/`R` or `left`/`right`, case-insensitive
    pub fn parse(text: &str) -> Option<Side> {
        match text.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(Side::Left),
            "r" | "right" => Some(Side::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Display label of a rack: `A{aisle}-R{index+1}`
pub fn rack_label(aisle_number: u32, rack_index: usize) -> String {
    format!("A{}-R{}", aisle_number, rack_index + 1)
}

/// Display label of a rack side: `{rack}-{L|R}`
pub fn side_label(rack: &str, side: Side) -> String {
    format!("{}-{}", rack, side.code())
}

/// Display label of a shelf: `{rack}-{L|R}-SH{n}`
pub fn shelf_label(rack: &str, side: Side, shelf_index: usize) -> String {
    format!("{}-SH{}", side_label(rack, side), shelf_index + 1)
}

/// Display label of a slot: `{rack}-{L|R}-SH{n}-S{m}`
pub fn slot_label(rack: &str, side: Side, shelf_index: usize, slot_index: usize) -> String {
    format!("{}-S{}", shelf_label(rack, side, shelf_index), slot_index + 1)
}

/// Position of a slot inside one rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPath {
    pub side: Side,
    pub shelf_index: usize,
    pub slot_index: usize,
}

impl SlotPath {
    pub fn new(side: Side, shelf_index: usize, slot_index: usize) -> Self {
        Self {
            side,
            shelf_index,
            slot_index,
        }
    }

    /// Decode a slot display id into its rack label and path.
    ///
    /// The id is read from the right so the rack label may itself contain
    /// dashes. Shelf and slot numbers are 1-based in the id.
    pub fn parse(slot_id: &str) -> Option<(String, SlotPath)> {
        let mut parts = slot_id.rsplitn(4, '-');
        let slot = parts.next()?;
        let shelf = parts.next()?;
        let side = parts.next()?;
        let rack = parts.next()?;
        if rack.is_empty() {
            return None;
        }

        let slot_number = parse_numbered(slot, "S")?;
        let shelf_number = parse_numbered(shelf, "SH")?;
        let side = Side::parse(side)?;

        Some((
            rack.to_string(),
            SlotPath::new(side, shelf_number - 1, slot_number - 1),
        ))
    }

    /// Display id of this path within the given rack
    pub fn label(&self, rack: &str) -> String {
        slot_label(rack, self.side, self.shelf_index, self.slot_index)
    }
}

/// Parse `{prefix}{n}` with `n >= 1`
fn parse_numbered(part: &str, prefix: &str) -> Option<usize> {
    let digits = part.strip_prefix(prefix)?;
    let number: usize = digits.parse().ok()?;
    (number >= 1).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let rack = rack_label(2, 0);
        assert_eq!(rack, "A2-R1");
        assert_eq!(side_label(&rack, Side::Right), "A2-R1-R");
        assert_eq!(shelf_label(&rack, Side::Left, 3), "A2-R1-L-SH4");
        assert_eq!(slot_label(&rack, Side::Left, 3, 1), "A2-R1-L-SH4-S2");
    }

    #[test]
    fn test_slot_path_parse() {
        let (rack, path) = SlotPath::parse("A0-R3-R-SH2-S1").unwrap();
        assert_eq!(rack, "A0-R3");
        assert_eq!(path, SlotPath::new(Side::Right, 1, 0));
        assert_eq!(path.label(&rack), "A0-R3-R-SH2-S1");
    }

    #[test]
    fn test_slot_path_parse_long_side_names() {
        let (_, path) = SlotPath::parse("A1-R1-left-SH1-S6").unwrap();
        assert_eq!(path, SlotPath::new(Side::Left, 0, 5));
    }

    #[test]
    fn test_slot_path_parse_rejects_malformed() {
        assert!(SlotPath::parse("").is_none());
        assert!(SlotPath::parse("A1-R1-L-SH1").is_none());
        assert!(SlotPath::parse("A1-R1-X-SH1-S1").is_none());
        assert!(SlotPath::parse("A1-R1-L-SH0-S1").is_none());
        assert!(SlotPath::parse("A1-R1-L-SHx-S1").is_none());
        assert!(SlotPath::parse("-L-SH1-S1").is_none());
    }
}
