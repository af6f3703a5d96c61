//! Fixture entity types: slots, shelves, rack sides, racks and aisles

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::constants::{DEFAULT_RACK_SIZE, MAX_SHELVES, MAX_SLOTS, MIN_SHELVES, MIN_SLOTS, NEW_SHELF_SLOTS};
use crate::ids::{AisleId, RackId, Side, SlotPath};
use crate::transform::Degree;

/// Non-negative price in cents, written with exactly two decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// Round a decimal amount to whole cents. Negative or non-finite amounts are rejected.
    pub fn from_amount(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Self((amount * 100.0).round() as u64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Error returned when a price string cannot be read
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid price: {0}")]
pub struct PriceParseError(pub String);

impl FromStr for Price {
    type Err = PriceParseError;

    /// Empty input reads as zero, matching unpriced slots
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Price::ZERO);
        }
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| PriceParseError(trimmed.to_string()))?;
        Price::from_amount(amount).ok_or_else(|| PriceParseError(trimmed.to_string()))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        // Stored documents carry prices as strings, numbers or ""
        let price = match Raw::deserialize(deserializer)? {
            Raw::Number(amount) => Price::from_amount(amount),
            Raw::Text(text) => text.parse().ok(),
        };
        Ok(price.unwrap_or_else(|| {
            tracing::warn!("Unreadable price in document, using 0.00");
            Price::ZERO
        }))
    }
}

/// One product-display cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    pub product_id: String,
    pub product_name: String,
    pub description: String,
    pub price: Price,
    pub quantity: u32,
}

impl Slot {
    /// Empty slot appended by editing; `number` is its 1-based position on the shelf
    pub fn blank(number: usize) -> Self {
        Self {
            product_id: String::new(),
            product_name: format!("Product {}", number),
            description: format!("Description for slot {}", number),
            price: Price::ZERO,
            quantity: 0,
        }
    }
}

/// Partial update of a slot's product fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotPatch {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub quantity: Option<u32>,
}

impl SlotPatch {
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.product_name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }

    /// Merge the present fields into `slot`
    pub fn apply(&self, slot: &mut Slot) {
        if let Some(product_id) = &self.product_id {
            slot.product_id = product_id.clone();
        }
        if let Some(product_name) = &self.product_name {
            slot.product_name = product_name.clone();
        }
        if let Some(description) = &self.description {
            slot.description = description.clone();
        }
        if let Some(price) = self.price {
            slot.price = price;
        }
        if let Some(quantity) = self.quantity {
            slot.quantity = quantity;
        }
    }
}

/// Ordered row of slots, left to right
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shelf {
    pub slots: Vec<Slot>,
}

impl Shelf {
    /// Shelf of `count` blank slots
    pub fn blank(count: usize) -> Self {
        Self {
            slots: (1..=count).map(Slot::blank).collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Append a blank slot. Returns false at the upper bound.
    pub fn add_slot(&mut self) -> bool {
        if self.slots.len() >= MAX_SLOTS {
            return false;
        }
        self.slots.push(Slot::blank(self.slots.len() + 1));
        true
    }

    /// Drop the last slot. Returns false at the lower bound.
    pub fn remove_slot(&mut self) -> bool {
        if self.slots.len() <= MIN_SLOTS {
            return false;
        }
        self.slots.pop();
        true
    }
}

/// One face of a rack, shelves ordered bottom to top
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RackSide {
    pub shelves: Vec<Shelf>,
}

impl RackSide {
    pub fn new(shelves: Vec<Shelf>) -> Self {
        Self { shelves }
    }

    /// Always equal to `shelves.len()`
    pub fn shelves_count(&self) -> usize {
        self.shelves.len()
    }

    /// Slot count of each shelf, in shelf order
    pub fn slots_per_shelf(&self) -> Vec<usize> {
        self.shelves.iter().map(Shelf::slot_count).collect()
    }

    /// Append a shelf of blank slots. Returns false at the upper bound.
    pub fn add_shelf(&mut self) -> bool {
        if self.shelves.len() >= MAX_SHELVES {
            return false;
        }
        self.shelves.push(Shelf::blank(NEW_SHELF_SLOTS));
        true
    }

    /// Drop the top shelf. Returns false at the lower bound.
    pub fn remove_shelf(&mut self) -> bool {
        if self.shelves.len() <= MIN_SHELVES {
            return false;
        }
        self.shelves.pop();
        true
    }

    pub fn shelf(&self, index: usize) -> Option<&Shelf> {
        self.shelves.get(index)
    }

    pub fn shelf_mut(&mut self, index: usize) -> Option<&mut Shelf> {
        self.shelves.get_mut(index)
    }

    pub fn slot_count(&self) -> usize {
        self.shelves.iter().map(Shelf::slot_count).sum()
    }
}

/// Both faces of a rack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sides {
    pub left: RackSide,
    pub right: RackSide,
}

impl Sides {
    pub fn get(&self, side: Side) -> &RackSide {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut RackSide {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn slot(&self, path: SlotPath) -> Option<&Slot> {
        self.get(path.side)
            .shelf(path.shelf_index)?
            .slots
            .get(path.slot_index)
    }

    pub fn slot_mut(&mut self, path: SlotPath) -> Option<&mut Slot> {
        self.get_mut(path.side)
            .shelf_mut(path.shelf_index)?
            .slots
            .get_mut(path.slot_index)
    }
}

/// Which faces of a rack are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RackType {
    /// Double-sided
    #[default]
    DRack,
    /// Left face only, right hidden
    LRack,
    /// Right face only, left hidden
    RRack,
}

impl RackType {
    pub fn from_hidden_side(hidden: Option<Side>) -> Self {
        match hidden {
            None => RackType::DRack,
            Some(Side::Left) => RackType::RRack,
            Some(Side::Right) => RackType::LRack,
        }
    }

    pub fn hidden_side(self) -> Option<Side> {
        match self {
            RackType::DRack => None,
            RackType::LRack => Some(Side::Right),
            RackType::RRack => Some(Side::Left),
        }
    }

    pub fn is_visible(self, side: Side) -> bool {
        self.hidden_side() != Some(side)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RackType::DRack => "d-rack",
            RackType::LRack => "l-rack",
            RackType::RRack => "r-rack",
        }
    }

    /// Parse the wire name (`d-rack`, `l-rack`, `r-rack`)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "d-rack" => Some(RackType::DRack),
            "l-rack" => Some(RackType::LRack),
            "r-rack" => Some(RackType::RRack),
            _ => None,
        }
    }
}

impl fmt::Display for RackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Written as the wire name in every format, so RON drafts and JSON agree
impl Serialize for RackType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RackType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        RackType::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rack type: {}", name)))
    }
}

/// Fixed rack footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RackSize {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Default for RackSize {
    fn default() -> Self {
        let [width, depth, height] = DEFAULT_RACK_SIZE;
        Self {
            width,
            depth,
            height,
        }
    }
}

/// A double- or single-sided fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Rack {
    pub id: RackId,
    /// Position in the parent aisle's frame
    pub position: Vec3,
    pub degree: Degree,
    pub rack_type: RackType,
    /// Both faces, including a hidden one
    pub sides: Sides,
    pub size: RackSize,
    /// Decorative display color
    pub color: String,
}

impl Rack {
    pub fn new(position: Vec3, rack_type: RackType, sides: Sides) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            degree: Degree::IDENTITY,
            rack_type,
            sides,
            size: RackSize::default(),
            color: String::new(),
        }
    }

    pub fn side(&self, side: Side) -> &RackSide {
        self.sides.get(side)
    }

    pub fn slot(&self, path: SlotPath) -> Option<&Slot> {
        self.sides.slot(path)
    }
}

/// A row of racks sharing one base frame
#[derive(Debug, Clone, PartialEq)]
pub struct Aisle {
    pub id: AisleId,
    /// Sequential number used in display labels and on the wire
    pub number: u32,
    /// World position of the aisle frame
    pub position: Vec3,
    pub degree: Degree,
    /// Racks in display order
    pub racks: Vec<RackId>,
}

impl Aisle {
    pub fn new(number: u32, position: Vec3) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            position,
            degree: Degree::IDENTITY,
            racks: Vec::new(),
        }
    }

    pub fn rack_index(&self, rack_id: RackId) -> Option<usize> {
        self.racks.iter().position(|id| *id == rack_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_format_and_parse() {
        assert_eq!(Price::from_cents(1234).to_string(), "12.34");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!("12.3".parse::<Price>().unwrap(), Price::from_cents(1230));
        assert_eq!("".parse::<Price>().unwrap(), Price::ZERO);
        assert!("-1".parse::<Price>().is_err());
        assert!("cheap".parse::<Price>().is_err());
    }

    #[test]
    fn test_price_serde_lenient() {
        let from_text: Price = serde_json::from_str("\"19.99\"").unwrap();
        let from_number: Price = serde_json::from_str("19.99").unwrap();
        let from_empty: Price = serde_json::from_str("\"\"").unwrap();
        assert_eq!(from_text, Price::from_cents(1999));
        assert_eq!(from_number, Price::from_cents(1999));
        assert_eq!(from_empty, Price::ZERO);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"19.99\"");
    }

    #[test]
    fn test_side_derived_counts() {
        let mut side = RackSide::new(vec![Shelf::blank(3), Shelf::blank(2)]);
        assert_eq!(side.shelves_count(), 2);
        assert_eq!(side.slots_per_shelf(), vec![3, 2]);

        assert!(side.add_shelf());
        assert_eq!(side.shelves_count(), 3);
        assert_eq!(side.slots_per_shelf(), vec![3, 2, 3]);
        assert_eq!(side.shelves[2].slots[2].product_name, "Product 3");
        assert!(side.shelves[2].slots[0].product_id.is_empty());
    }

    #[test]
    fn test_shelf_bounds() {
        let mut side = RackSide::new(vec![Shelf::blank(3)]);
        assert!(!side.remove_shelf());
        assert_eq!(side.shelves_count(), 1);
        while side.add_shelf() {}
        assert_eq!(side.shelves_count(), MAX_SHELVES);
    }

    #[test]
    fn test_slot_bounds() {
        let mut shelf = Shelf::blank(1);
        assert!(!shelf.remove_slot());
        for _ in 0..10 {
            shelf.add_slot();
        }
        assert_eq!(shelf.slot_count(), MAX_SLOTS);
        assert_eq!(shelf.slots[5].description, "Description for slot 6");
    }

    #[test]
    fn test_rack_type_hidden_side() {
        assert_eq!(RackType::from_hidden_side(Some(Side::Left)), RackType::RRack);
        assert_eq!(RackType::from_hidden_side(Some(Side::Right)), RackType::LRack);
        assert_eq!(RackType::from_hidden_side(None), RackType::DRack);
        for rack_type in [RackType::DRack, RackType::LRack, RackType::RRack] {
            assert_eq!(RackType::from_hidden_side(rack_type.hidden_side()), rack_type);
        }
        assert_eq!(serde_json::to_string(&RackType::LRack).unwrap(), "\"l-rack\"");
    }

    #[test]
    fn test_slot_patch_apply() {
        let mut slot = Slot::blank(1);
        let patch = SlotPatch {
            product_name: Some("Widget".into()),
            quantity: Some(7),
            ..Default::default()
        };
        patch.apply(&mut slot);
        assert_eq!(slot.product_name, "Widget");
        assert_eq!(slot.quantity, 7);
        assert_eq!(slot.description, "Description for slot 1");
        assert!(SlotPatch::default().is_empty());
    }
}
