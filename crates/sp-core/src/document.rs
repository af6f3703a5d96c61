//! Layout document exchanged with the layout API
//!
//! The document mirrors the stored JSON shape (camelCase keys, display ids
//! on every node, derived shelf/slot counts). Stored documents may be partial
//! or legacy: every load runs [`LayoutDocument::normalize`], which fills
//! defaults instead of rejecting the document.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{Side, rack_label, shelf_label, side_label, slot_label};
use crate::layout::{
    Aisle, Layout, Price, Rack, RackSide, RackSize, RackType, Shelf, Sides, Slot, blank_shelf_for,
};
use crate::transform::Degree;

/// Display color used when a stored rack has none
pub const FALLBACK_RACK_COLOR: &str = "#34495e";

/// Layout owner, either a bare user id or a populated user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(String),
    User {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl OwnerRef {
    pub fn id(&self) -> &str {
        match self {
            OwnerRef::Id(id) => id,
            OwnerRef::User { id, .. } => id,
        }
    }
}

/// Listing entry for a stored layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub id: Option<String>,
    pub name: String,
    pub aisle_count: usize,
    pub rack_count: usize,
    pub owner: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Root layout document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aisles: Vec<AisleDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleDocument {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub aisle_degree: Option<Degree>,
    #[serde(default)]
    pub racks: Vec<RackDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rack_degree: Option<Degree>,
    #[serde(default, deserialize_with = "lenient_rack_type")]
    pub rack_type: Option<RackType>,
    #[serde(default)]
    pub size: Option<RackSize>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sides: SidesDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidesDocument {
    #[serde(default)]
    pub left: SideDocument,
    #[serde(default)]
    pub right: SideDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub shelves_count: usize,
    #[serde(default)]
    pub slots_per_shelf: Vec<usize>,
    #[serde(default)]
    pub shelves: Vec<ShelfDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelfDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slots: Vec<SlotDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

/// Unknown rack type names read as missing
fn lenient_rack_type<'de, D>(deserializer: D) -> Result<Option<RackType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(RackType::parse))
}

/// Quantities may arrive as numbers or numeric strings; anything else reads as 0
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    let quantity = match Raw::deserialize(deserializer)? {
        Raw::Int(value) => u32::try_from(value.max(0)).unwrap_or(u32::MAX),
        Raw::Float(value) if value.is_finite() && value > 0.0 => value.round().min(f64::from(u32::MAX)) as u32,
        Raw::Float(_) => 0,
        Raw::Text(text) => text.trim().parse::<u32>().unwrap_or(0),
        Raw::Null(()) => 0,
    };
    Ok(quantity)
}

impl SideDocument {
    /// Re-derive ids and counts from the shelves
    fn normalize(&mut self, rack: &str, side: Side) {
        self.id = side_label(rack, side);
        for (shelf_index, shelf) in self.shelves.iter_mut().enumerate() {
            shelf.id = shelf_label(rack, side, shelf_index);
            for (slot_index, slot) in shelf.slots.iter_mut().enumerate() {
                slot.id = slot_label(rack, side, shelf_index, slot_index);
            }
        }
        self.shelves_count = self.shelves.len();
        self.slots_per_shelf = self.shelves.iter().map(|shelf| shelf.slots.len()).collect();
    }
}

impl RackDocument {
    fn normalize(&mut self, aisle_number: u32, rack_index: usize) {
        self.id = rack_label(aisle_number, rack_index);
        self.rack_degree.get_or_insert(Degree::IDENTITY);
        self.rack_type.get_or_insert(RackType::DRack);
        self.size.get_or_insert_with(RackSize::default);
        self.color
            .get_or_insert_with(|| FALLBACK_RACK_COLOR.to_string());
        self.sides.left.normalize(&self.id, Side::Left);
        self.sides.right.normalize(&self.id, Side::Right);
    }
}

impl AisleDocument {
    fn normalize(&mut self) {
        self.aisle_degree.get_or_insert(Degree::IDENTITY);
        for (index, rack) in self.racks.iter_mut().enumerate() {
            rack.normalize(self.id, index);
        }
    }
}

impl LayoutDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fill defaults for missing substructure and re-derive every display id
    /// and count. Idempotent.
    pub fn normalize(&mut self) {
        self.renumber_duplicate_aisles();
        for aisle in &mut self.aisles {
            aisle.normalize();
        }
    }

    /// Give every repeated aisle number after the first a fresh number past
    /// the current maximum, so rack display ids stay unique
    fn renumber_duplicate_aisles(&mut self) {
        let mut next = self.aisles.iter().map(|aisle| aisle.id + 1).max().unwrap_or(0);
        let mut seen = HashSet::new();
        for aisle in &mut self.aisles {
            if seen.insert(aisle.id) {
                continue;
            }
            tracing::warn!("Aisle number {} is used twice, renumbered to {}", aisle.id, next);
            aisle.id = next;
            seen.insert(next);
            next += 1;
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn rack_total(&self) -> usize {
        self.aisles.iter().map(|aisle| aisle.racks.len()).sum()
    }

    /// Short description for layout listings
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            aisle_count: self.aisles.len(),
            rack_count: self.rack_total(),
            owner: self.owner.as_ref().map(|owner| owner.id().to_string()),
            updated_at: self.updated_at,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    /// Parse and normalize a JSON document
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: LayoutDocument =
            serde_json::from_str(json).map_err(|e| DocumentError::Deserialize(e.to_string()))?;
        Ok(document.normalized())
    }

    /// Serialize to RON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Save an offline draft to a RON file
    pub fn save_draft(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| DocumentError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load and normalize an offline draft
    pub fn load_draft(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Io(e.to_string()))?;
        let document: LayoutDocument =
            ron::from_str(&content).map_err(|e| DocumentError::Deserialize(e.to_string()))?;
        Ok(document.normalized())
    }
}

// ============== Layout conversion ==============

impl From<&Slot> for SlotDocument {
    fn from(slot: &Slot) -> Self {
        Self {
            id: String::new(),
            product_id: slot.product_id.clone(),
            product_name: slot.product_name.clone(),
            description: slot.description.clone(),
            price: slot.price,
            quantity: slot.quantity,
        }
    }
}

impl From<SlotDocument> for Slot {
    fn from(document: SlotDocument) -> Self {
        Self {
            product_id: document.product_id,
            product_name: document.product_name,
            description: document.description,
            price: document.price,
            quantity: document.quantity,
        }
    }
}

impl From<&RackSide> for SideDocument {
    fn from(side: &RackSide) -> Self {
        Self {
            shelves: side
                .shelves
                .iter()
                .map(|shelf| ShelfDocument {
                    id: String::new(),
                    slots: shelf.slots.iter().map(SlotDocument::from).collect(),
                })
                .collect(),
            ..Default::default()
        }
    }
}

fn side_from_document(document: SideDocument, rack: &str, side: Side) -> RackSide {
    let shelves = document
        .shelves
        .into_iter()
        .enumerate()
        .map(|(shelf_index, shelf)| {
            if shelf.slots.is_empty() {
                blank_shelf_for(rack, side, shelf_index)
            } else {
                Shelf {
                    slots: shelf.slots.into_iter().map(Slot::from).collect(),
                }
            }
        })
        .collect();
    RackSide::new(shelves)
}

fn rack_document(rack: &Rack) -> RackDocument {
    RackDocument {
        id: String::new(),
        position: rack.position.to_array(),
        rack_degree: Some(rack.degree),
        rack_type: Some(rack.rack_type),
        size: Some(rack.size),
        color: Some(rack.color.clone()),
        sides: SidesDocument {
            left: SideDocument::from(&rack.sides.left),
            right: SideDocument::from(&rack.sides.right),
        },
    }
}

fn rack_from_document(document: RackDocument) -> Rack {
    let label = document.id;
    let sides = Sides {
        left: side_from_document(document.sides.left, &label, Side::Left),
        right: side_from_document(document.sides.right, &label, Side::Right),
    };
    let mut rack = Rack::new(
        Vec3::from_array(document.position),
        document.rack_type.unwrap_or_default(),
        sides,
    );
    rack.degree = document.rack_degree.unwrap_or_default();
    rack.size = document.size.unwrap_or_default();
    rack.color = document
        .color
        .unwrap_or_else(|| FALLBACK_RACK_COLOR.to_string());
    rack
}

impl From<&Layout> for LayoutDocument {
    /// Serialize the tree with display ids derived from current positions
    fn from(layout: &Layout) -> Self {
        let aisles = layout
            .aisles()
            .map(|aisle| AisleDocument {
                id: aisle.number,
                position: aisle.position.to_array(),
                aisle_degree: Some(aisle.degree),
                racks: layout.racks_of(aisle.id).into_iter().map(rack_document).collect(),
            })
            .collect();
        LayoutDocument {
            id: layout.id.clone(),
            name: layout.name.clone(),
            aisles,
            owner: layout.owner.clone().map(OwnerRef::Id),
            created_at: layout.created_at,
            updated_at: layout.updated_at,
        }
        .normalized()
    }
}

impl From<LayoutDocument> for Layout {
    /// Build an in-memory tree from a document, normalizing it first.
    /// Shelves stored without slots are refilled with blank slots.
    fn from(document: LayoutDocument) -> Self {
        let document = document.normalized();
        let mut layout = Layout::new(document.name);
        layout.id = document.id;
        layout.owner = document.owner.map(|owner| owner.id().to_string());
        layout.created_at = document.created_at;
        layout.updated_at = document.updated_at;

        for aisle_document in document.aisles {
            let mut aisle = Aisle::new(aisle_document.id, Vec3::from_array(aisle_document.position));
            aisle.degree = aisle_document.aisle_degree.unwrap_or_default();
            let racks = aisle_document
                .racks
                .into_iter()
                .map(rack_from_document)
                .collect();
            layout.push_aisle(aisle, racks);
        }
        layout
    }
}

impl Layout {
    /// Build a layout from a stored document (always normalized)
    pub fn from_document(document: LayoutDocument) -> Self {
        Layout::from(document)
    }

    /// Wire document of the current tree
    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument::from(self)
    }
}

/// Document-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_RACK_SPACING, DEFAULT_SLOTS};
    use tempfile::tempdir;

    const PARTIAL: &str = r#"{
        "_id": "65f0c0ffee",
        "name": "Main floor",
        "owner": { "_id": "u1", "name": "Store Owner" },
        "createdAt": "2024-03-01T10:00:00.000Z",
        "aisles": [{
            "id": 4,
            "position": [10, 0, 20],
            "racks": [{
                "id": "stale",
                "position": [0, 0, 0],
                "rackType": "x-rack",
                "sides": {
                    "left": { "shelves": [{ "id": "A4-R1-L-SH1" }] },
                    "right": {}
                }
            }, {
                "position": [3, 0, 0],
                "rackDegree": 0,
                "sides": { "left": { "shelves": [{ "slots": [
                    { "productName": "Widget", "price": 4.5, "quantity": "12" }
                ] }] } }
            }]
        }]
    }"#;

    #[test]
    fn test_normalize_fills_defaults() {
        let document = LayoutDocument::from_json(PARTIAL).unwrap();
        assert_eq!(document.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(document.owner.as_ref().map(OwnerRef::id), Some("u1"));
        assert!(document.created_at.is_some());

        let aisle = &document.aisles[0];
        assert_eq!(aisle.aisle_degree, Some(Degree::IDENTITY));

        let first = &aisle.racks[0];
        assert_eq!(first.id, "A4-R1");
        assert_eq!(first.rack_type, Some(RackType::DRack));
        assert_eq!(first.rack_degree, Some(Degree::IDENTITY));
        assert_eq!(first.size, Some(RackSize::default()));
        assert_eq!(first.sides.left.id, "A4-R1-L");
        assert_eq!(first.sides.left.shelves_count, 1);
        assert_eq!(first.sides.left.slots_per_shelf, vec![0]);
        assert!(first.sides.left.shelves[0].slots.is_empty());
        assert!(first.sides.right.shelves.is_empty());

        let second = &aisle.racks[1];
        assert_eq!(second.id, "A4-R2");
        assert_eq!(second.rack_degree, Some(Degree::IDENTITY));
        let slot = &second.sides.left.shelves[0].slots[0];
        assert_eq!(slot.id, "A4-R2-L-SH1-S1");
        assert_eq!(slot.price, Price::from_cents(450));
        assert_eq!(slot.quantity, 12);
    }

    #[test]
    fn test_summary() {
        let summary = LayoutDocument::from_json(PARTIAL).unwrap().summary();
        assert_eq!(summary.name, "Main floor");
        assert_eq!(summary.aisle_count, 1);
        assert_eq!(summary.rack_count, 2);
        assert_eq!(summary.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = LayoutDocument::from_json(PARTIAL).unwrap();
        let twice = once.clone().normalized();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplicate_aisle_numbers_renumbered() {
        let json = r#"{
            "name": "Reused ids",
            "aisles": [
                { "id": 1, "position": [0, 0, 0], "racks": [{ "position": [0, 0, 0], "sides": {} }] },
                { "id": 1, "position": [10, 0, 0], "racks": [{ "position": [0, 0, 0], "sides": {} }] },
                { "id": 0, "position": [20, 0, 0], "racks": [{ "position": [0, 0, 0], "sides": {} }] }
            ]
        }"#;
        let document = LayoutDocument::from_json(json).unwrap();
        let numbers: Vec<u32> = document.aisles.iter().map(|aisle| aisle.id).collect();
        assert_eq!(numbers, vec![1, 2, 0]);
        assert_eq!(document.aisles[1].racks[0].id, "A2-R1");
        assert_eq!(document.clone().normalized(), document);

        let layout = Layout::from_document(document);
        let second = layout.aisle_at(1).unwrap();
        assert_eq!(layout.aisle_by_number(2).map(|aisle| aisle.id), Some(second.id));
        assert_eq!(
            layout.rack_by_label("A2-R1"),
            Some((second.id, second.racks[0]))
        );
        let first = layout.aisle_at(0).unwrap();
        assert_eq!(
            layout.rack_by_label("A1-R1"),
            Some((first.id, first.racks[0]))
        );
    }

    #[test]
    fn test_layout_from_document_fills_empty_shelf() {
        let layout = Layout::from_document(LayoutDocument::from_json(PARTIAL).unwrap());
        let aisle = layout.aisle_at(0).unwrap();
        assert_eq!(aisle.number, 4);
        assert_eq!(aisle.position, Vec3::new(10.0, 0.0, 20.0));
        let rack = layout.rack(aisle.racks[0]).unwrap();
        assert_eq!(rack.sides.left.slots_per_shelf(), vec![DEFAULT_SLOTS]);
        assert_eq!(rack.color, FALLBACK_RACK_COLOR);
        assert_eq!(layout.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn test_layout_round_trip() {
        let mut layout = Layout::new("Round trip");
        layout.add_default_aisle(Vec3::new(1.0, 0.0, 2.5), 2, DEFAULT_RACK_SPACING);
        layout.add_default_aisle(Vec3::new(-4.0, 0.0, 0.0), 1, DEFAULT_RACK_SPACING);

        let document = layout.to_document();
        let json = document.to_json().unwrap();
        let reloaded = Layout::from_document(LayoutDocument::from_json(&json).unwrap());
        assert_eq!(reloaded.to_document(), document);
        assert_eq!(document.aisles[1].racks[0].sides.right.shelves[3].slots[2].id, "A1-R1-R-SH4-S3");
    }

    #[test]
    fn test_serialized_shape() {
        let mut layout = Layout::new("Shape");
        layout.add_default_aisle(Vec3::ZERO, 1, DEFAULT_RACK_SPACING);
        let value: serde_json::Value = serde_json::from_str(&layout.to_document().to_json().unwrap()).unwrap();
        let rack = &value["aisles"][0]["racks"][0];
        assert_eq!(value["aisles"][0]["aisleDegree"], 360);
        assert_eq!(rack["rackDegree"], 360);
        assert_eq!(rack["rackType"], "d-rack");
        assert_eq!(rack["sides"]["left"]["shelvesCount"], 4);
        assert_eq!(rack["sides"]["left"]["slotsPerShelf"], serde_json::json!([3, 3, 3, 3]));
        assert!(rack["sides"]["left"]["shelves"][0]["slots"][0]["price"].is_string());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_draft_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("draft.ron");
        let mut layout = Layout::new("Draft");
        layout.add_default_aisle(Vec3::new(2.0, 0.0, 2.0), 3, DEFAULT_RACK_SPACING);
        let document = layout.to_document();
        document.save_draft(&path).unwrap();
        assert_eq!(LayoutDocument::load_draft(&path).unwrap(), document);
    }

    #[test]
    fn test_load_draft_missing_file() {
        let dir = tempdir().unwrap();
        let result = LayoutDocument::load_draft(dir.path().join("missing.ron"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
