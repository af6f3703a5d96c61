//! Layout tree stored as an arena of aisles and racks

mod placeholder;
mod types;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use glam::Vec3;

pub use placeholder::{generate_rack, random_color, random_side, random_slot};
pub use types::{
    Aisle, Price, PriceParseError, Rack, RackSide, RackSize, RackType, Shelf, Sides, Slot,
    SlotPatch,
};

pub(crate) use placeholder::blank_shelf_for;

use crate::constants::DEFAULT_LAYOUT_NAME;
use crate::ids::{AisleId, RackId, rack_label};

/// The persisted root: named, ordered aisles with their racks.
///
/// Aisles and racks live in flat maps keyed by stable ids; `aisle_order` and
/// each aisle's `racks` list carry display order. Replacing one entity never
/// copies its siblings.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Gateway-assigned id, `None` until first saved
    pub id: Option<String>,
    pub name: String,
    /// Owner user id, if the layout has been assigned
    pub owner: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    aisle_order: Vec<AisleId>,
    aisles: HashMap<AisleId, Aisle>,
    racks: HashMap<RackId, Rack>,
    /// Rack to owning aisle (rebuilt from `aisles`)
    rack_parent: HashMap<RackId, AisleId>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT_NAME)
    }
}

impl PartialEq for Layout {
    /// Structural equality: same metadata and the same aisles and racks in the same order
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.owner == other.owner
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
            && self.aisle_order == other.aisle_order
            && self.aisles == other.aisles
            && self.racks == other.racks
    }
}

impl Layout {
    /// Create a new empty layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            owner: None,
            created_at: None,
            updated_at: None,
            aisle_order: Vec::new(),
            aisles: HashMap::new(),
            racks: HashMap::new(),
            rack_parent: HashMap::new(),
        }
    }

    /// Rebuild the rack → aisle index (call after bulk changes)
    pub fn rebuild_indices(&mut self) {
        self.rack_parent.clear();
        for aisle in self.aisles.values() {
            for rack_id in &aisle.racks {
                self.rack_parent.insert(*rack_id, aisle.id);
            }
        }
    }

    // ============== Queries ==============

    pub fn is_empty(&self) -> bool {
        self.aisle_order.is_empty()
    }

    pub fn aisle_count(&self) -> usize {
        self.aisle_order.len()
    }

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }

    /// Aisle keys in display order
    pub fn aisle_ids(&self) -> &[AisleId] {
        &self.aisle_order
    }

    /// Aisles in display order
    pub fn aisles(&self) -> impl Iterator<Item = &Aisle> {
        self.aisle_order.iter().filter_map(|id| self.aisles.get(id))
    }

    pub fn aisle(&self, id: AisleId) -> Option<&Aisle> {
        self.aisles.get(&id)
    }

    /// Aisle at a display position
    pub fn aisle_at(&self, index: usize) -> Option<&Aisle> {
        self.aisle_order.get(index).and_then(|id| self.aisles.get(id))
    }

    pub fn aisle_by_number(&self, number: u32) -> Option<&Aisle> {
        self.aisles().find(|aisle| aisle.number == number)
    }

    pub fn rack(&self, id: RackId) -> Option<&Rack> {
        self.racks.get(&id)
    }

    /// Racks of an aisle in display order
    pub fn racks_of(&self, aisle_id: AisleId) -> Vec<&Rack> {
        self.aisles
            .get(&aisle_id)
            .map(|aisle| aisle.racks.iter().filter_map(|id| self.racks.get(id)).collect())
            .unwrap_or_default()
    }

    /// Aisle that owns a rack
    pub fn parent_aisle(&self, rack_id: RackId) -> Option<AisleId> {
        self.rack_parent.get(&rack_id).copied()
    }

    /// Display label `A{n}-R{i}` derived from the rack's current position
    pub fn rack_label(&self, rack_id: RackId) -> Option<String> {
        let aisle = self.aisles.get(&self.parent_aisle(rack_id)?)?;
        let index = aisle.rack_index(rack_id)?;
        Some(rack_label(aisle.number, index))
    }

    /// Find a rack by its display label
    pub fn rack_by_label(&self, label: &str) -> Option<(AisleId, RackId)> {
        self.aisles().find_map(|aisle| {
            aisle
                .racks
                .iter()
                .enumerate()
                .find(|(index, _)| rack_label(aisle.number, *index) == label)
                .map(|(_, rack_id)| (aisle.id, *rack_id))
        })
    }

    /// Number for the next aisle; never reuses a number still in the layout
    pub fn next_aisle_number(&self) -> u32 {
        self.aisles
            .values()
            .map(|aisle| aisle.number + 1)
            .max()
            .unwrap_or(0)
    }

    // ============== Mutation ==============

    /// Append an aisle with its racks. The aisle's `racks` list is replaced by
    /// the keys of `racks` in order.
    pub fn push_aisle(&mut self, mut aisle: Aisle, racks: Vec<Rack>) -> AisleId {
        let aisle_id = aisle.id;
        aisle.racks = racks.iter().map(|rack| rack.id).collect();
        for rack in racks {
            self.rack_parent.insert(rack.id, aisle_id);
            self.racks.insert(rack.id, rack);
        }
        self.aisle_order.push(aisle_id);
        self.aisles.insert(aisle_id, aisle);
        aisle_id
    }

    /// Append an aisle of `rack_count` generated racks spaced along its local X axis
    pub fn add_default_aisle(&mut self, position: Vec3, rack_count: usize, spacing: f32) -> AisleId {
        let aisle = Aisle::new(self.next_aisle_number(), position);
        let racks = (0..rack_count)
            .map(|index| {
                generate_rack(
                    &rack_label(aisle.number, index),
                    Vec3::new(index as f32 * spacing, 0.0, 0.0),
                    RackType::DRack,
                )
            })
            .collect();
        self.push_aisle(aisle, racks)
    }

    /// Remove an aisle and all of its racks
    pub fn remove_aisle(&mut self, id: AisleId) -> Option<(Aisle, Vec<Rack>)> {
        let aisle = self.aisles.remove(&id)?;
        self.aisle_order.retain(|aisle_id| *aisle_id != id);
        let racks = aisle
            .racks
            .iter()
            .filter_map(|rack_id| {
                self.rack_parent.remove(rack_id);
                self.racks.remove(rack_id)
            })
            .collect();
        Some((aisle, racks))
    }

    /// Swap in a new value for an existing aisle, keeping its rack list
    pub fn replace_aisle(&mut self, aisle: Aisle) -> bool {
        match self.aisles.get_mut(&aisle.id) {
            Some(existing) => {
                let racks = std::mem::take(&mut existing.racks);
                *existing = Aisle { racks, ..aisle };
                true
            }
            None => false,
        }
    }

    /// Swap in a new value for an existing rack
    pub fn replace_rack(&mut self, rack: Rack) -> bool {
        match self.racks.get_mut(&rack.id) {
            Some(existing) => {
                *existing = rack;
                true
            }
            None => false,
        }
    }

    /// Replace an aisle's rack list with `order`.
    ///
    /// `order` may reference the aisle's current racks and `added`, if any.
    /// Racks left out of `order` are dropped from the arena. Returns false and
    /// changes nothing if `order` names a rack the aisle does not own or lists
    /// a rack twice.
    pub fn rebuild_aisle_racks(
        &mut self,
        aisle_id: AisleId,
        order: Vec<RackId>,
        added: Option<Rack>,
    ) -> bool {
        let Some(aisle) = self.aisles.get_mut(&aisle_id) else {
            return false;
        };
        let added_id = added.as_ref().map(|rack| rack.id);
        let known = |id: &RackId| aisle.racks.contains(id) || Some(*id) == added_id;
        if !order.iter().all(known) {
            return false;
        }
        let mut seen = HashSet::with_capacity(order.len());
        if !order.iter().all(|id| seen.insert(*id)) {
            return false;
        }

        for old_id in &aisle.racks {
            if !order.contains(old_id) {
                self.racks.remove(old_id);
                self.rack_parent.remove(old_id);
            }
        }
        if let Some(rack) = added.filter(|rack| order.contains(&rack.id)) {
            self.rack_parent.insert(rack.id, aisle_id);
            self.racks.insert(rack.id, rack);
        }
        aisle.racks = order;
        true
    }
}
