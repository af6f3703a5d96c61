//! Rack editing component

use sp_core::{
    Degree, Direction, MOVE_STEP, Rack, RackId, RackType, Side, SlotPatch, SlotPath,
    move_position, rotate_step,
};

use super::CountChange;
use super::events::RackEvent;

/// UI state for one rack
#[derive(Debug, Clone)]
pub struct RackEditor {
    rack: RackId,
    selected: bool,
    hidden_side: Option<Side>,
    selected_shelf: Option<(Side, usize)>,
    /// Current heading in radians, stepped a quarter turn per rotate
    rotation: f32,
    move_step: f32,
}

impl RackEditor {
    pub fn new(rack: &Rack) -> Self {
        Self {
            rack: rack.id,
            selected: false,
            hidden_side: rack.rack_type.hidden_side(),
            selected_shelf: None,
            rotation: rack.degree.to_radians(),
            move_step: MOVE_STEP,
        }
    }

    pub fn with_move_step(mut self, step: f32) -> Self {
        self.move_step = step;
        self
    }

    pub fn rack_id(&self) -> RackId {
        self.rack
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Flip selection; returns the new state
    pub fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }

    pub fn hidden_side(&self) -> Option<Side> {
        self.hidden_side
    }

    pub fn selected_shelf(&self) -> Option<(Side, usize)> {
        self.selected_shelf
    }

    /// Re-read UI state from the current rack value
    pub fn sync(&mut self, rack: &Rack) {
        if rack.id != self.rack {
            return;
        }
        self.hidden_side = rack.rack_type.hidden_side();
        if Degree::from_radians(self.rotation) != rack.degree {
            self.rotation = rack.degree.to_radians();
        }
        if let Some((side, index)) = self.selected_shelf
            && (index >= rack.side(side).shelves_count() || !self.is_visible(side))
        {
            self.selected_shelf = None;
        }
    }

    fn is_visible(&self, side: Side) -> bool {
        self.hidden_side != Some(side)
    }

    fn owns(&self, rack: &Rack) -> bool {
        if rack.id != self.rack {
            tracing::warn!("Rack editor {} handed rack {}", self.rack, rack.id);
            return false;
        }
        true
    }

    /// Hide one side (or show both). The hidden side's shelves are kept.
    pub fn set_hidden_side(&mut self, rack: &Rack, hidden: Option<Side>) -> Option<RackEvent> {
        if !self.owns(rack) {
            return None;
        }
        let rack_type = RackType::from_hidden_side(hidden);
        self.hidden_side = hidden;
        if let Some((side, _)) = self.selected_shelf
            && Some(side) == hidden
        {
            self.selected_shelf = None;
        }
        if rack_type == rack.rack_type {
            return None;
        }
        Some(RackEvent::TypeChanged {
            rack: self.rack,
            rack_type,
        })
    }

    /// Hide `side` if visible, show it if hidden
    pub fn toggle_side(&mut self, rack: &Rack, side: Side) -> Option<RackEvent> {
        let hidden = if self.hidden_side == Some(side) {
            None
        } else {
            Some(side)
        };
        self.set_hidden_side(rack, hidden)
    }

    /// Add or remove a shelf on a visible side, within [1, 6]
    pub fn change_shelf_count(
        &mut self,
        rack: &Rack,
        side: Side,
        change: CountChange,
    ) -> Option<RackEvent> {
        if !self.owns(rack) || !self.is_visible(side) {
            return None;
        }
        let mut sides = rack.sides.clone();
        let target = sides.get_mut(side);
        let changed = match change {
            CountChange::Add => target.add_shelf(),
            CountChange::Remove => target.remove_shelf(),
        };
        if !changed {
            return None;
        }
        if let Some((selected_side, index)) = self.selected_shelf
            && selected_side == side
            && index >= target.shelves_count()
        {
            self.selected_shelf = None;
        }
        Some(RackEvent::SidesChanged {
            rack: self.rack,
            sides,
        })
    }

    /// Select a shelf for slot editing; returns false if it does not exist
    pub fn select_shelf(&mut self, rack: &Rack, side: Side, index: usize) -> bool {
        if !self.owns(rack) || !self.is_visible(side) || rack.side(side).shelf(index).is_none() {
            return false;
        }
        self.selected_shelf = Some((side, index));
        true
    }

    pub fn clear_shelf_selection(&mut self) {
        self.selected_shelf = None;
    }

    /// Add or remove a slot on the selected shelf, within [1, 6]
    pub fn change_slot_count(&mut self, rack: &Rack, change: CountChange) -> Option<RackEvent> {
        let (side, index) = self.selected_shelf?;
        if !self.owns(rack) {
            return None;
        }
        let mut sides = rack.sides.clone();
        let shelf = sides.get_mut(side).shelf_mut(index)?;
        let changed = match change {
            CountChange::Add => shelf.add_slot(),
            CountChange::Remove => shelf.remove_slot(),
        };
        changed.then(|| RackEvent::SidesChanged {
            rack: self.rack,
            sides,
        })
    }

    /// Merge `patch` into the slot named by `slot_id`.
    ///
    /// `rack_label` is the rack's current display label; an id naming another
    /// rack, a missing slot or a hidden side is ignored.
    pub fn update_slot(
        &self,
        rack: &Rack,
        rack_label: &str,
        slot_id: &str,
        patch: SlotPatch,
    ) -> Option<RackEvent> {
        if !self.owns(rack) || patch.is_empty() {
            return None;
        }
        let (label, path) = SlotPath::parse(slot_id)?;
        if label != rack_label || !self.is_visible(path.side) {
            return None;
        }
        rack.slot(path)?;
        Some(RackEvent::SlotUpdated {
            rack: self.rack,
            path,
            patch,
        })
    }

    /// Step the rack in its aisle frame; only while selected
    pub fn move_by(&self, rack: &Rack, direction: Direction) -> Option<RackEvent> {
        if !self.selected || !self.owns(rack) {
            return None;
        }
        Some(RackEvent::Moved {
            rack: self.rack,
            position: move_position(rack.position, Some(direction), self.move_step),
        })
    }

    /// Quarter-turn the rack; only while selected
    pub fn rotate(&mut self, rack: &Rack) -> Option<RackEvent> {
        if !self.selected || !self.owns(rack) {
            return None;
        }
        self.rotation = rotate_step(self.rotation);
        Some(RackEvent::Rotated {
            rack: self.rack,
            degree: Degree::from_radians(self.rotation),
        })
    }
}
