//! Aisle editing component

use std::time::{Duration, Instant};

use glam::Vec3;
use sp_core::{
    Aisle, AisleId, DEFAULT_RACK_SPACING, Degree, Direction, MOVE_STEP, RackType, generate_rack,
    move_position, rack_label, rotate_step,
};

use super::events::{AisleEvent, RackEvent, RackListAction};
use super::throttle::KeyThrottle;

/// UI state for one aisle
#[derive(Debug, Clone)]
pub struct AisleEditor {
    aisle: AisleId,
    selected: bool,
    rotation: f32,
    move_step: f32,
    rack_spacing: f32,
    throttle: KeyThrottle,
}

impl AisleEditor {
    pub fn new(aisle: &Aisle) -> Self {
        Self {
            aisle: aisle.id,
            selected: false,
            rotation: aisle.degree.to_radians(),
            move_step: MOVE_STEP,
            rack_spacing: DEFAULT_RACK_SPACING,
            throttle: KeyThrottle::default(),
        }
    }

    /// Override the movement step, rack spacing and key cooldown
    pub fn with_settings(mut self, move_step: f32, rack_spacing: f32, cooldown: Duration) -> Self {
        self.move_step = move_step;
        self.rack_spacing = rack_spacing;
        self.throttle = KeyThrottle::new(cooldown);
        self
    }

    pub fn aisle_id(&self) -> AisleId {
        self.aisle
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        if !selected {
            self.throttle.reset();
        }
        self.selected = selected;
    }

    pub fn toggle_selected(&mut self) -> bool {
        self.set_selected(!self.selected);
        self.selected
    }

    pub fn sync(&mut self, aisle: &Aisle) {
        if aisle.id == self.aisle && Degree::from_radians(self.rotation) != aisle.degree {
            self.rotation = aisle.degree.to_radians();
        }
    }

    fn owns(&self, aisle: &Aisle) -> bool {
        if aisle.id != self.aisle {
            tracing::warn!("Aisle editor {} handed aisle {}", self.aisle, aisle.id);
            return false;
        }
        true
    }

    /// Append a generated rack at the next spacing step along the aisle's X axis
    pub fn add_rack(&self, aisle: &Aisle, rack_type: RackType) -> Option<AisleEvent> {
        if !self.owns(aisle) {
            return None;
        }
        let index = aisle.racks.len();
        let rack = generate_rack(
            &rack_label(aisle.number, index),
            Vec3::new(index as f32 * self.rack_spacing, 0.0, 0.0),
            rack_type,
        );
        let mut order = aisle.racks.clone();
        order.push(rack.id);
        Some(AisleEvent::RacksRebuilt {
            aisle: self.aisle,
            action: RackListAction::Add,
            order,
            added: Some(Box::new(rack)),
        })
    }

    /// Drop the last rack; an aisle always keeps at least one
    pub fn remove_rack(&self, aisle: &Aisle) -> Option<AisleEvent> {
        if !self.owns(aisle) || aisle.racks.len() <= 1 {
            return None;
        }
        let mut order = aisle.racks.clone();
        order.pop();
        Some(AisleEvent::RacksRebuilt {
            aisle: self.aisle,
            action: RackListAction::Delete,
            order,
            added: None,
        })
    }

    /// Tag a rack event with this aisle's key
    pub fn handle_rack_change(&self, aisle: &Aisle, event: RackEvent) -> Option<AisleEvent> {
        if !self.owns(aisle) {
            return None;
        }
        if aisle.rack_index(event.rack()).is_none() {
            tracing::warn!(
                "Ignoring event for rack {} outside aisle {}",
                event.rack(),
                aisle.number
            );
            return None;
        }
        Some(AisleEvent::Rack {
            aisle: self.aisle,
            event,
        })
    }

    /// Step the aisle frame; only while selected
    pub fn move_by(&self, aisle: &Aisle, direction: Direction) -> Option<AisleEvent> {
        if !self.selected || !self.owns(aisle) {
            return None;
        }
        Some(AisleEvent::Moved {
            aisle: self.aisle,
            position: move_position(aisle.position, Some(direction), self.move_step),
        })
    }

    /// Quarter-turn the aisle frame; only while selected
    pub fn rotate(&mut self, aisle: &Aisle) -> Option<AisleEvent> {
        if !self.selected || !self.owns(aisle) {
            return None;
        }
        self.rotation = rotate_step(self.rotation);
        Some(AisleEvent::Rotated {
            aisle: self.aisle,
            degree: Degree::from_radians(self.rotation),
        })
    }

    /// Arrow-key movement, one step per accepted press
    pub fn handle_key(&mut self, aisle: &Aisle, key: &str, now: Instant) -> Option<AisleEvent> {
        let direction = Direction::from_arrow_key(key)?;
        if !self.selected || !self.throttle.try_fire(now) {
            return None;
        }
        self.move_by(aisle, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::{DEFAULT_SHELVES, DEFAULT_SLOTS, Layout, Side};

    fn layout() -> (Layout, AisleId) {
        let mut layout = Layout::new("Test");
        let id = layout.add_default_aisle(Vec3::new(10.0, 0.0, 20.0), 3, DEFAULT_RACK_SPACING);
        (layout, id)
    }

    #[test]
    fn test_rotation_scenario() {
        let (layout, id) = layout();
        let aisle = layout.aisle(id).unwrap();
        let mut editor = AisleEditor::new(aisle);
        editor.set_selected(true);

        let mut degrees = Vec::new();
        for _ in 0..4 {
            match editor.rotate(aisle) {
                Some(AisleEvent::Rotated { degree, .. }) => degrees.push(degree.value()),
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(degrees, vec![90, 180, 270, 360]);
        assert_eq!(aisle.position, Vec3::new(10.0, 0.0, 20.0));
    }

    #[test]
    fn test_add_rack_places_at_next_spacing() {
        let (layout, id) = layout();
        let aisle = layout.aisle(id).unwrap();
        let editor = AisleEditor::new(aisle);
        let Some(AisleEvent::RacksRebuilt {
            action,
            order,
            added: Some(rack),
            ..
        }) = editor.add_rack(aisle, RackType::LRack)
        else {
            panic!("expected rebuilt event");
        };
        assert_eq!(action, RackListAction::Add);
        assert_eq!(order.len(), 4);
        assert_eq!(order[3], rack.id);
        assert_eq!(rack.position, Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(rack.rack_type, RackType::LRack);
        assert_eq!(rack.side(Side::Left).shelves_count(), DEFAULT_SHELVES);
        assert_eq!(rack.side(Side::Right).slots_per_shelf(), vec![DEFAULT_SLOTS; DEFAULT_SHELVES]);
    }

    #[test]
    fn test_remove_rack_keeps_one() {
        let mut layout = Layout::new("Test");
        let id = layout.add_default_aisle(Vec3::ZERO, 2, DEFAULT_RACK_SPACING);
        let aisle = layout.aisle(id).unwrap().clone();
        let editor = AisleEditor::new(&aisle);

        let event = editor.remove_rack(&aisle);
        let Some(AisleEvent::RacksRebuilt { order, action, .. }) = event else {
            panic!("expected rebuilt event");
        };
        assert_eq!(action, RackListAction::Delete);
        assert_eq!(order, vec![aisle.racks[0]]);

        let mut single = aisle.clone();
        single.racks.truncate(1);
        assert!(editor.remove_rack(&single).is_none());
    }

    #[test]
    fn test_handle_rack_change_checks_membership() {
        let (mut layout, id) = layout();
        let other = layout.add_default_aisle(Vec3::ZERO, 1, DEFAULT_RACK_SPACING);
        let aisle = layout.aisle(id).unwrap();
        let editor = AisleEditor::new(aisle);

        let own = RackEvent::Rotated {
            rack: aisle.racks[0],
            degree: Degree::QUARTER,
        };
        assert_eq!(
            editor.handle_rack_change(aisle, own.clone()),
            Some(AisleEvent::Rack { aisle: id, event: own })
        );

        let foreign = RackEvent::Rotated {
            rack: layout.aisle(other).unwrap().racks[0],
            degree: Degree::QUARTER,
        };
        assert!(editor.handle_rack_change(aisle, foreign).is_none());
    }

    #[test]
    fn test_keys_throttled_while_selected() {
        let (layout, id) = layout();
        let aisle = layout.aisle(id).unwrap();
        let mut editor = AisleEditor::new(aisle);
        let start = Instant::now();

        assert!(editor.handle_key(aisle, "ArrowLeft", start).is_none());
        editor.set_selected(true);
        assert_eq!(
            editor.handle_key(aisle, "ArrowLeft", start),
            Some(AisleEvent::Moved {
                aisle: id,
                position: Vec3::new(9.5, 0.0, 20.0)
            })
        );
        assert!(editor.handle_key(aisle, "ArrowLeft", start + Duration::from_millis(20)).is_none());
        assert!(editor.handle_key(aisle, "KeyQ", start + Duration::from_secs(1)).is_none());
        assert!(editor.handle_key(aisle, "ArrowDown", start + Duration::from_secs(1)).is_some());
    }
}
