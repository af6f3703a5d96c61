//! Product lookup across the layout tree

use glam::Vec3;

use crate::ids::{AisleId, RackId, Side, SlotPath, rack_label};
use crate::layout::{Layout, Rack};
use crate::transform::{Degree, local_to_world};

/// Location of the first slot matching a search term
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub aisle: AisleId,
    pub rack: RackId,
    pub path: SlotPath,
    /// Display label of the rack at the time of the search
    pub rack_label: String,
    pub product_name: String,
    /// World-space center of the slot face
    pub world_position: Vec3,
}

impl SearchHit {
    pub fn slot_label(&self) -> String {
        self.path.label(&self.rack_label)
    }
}

/// Find the first slot whose product name contains `term`, case-insensitive.
///
/// Traversal order: aisles in display order, racks in aisle order, left side
/// before right, shelves bottom to top, slots left to right. A blank term
/// matches nothing.
pub fn search_product(layout: &Layout, term: &str) -> Option<SearchHit> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for aisle in layout.aisles() {
        for (rack_index, rack) in layout.racks_of(aisle.id).into_iter().enumerate() {
            let Some(path) = find_in_rack(rack, &needle) else {
                continue;
            };
            let product_name = rack
                .slot(path)
                .map(|slot| slot.product_name.clone())
                .unwrap_or_default();
            let rack_world = local_to_world(aisle.position, aisle.degree, rack.position);
            let world_position =
                local_to_world(rack_world, combined_degree(aisle.degree, rack.degree), slot_offset(rack, path));
            return Some(SearchHit {
                aisle: aisle.id,
                rack: rack.id,
                path,
                rack_label: rack_label(aisle.number, rack_index),
                product_name,
                world_position,
            });
        }
    }
    None
}

fn find_in_rack(rack: &Rack, needle: &str) -> Option<SlotPath> {
    for side in Side::BOTH {
        for (shelf_index, shelf) in rack.side(side).shelves.iter().enumerate() {
            for (slot_index, slot) in shelf.slots.iter().enumerate() {
                if slot.product_name.to_lowercase().contains(needle) {
                    return Some(SlotPath::new(side, shelf_index, slot_index));
                }
            }
        }
    }
    None
}

/// Heading of a rack inside a rotated aisle
fn combined_degree(aisle: Degree, rack: Degree) -> Degree {
    Degree::from_degrees(f64::from(aisle.value()) + f64::from(rack.value()))
}

/// Center of a slot face in the rack's own frame.
///
/// Slots spread across the rack width, shelves stack up its height, and the
/// left face sits at -Z, the right face at +Z.
fn slot_offset(rack: &Rack, path: SlotPath) -> Vec3 {
    let side = rack.side(path.side);
    let shelves = side.shelves_count().max(1) as f32;
    let slots = side
        .shelf(path.shelf_index)
        .map(|shelf| shelf.slot_count())
        .unwrap_or(1)
        .max(1) as f32;

    let x = -rack.size.width / 2.0 + rack.size.width * (path.slot_index as f32 + 0.5) / slots;
    let y = rack.size.height * (path.shelf_index as f32 + 0.5) / shelves;
    let z = match path.side {
        Side::Left => -rack.size.depth / 2.0,
        Side::Right => rack.size.depth / 2.0,
    };
    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SlotPatch;
    use approx::assert_relative_eq;

    fn layout_with_widget(path: SlotPath, rack_number: usize) -> Layout {
        let mut layout = Layout::new("Search");
        layout.add_default_aisle(Vec3::ZERO, 3, 3.0);
        layout.add_default_aisle(Vec3::new(0.0, 0.0, 10.0), 3, 3.0);
        let aisle_id = layout.aisle_ids()[1];
        let rack_id = layout.aisle(aisle_id).unwrap().racks[rack_number];
        let mut rack = layout.rack(rack_id).unwrap().clone();
        let patch = SlotPatch {
            product_name: Some("Blue WIDGET deluxe".into()),
            ..Default::default()
        };
        patch.apply(rack.sides.slot_mut(path).unwrap());
        layout.replace_rack(rack);
        layout
    }

    #[test]
    fn test_search_finds_unique_match() {
        let path = SlotPath::new(Side::Right, 2, 1);
        let layout = layout_with_widget(path, 1);
        let hit = search_product(&layout, "widget").unwrap();
        assert_eq!(hit.aisle, layout.aisle_ids()[1]);
        assert_eq!(hit.rack, layout.aisle(hit.aisle).unwrap().racks[1]);
        assert_eq!(hit.path, path);
        assert_eq!(hit.slot_label(), "A1-R2-R-SH3-S2");
    }

    #[test]
    fn test_search_not_found_and_blank() {
        let layout = layout_with_widget(SlotPath::new(Side::Left, 0, 0), 0);
        assert!(search_product(&layout, "gadget").is_none());
        assert!(search_product(&layout, "   ").is_none());
    }

    #[test]
    fn test_search_left_side_first() {
        let mut layout = Layout::new("Order");
        layout.add_default_aisle(Vec3::ZERO, 1, 3.0);
        let rack_id = layout.aisle_at(0).unwrap().racks[0];
        let mut rack = layout.rack(rack_id).unwrap().clone();
        for path in [SlotPath::new(Side::Right, 0, 0), SlotPath::new(Side::Left, 3, 2)] {
            rack.sides.slot_mut(path).unwrap().product_name = "Widget".into();
        }
        layout.replace_rack(rack);
        let hit = search_product(&layout, "WIDGET").unwrap();
        assert_eq!(hit.path, SlotPath::new(Side::Left, 3, 2));
    }

    #[test]
    fn test_focus_point_follows_aisle_frame() {
        let mut layout = Layout::new("Frame");
        layout.add_default_aisle(Vec3::new(10.0, 0.0, 20.0), 2, 3.0);
        let mut aisle = layout.aisle_at(0).unwrap().clone();
        aisle.degree = Degree::QUARTER;
        let rack_id = aisle.racks[1];
        layout.replace_aisle(aisle);

        let mut rack = layout.rack(rack_id).unwrap().clone();
        let path = SlotPath::new(Side::Left, 0, 1);
        rack.sides.slot_mut(path).unwrap().product_name = "Widget".into();
        layout.replace_rack(rack);

        let hit = search_product(&layout, "widget").unwrap();
        // Rack 2 sits 3 units along the aisle's local X, which a quarter turn maps to -Z
        assert_relative_eq!(hit.world_position.x, 10.0 - 0.5, epsilon = 1e-4);
        assert_relative_eq!(hit.world_position.z, 17.0, epsilon = 1e-4);
        assert!(hit.world_position.y > 0.0);
    }
}
