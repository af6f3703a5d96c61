//! Generated placeholder content for new racks

use glam::Vec3;

use crate::constants::{DEFAULT_SHELVES, DEFAULT_SLOTS};
use crate::ids::{Side, shelf_label, slot_label};

use super::types::{Price, Rack, RackSide, RackType, Shelf, Sides, Slot};

/// Random u32 from the OS source, falling back to the clock if it is unavailable
fn random_u32() -> u32 {
    getrandom::u32().unwrap_or_else(|_| chrono::Utc::now().timestamp_subsec_nanos())
}

/// Uniform value in `0..bound`
fn random_below(bound: u32) -> u32 {
    below_with(bound, random_u32)
}

/// Reduce draws from `next` into `0..bound`, rejecting the top partial
/// window of the u32 range so every result is equally likely
fn below_with(bound: u32, mut next: impl FnMut() -> u32) -> u32 {
    if bound == 0 {
        return 0;
    }
    let range = 1u64 << 32;
    let zone = range - range % u64::from(bound);
    loop {
        let draw = next();
        if u64::from(draw) < zone {
            return draw % bound;
        }
    }
}

/// Uniform value in `[0, 1)`
fn random_unit() -> f64 {
    f64::from(random_u32()) / (f64::from(u32::MAX) + 1.0)
}

/// Slot filled with made-up product data
pub fn random_slot(slot_id: &str) -> Slot {
    Slot {
        product_id: format!("P{}", random_below(1000)),
        product_name: format!("Product {}", random_below(100)),
        description: format!("Description for product in slot {}", slot_id),
        price: Price::from_cents(u64::from(random_below(10_000))),
        quantity: random_below(50),
    }
}

/// Decorative `hsl(...)` color with a random hue
pub fn random_color() -> String {
    format!("hsl({:.1}, 70%, 60%)", random_unit() * 360.0)
}

/// Side of `DEFAULT_SHELVES` shelves with `DEFAULT_SLOTS` random slots each
pub fn random_side(rack_label: &str, side: Side) -> RackSide {
    let shelves = (0..DEFAULT_SHELVES)
        .map(|shelf_index| {
            let slots = (0..DEFAULT_SLOTS)
                .map(|slot_index| random_slot(&slot_label(rack_label, side, shelf_index, slot_index)))
                .collect();
            Shelf { slots }
        })
        .collect();
    RackSide::new(shelves)
}

/// Fully populated rack for a new aisle or an added rack.
///
/// `rack_label` is only used to word the generated descriptions.
pub fn generate_rack(rack_label: &str, position: Vec3, rack_type: RackType) -> Rack {
    let sides = Sides {
        left: random_side(rack_label, Side::Left),
        right: random_side(rack_label, Side::Right),
    };
    let mut rack = Rack::new(position, rack_type, sides);
    rack.color = random_color();
    tracing::debug!(
        "Generated rack {} with {} shelves per side",
        rack_label,
        DEFAULT_SHELVES
    );
    rack
}

/// Replacement for a shelf loaded without slots
pub(crate) fn blank_shelf_for(rack_label: &str, side: Side, shelf_index: usize) -> Shelf {
    tracing::debug!(
        "Shelf {} loaded without slots, filling with blanks",
        shelf_label(rack_label, side, shelf_index)
    );
    Shelf::blank(DEFAULT_SLOTS)
}
