//! Global constants for sp-core

/// Distance covered by one directional move (grid units)
pub const MOVE_STEP: f32 = 0.5;

/// Minimum shelves per rack side
pub const MIN_SHELVES: usize = 1;

/// Maximum shelves per rack side
pub const MAX_SHELVES: usize = 6;

/// Minimum slots per shelf
pub const MIN_SLOTS: usize = 1;

/// Maximum slots per shelf
pub const MAX_SLOTS: usize = 6;

/// Shelves on each side of a freshly generated rack
pub const DEFAULT_SHELVES: usize = 4;

/// Slots on each shelf of a freshly generated rack
pub const DEFAULT_SLOTS: usize = 3;

/// Slots on a shelf appended through editing
pub const NEW_SHELF_SLOTS: usize = 3;

/// Racks in a newly placed aisle
pub const DEFAULT_RACKS_PER_AISLE: usize = 3;

/// Distance between rack origins along an aisle's local X axis
pub const DEFAULT_RACK_SPACING: f32 = 3.0;

/// Rack footprint (width, depth, height)
pub const DEFAULT_RACK_SIZE: [f32; 3] = [2.0, 1.0, 3.0];

/// Rotation value meaning "no rotation applied"
pub const IDENTITY_DEGREE: u16 = 360;

/// Name given to layouts created without one
pub const DEFAULT_LAYOUT_NAME: &str = "Untitled Layout";
