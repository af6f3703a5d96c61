//! Events emitted by editing components

use glam::Vec3;
use sp_core::{AisleId, Degree, Rack, RackId, RackType, Sides, SlotPatch, SlotPath};

/// Change to a single rack
#[derive(Debug, Clone, PartialEq)]
pub enum RackEvent {
    /// New position in the aisle frame
    Moved { rack: RackId, position: Vec3 },
    Rotated { rack: RackId, degree: Degree },
    TypeChanged { rack: RackId, rack_type: RackType },
    /// Full replacement of both sides after a shelf or slot count change
    SidesChanged { rack: RackId, sides: Sides },
    /// Merge `patch` into the slot at `path`
    SlotUpdated {
        rack: RackId,
        path: SlotPath,
        patch: SlotPatch,
    },
}

impl RackEvent {
    pub fn rack(&self) -> RackId {
        match self {
            RackEvent::Moved { rack, .. }
            | RackEvent::Rotated { rack, .. }
            | RackEvent::TypeChanged { rack, .. }
            | RackEvent::SidesChanged { rack, .. }
            | RackEvent::SlotUpdated { rack, .. } => *rack,
        }
    }
}

/// Structural change to an aisle's rack list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RackListAction {
    Add,
    Delete,
}

/// Change to an aisle or to one of its racks
#[derive(Debug, Clone, PartialEq)]
pub enum AisleEvent {
    /// New world position of the aisle frame
    Moved { aisle: AisleId, position: Vec3 },
    Rotated { aisle: AisleId, degree: Degree },
    /// Complete new rack order; `added` carries the value of an inserted rack
    RacksRebuilt {
        aisle: AisleId,
        action: RackListAction,
        order: Vec<RackId>,
        added: Option<Box<Rack>>,
    },
    /// A rack event forwarded by its aisle
    Rack { aisle: AisleId, event: RackEvent },
}

impl AisleEvent {
    pub fn aisle(&self) -> AisleId {
        match self {
            AisleEvent::Moved { aisle, .. }
            | AisleEvent::Rotated { aisle, .. }
            | AisleEvent::RacksRebuilt { aisle, .. }
            | AisleEvent::Rack { aisle, .. } => *aisle,
        }
    }
}
