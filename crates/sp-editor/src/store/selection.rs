//! Aisle and rack selection

use sp_core::{AisleId, Layout, RackId};

/// At most one aisle, and within it at most one rack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    aisle: Option<AisleId>,
    rack: Option<RackId>,
}

impl Selection {
    pub fn aisle(&self) -> Option<AisleId> {
        self.aisle
    }

    pub fn rack(&self) -> Option<RackId> {
        self.rack
    }

    pub fn is_empty(&self) -> bool {
        self.aisle.is_none()
    }

    /// Select an aisle; a rack selection in another aisle is dropped
    pub fn select_aisle(&mut self, aisle: AisleId) {
        if self.aisle != Some(aisle) {
            self.rack = None;
        }
        self.aisle = Some(aisle);
    }

    pub fn select_rack(&mut self, aisle: AisleId, rack: RackId) {
        self.aisle = Some(aisle);
        self.rack = Some(rack);
    }

    pub fn clear(&mut self) {
        *self = Selection::default();
    }

    /// Drop references to entities no longer in `layout`
    pub fn retain_existing(&mut self, layout: &Layout) {
        if let Some(aisle) = self.aisle
            && layout.aisle(aisle).is_none()
        {
            self.clear();
            return;
        }
        if let Some(rack) = self.rack
            && layout.parent_aisle(rack) != self.aisle
        {
            self.rack = None;
        }
    }
}
