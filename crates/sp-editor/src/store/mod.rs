//! Layout store
//!
//! The store exclusively owns the [`Layout`] tree. Components emit events;
//! [`LayoutStore::apply_update`] turns each event into one replacement of the
//! affected aisle or rack.

mod focus;
mod notify;
mod selection;

pub use focus::{DEFAULT_CAMERA_TARGET, DEFAULT_FOCUS_DURATION, FocusAnimation};
pub use notify::{DEFAULT_NOTIFICATION_TTL, Notification, NotificationKind, Notifications};
pub use selection::Selection;

use std::time::{Duration, Instant};

use glam::Vec3;
use sp_core::{
    Aisle, AisleId, DEFAULT_LAYOUT_NAME, DEFAULT_RACK_SPACING, DEFAULT_RACKS_PER_AISLE, Layout,
    LayoutDocument, RackId, SearchHit, search_product,
};

use crate::components::{AisleEvent, RackEvent};

/// Result of a product search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(SearchHit),
    NotFound,
}

pub struct LayoutStore {
    layout: Layout,
    /// Next floor click places an aisle
    placing: bool,
    selection: Selection,
    /// Unsaved edits exist
    pending_changes: bool,
    /// Bumped on every change, so a save can tell if it is still current
    revision: u64,
    highlight: Option<SearchHit>,
    focus: Option<FocusAnimation>,
    camera_target: Vec3,
    notifications: Notifications,
    rack_spacing: f32,
    focus_duration: Duration,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl LayoutStore {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            placing: false,
            selection: Selection::default(),
            pending_changes: false,
            revision: 0,
            highlight: None,
            focus: None,
            camera_target: DEFAULT_CAMERA_TARGET,
            notifications: Notifications::default(),
            rack_spacing: DEFAULT_RACK_SPACING,
            focus_duration: DEFAULT_FOCUS_DURATION,
        }
    }

    /// Override rack spacing and notification lifetime
    pub fn with_settings(mut self, rack_spacing: f32, notification_ttl: Duration) -> Self {
        self.rack_spacing = rack_spacing;
        self.notifications = Notifications::new(notification_ttl);
        self
    }

    // ============== Accessors ==============

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_placing(&self) -> bool {
        self.placing
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending_changes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn highlight(&self) -> Option<&SearchHit> {
        self.highlight.as_ref()
    }

    pub fn focus(&self) -> Option<&FocusAnimation> {
        self.focus.as_ref()
    }

    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    fn touch(&mut self) {
        self.pending_changes = true;
        self.revision += 1;
    }

    // ============== Placement & selection ==============

    pub fn begin_placing(&mut self) {
        self.placing = true;
    }

    pub fn cancel_placing(&mut self) {
        self.placing = false;
    }

    /// Place a default aisle at a floor point. Only while placing, and only
    /// at a finite point.
    pub fn place_aisle(&mut self, point: Vec3) -> Option<AisleId> {
        if !self.placing {
            return None;
        }
        if !point.is_finite() {
            tracing::warn!("Ignoring non-finite floor point {:?}", point);
            return None;
        }
        let position = Vec3::new(point.x, 0.0, point.z);
        let id = self
            .layout
            .add_default_aisle(position, DEFAULT_RACKS_PER_AISLE, self.rack_spacing);
        self.placing = false;
        self.touch();
        tracing::info!("Placed aisle at ({:.2}, {:.2})", position.x, position.z);
        Some(id)
    }

    pub fn select_aisle(&mut self, aisle: AisleId) -> bool {
        if self.layout.aisle(aisle).is_none() {
            return false;
        }
        self.selection.select_aisle(aisle);
        true
    }

    pub fn select_rack(&mut self, aisle: AisleId, rack: RackId) -> bool {
        if self.layout.parent_aisle(rack) != Some(aisle) {
            return false;
        }
        self.selection.select_rack(aisle, rack);
        true
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Delete the selected aisle with its racks
    pub fn remove_selected(&mut self) -> bool {
        let Some(aisle) = self.selection.aisle() else {
            return false;
        };
        let Some((removed, racks)) = self.layout.remove_aisle(aisle) else {
            return false;
        };
        self.selection.clear();
        if self
            .highlight
            .as_ref()
            .is_some_and(|hit| hit.aisle == removed.id)
        {
            self.highlight = None;
        }
        self.touch();
        tracing::info!("Removed aisle A{} ({} racks)", removed.number, racks.len());
        true
    }

    // ============== Updates ==============

    /// Apply one component event. Returns false if the event named an entity
    /// that is not in the tree.
    pub fn apply_update(&mut self, event: AisleEvent) -> bool {
        let aisle_id = event.aisle();
        let applied = match event {
            AisleEvent::Moved { aisle, position } => self.update_aisle(aisle, |a| a.position = position),
            AisleEvent::Rotated { aisle, degree } => self.update_aisle(aisle, |a| a.degree = degree),
            AisleEvent::RacksRebuilt {
                aisle,
                action,
                order,
                added,
            } => {
                tracing::debug!("Rebuilding racks of aisle {} ({:?})", aisle, action);
                self.layout
                    .rebuild_aisle_racks(aisle, order, added.map(|rack| *rack))
            }
            AisleEvent::Rack { aisle, event } => self.apply_rack_event(aisle, event),
        };

        if applied {
            self.selection.retain_existing(&self.layout);
            if let Some(hit) = &self.highlight
                && self.layout.rack(hit.rack).is_none()
            {
                self.highlight = None;
            }
            self.touch();
        } else {
            tracing::warn!("Ignoring update for aisle {}: target not in layout", aisle_id);
        }
        applied
    }

    fn update_aisle(&mut self, id: AisleId, edit: impl FnOnce(&mut Aisle)) -> bool {
        let Some(mut aisle) = self.layout.aisle(id).cloned() else {
            return false;
        };
        edit(&mut aisle);
        self.layout.replace_aisle(aisle)
    }

    fn apply_rack_event(&mut self, aisle: AisleId, event: RackEvent) -> bool {
        let rack_id = event.rack();
        if self.layout.parent_aisle(rack_id) != Some(aisle) {
            return false;
        }
        let Some(mut rack) = self.layout.rack(rack_id).cloned() else {
            return false;
        };
        match event {
            RackEvent::Moved { position, .. } => rack.position = position,
            RackEvent::Rotated { degree, .. } => rack.degree = degree,
            RackEvent::TypeChanged { rack_type, .. } => rack.rack_type = rack_type,
            RackEvent::SidesChanged { sides, .. } => rack.sides = sides,
            RackEvent::SlotUpdated { path, patch, .. } => {
                let Some(slot) = rack.sides.slot_mut(path) else {
                    return false;
                };
                patch.apply(slot);
            }
        }
        tracing::debug!("Applied rack update to {}", rack_id);
        self.layout.replace_rack(rack)
    }

    // ============== Search ==============

    /// Find a product, highlight it and focus the camera on it
    pub fn search(&mut self, term: &str) -> SearchOutcome {
        match search_product(&self.layout, term) {
            Some(hit) => {
                tracing::info!("Found '{}' at {}", hit.product_name, hit.slot_label());
                self.focus = Some(FocusAnimation::new(
                    self.camera_target,
                    hit.world_position,
                    self.focus_duration,
                ));
                self.highlight = Some(hit.clone());
                SearchOutcome::Found(hit)
            }
            None => {
                if !term.trim().is_empty() {
                    self.notifications
                        .transient(format!("Product \"{}\" not found", term.trim()));
                }
                SearchOutcome::NotFound
            }
        }
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Advance the camera focus animation
    pub fn tick(&mut self, dt: Duration) {
        if let Some(focus) = &mut self.focus {
            focus.tick(dt);
            self.camera_target = focus.target();
            if focus.is_complete() {
                self.focus = None;
            }
        }
    }

    /// Drop expired transient notifications
    pub fn expire(&mut self, now: Instant) {
        self.notifications.expire(now);
    }

    // ============== Document lifecycle ==============

    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.layout.name {
            return false;
        }
        self.layout.name = name.to_string();
        self.touch();
        true
    }

    /// Start over with an empty, unsaved layout
    pub fn new_layout(&mut self, name: Option<&str>) {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_LAYOUT_NAME);
        self.replace_layout(Layout::new(name));
        self.pending_changes = false;
    }

    /// Replace the tree with a layout fetched from the gateway
    pub fn load_layout(&mut self, layout: Layout) {
        tracing::info!(
            "Loaded layout '{}' ({} aisles, {} racks)",
            layout.name,
            layout.aisle_count(),
            layout.rack_count()
        );
        self.replace_layout(layout);
        self.pending_changes = false;
    }

    /// Replace the tree with a local draft; it still needs saving
    pub fn import_layout(&mut self, layout: Layout) {
        self.replace_layout(layout);
        self.pending_changes = true;
    }

    fn replace_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.placing = false;
        self.selection.clear();
        self.highlight = None;
        self.focus = None;
        self.revision += 1;
    }

    /// Wire document of the current tree
    pub fn snapshot(&self) -> LayoutDocument {
        self.layout.to_document()
    }

    /// Record gateway-assigned metadata after a save of `revision`.
    /// Edits made since that snapshot keep the pending flag set.
    pub fn mark_saved(&mut self, saved: &LayoutDocument, revision: u64) {
        self.layout.id = saved.id.clone();
        self.layout.owner = saved.owner.as_ref().map(|owner| owner.id().to_string());
        self.layout.created_at = saved.created_at;
        self.layout.updated_at = saved.updated_at;
        if revision == self.revision {
            self.pending_changes = false;
        }
    }

    /// Record a new owner after an assignment
    pub fn set_owner(&mut self, owner: Option<String>) {
        self.layout.owner = owner;
    }
}
