//! Editor state module

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use parking_lot::Mutex;

use sp_core::{
    Aisle, AisleId, DEFAULT_RACK_SPACING, Direction, LayoutSummary, MOVE_STEP, Rack, RackId,
    RackType, Side, SlotPatch,
};

use crate::components::{AisleEditor, CountChange, RackEditor};
use crate::config::EditorConfig;
use crate::store::LayoutStore;

/// Actions that can be performed on the editor state
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // Layout actions
    /// Arm placement mode
    BeginPlacing,
    CancelPlacing,
    /// Place an aisle at a floor point
    PlaceAisle(Vec3),
    SelectAisle(AisleId),
    SelectRack { aisle: AisleId, rack: RackId },
    DeselectAll,
    /// Delete the selected aisle
    RemoveSelected,
    /// Product search
    Search(String),
    Rename(String),
    NewLayout(Option<String>),
    /// Raw key name, e.g. `ArrowUp`
    KeyPress(String),

    // Aisle actions (on the selected aisle)
    MoveAisle(Direction),
    RotateAisle,
    AddRack(RackType),
    RemoveRack,

    // Rack actions (on the selected rack)
    MoveRack(Direction),
    RotateRack,
    SetHiddenSide(Option<Side>),
    ToggleSide(Side),
    ChangeShelfCount { side: Side, change: CountChange },
    SelectShelf { side: Side, index: usize },
    ChangeSlotCount(CountChange),
    UpdateSlot { slot_id: String, patch: SlotPatch },

    // Persistence actions
    Save,
    Load(String),
    /// Delete the current layout from the store
    Delete,
    List,
    Assign { owner_id: String },
    ExportDraft(PathBuf),
    ImportDraft(PathBuf),
}

/// Editing settings taken from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    pub move_step: f32,
    pub rack_spacing: f32,
    pub key_cooldown: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            move_step: MOVE_STEP,
            rack_spacing: DEFAULT_RACK_SPACING,
            key_cooldown: Duration::from_millis(100),
        }
    }
}

impl EditorSettings {
    pub fn aisle_editor(&self, aisle: &Aisle) -> AisleEditor {
        AisleEditor::new(aisle).with_settings(self.move_step, self.rack_spacing, self.key_cooldown)
    }

    pub fn rack_editor(&self, rack: &Rack) -> RackEditor {
        RackEditor::new(rack).with_move_step(self.move_step)
    }
}

impl From<&EditorConfig> for EditorSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            move_step: config.move_step,
            rack_spacing: config.rack_spacing,
            key_cooldown: config.key_cooldown(),
        }
    }
}

/// Editor state
pub struct EditorState {
    pub store: LayoutStore,
    /// Per-rack UI state, kept in step with the layout by `sync_editors`
    pub rack_editors: HashMap<RackId, RackEditor>,
    pub aisle_editors: HashMap<AisleId, AisleEditor>,
    /// Last listing fetched from the gateway
    pub layouts: Vec<LayoutSummary>,
    pub settings: EditorSettings,
    pending_actions: Vec<EditorAction>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default(), Duration::from_secs(3))
    }
}

impl EditorState {
    pub fn new(settings: EditorSettings, notification_ttl: Duration) -> Self {
        Self {
            store: LayoutStore::default().with_settings(settings.rack_spacing, notification_ttl),
            rack_editors: HashMap::new(),
            aisle_editors: HashMap::new(),
            layouts: Vec::new(),
            settings,
            pending_actions: Vec::new(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(EditorSettings::from(config), config.notification_ttl())
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: EditorAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<EditorAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Create editors for new entities, drop those of removed ones and
    /// refresh the rest from the current tree. Selection flags follow the
    /// store's selection.
    pub fn sync_editors(&mut self) {
        let layout = self.store.layout();
        let selection = self.store.selection();
        let settings = self.settings;

        self.aisle_editors
            .retain(|id, _| layout.aisle(*id).is_some());
        self.rack_editors.retain(|id, _| layout.rack(*id).is_some());

        for aisle in layout.aisles() {
            let editor = self
                .aisle_editors
                .entry(aisle.id)
                .or_insert_with(|| settings.aisle_editor(aisle));
            editor.sync(aisle);
            let selected = selection.aisle() == Some(aisle.id);
            if editor.is_selected() != selected {
                editor.set_selected(selected);
            }

            for rack in layout.racks_of(aisle.id) {
                let editor = self
                    .rack_editors
                    .entry(rack.id)
                    .or_insert_with(|| settings.rack_editor(rack));
                editor.sync(rack);
                editor.set_selected(selection.rack() == Some(rack.id));
            }
        }
    }

    /// Drop all per-entity UI state, e.g. after loading another layout
    pub fn reset_editors(&mut self) {
        self.rack_editors.clear();
        self.aisle_editors.clear();
        self.sync_editors();
    }
}

pub type SharedEditorState = Arc<Mutex<EditorState>>;

/// Create a new shared editor state
pub fn create_shared_state(config: &EditorConfig) -> SharedEditorState {
    Arc::new(Mutex::new(EditorState::from_config(config)))
}
