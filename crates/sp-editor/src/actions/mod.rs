//! Action handling module
//!
//! This module contains the action dispatch system for the layout editor.
//! Actions are queued in EditorState and processed in order by the console loop.

mod aisle;
mod layout;
mod persistence;
mod rack;

use crate::persistence::Persistence;
use crate::state::{EditorAction, SharedEditorState};

pub use aisle::handle_aisle_action;
pub use layout::handle_layout_action;
pub use persistence::handle_persistence_action;
pub use rack::handle_rack_action;

/// Context for action handlers
pub struct ActionContext<'a> {
    pub state: &'a SharedEditorState,
    pub persistence: &'a Persistence,
}

impl<'a> ActionContext<'a> {
    pub fn new(state: &'a SharedEditorState, persistence: &'a Persistence) -> Self {
        Self { state, persistence }
    }
}

/// Dispatch an action to the appropriate handler
pub fn dispatch_action(action: EditorAction, ctx: &ActionContext) {
    match action {
        // Layout actions
        EditorAction::BeginPlacing
        | EditorAction::CancelPlacing
        | EditorAction::PlaceAisle(_)
        | EditorAction::SelectAisle(_)
        | EditorAction::SelectRack { .. }
        | EditorAction::DeselectAll
        | EditorAction::RemoveSelected
        | EditorAction::Search(_)
        | EditorAction::Rename(_)
        | EditorAction::NewLayout(_)
        | EditorAction::KeyPress(_) => {
            handle_layout_action(action, ctx);
        }

        // Aisle actions
        EditorAction::MoveAisle(_)
        | EditorAction::RotateAisle
        | EditorAction::AddRack(_)
        | EditorAction::RemoveRack => {
            handle_aisle_action(action, ctx);
        }

        // Rack actions
        EditorAction::MoveRack(_)
        | EditorAction::RotateRack
        | EditorAction::SetHiddenSide(_)
        | EditorAction::ToggleSide(_)
        | EditorAction::ChangeShelfCount { .. }
        | EditorAction::SelectShelf { .. }
        | EditorAction::ChangeSlotCount(_)
        | EditorAction::UpdateSlot { .. } => {
            handle_rack_action(action, ctx);
        }

        // Persistence actions
        EditorAction::Save
        | EditorAction::Load(_)
        | EditorAction::Delete
        | EditorAction::List
        | EditorAction::Assign { .. }
        | EditorAction::ExportDraft(_)
        | EditorAction::ImportDraft(_) => {
            handle_persistence_action(action, ctx);
        }
    }

    ctx.state.lock().sync_editors();
}

/// Run every queued action
pub fn process_pending_actions(ctx: &ActionContext) {
    let actions = ctx.state.lock().take_pending_actions();
    for action in actions {
        dispatch_action(action, ctx);
    }
}
