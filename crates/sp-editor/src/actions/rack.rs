//! Rack action handlers
//!
//! Rack events travel through the owning aisle's editor before reaching the
//! store, the same path an edit made in the scene takes.

use sp_core::{AisleId, Rack, RackId, SlotPatch, SlotPath};

use crate::components::{RackEditor, RackEvent};
use crate::state::{EditorAction, EditorState};

use super::ActionContext;

/// Handle actions on the selected rack
pub fn handle_rack_action(action: EditorAction, ctx: &ActionContext) {
    match action {
        EditorAction::MoveRack(direction) => {
            with_selected_rack(ctx, |editor, rack| editor.move_by(rack, direction))
        }
        EditorAction::RotateRack => with_selected_rack(ctx, |editor, rack| editor.rotate(rack)),
        EditorAction::SetHiddenSide(hidden) => {
            with_selected_rack(ctx, |editor, rack| editor.set_hidden_side(rack, hidden))
        }
        EditorAction::ToggleSide(side) => {
            with_selected_rack(ctx, |editor, rack| editor.toggle_side(rack, side))
        }
        EditorAction::ChangeShelfCount { side, change } => with_selected_rack(ctx, |editor, rack| {
            editor.change_shelf_count(rack, side, change)
        }),
        EditorAction::SelectShelf { side, index } => with_selected_rack(ctx, |editor, rack| {
            if !editor.select_shelf(rack, side, index) {
                tracing::warn!("No visible shelf {} on the {} side", index + 1, side);
            }
            None
        }),
        EditorAction::ChangeSlotCount(change) => with_selected_rack(ctx, |editor, rack| {
            if editor.selected_shelf().is_none() {
                tracing::warn!("Select a shelf before changing its slots");
            }
            editor.change_slot_count(rack, change)
        }),
        EditorAction::UpdateSlot { slot_id, patch } => handle_update_slot(slot_id, patch, ctx),
        _ => {}
    }
}

fn with_selected_rack(
    ctx: &ActionContext,
    edit: impl FnOnce(&mut RackEditor, &Rack) -> Option<RackEvent>,
) {
    let mut state = ctx.state.lock();
    let selection = state.store.selection();
    let (Some(aisle_id), Some(rack_id)) = (selection.aisle(), selection.rack()) else {
        tracing::warn!("No rack selected");
        return;
    };
    apply_rack_edit(&mut state, aisle_id, rack_id, |editor, rack| {
        if !editor.is_selected() {
            editor.set_selected(true);
        }
        edit(editor, rack)
    });
}

/// Slot edits address the slot by its display id, so no selection is needed
fn handle_update_slot(slot_id: String, patch: SlotPatch, ctx: &ActionContext) {
    let mut state = ctx.state.lock();
    let target = SlotPath::parse(&slot_id)
        .and_then(|(label, _)| state.store.layout().rack_by_label(&label).map(|ids| (label, ids)));
    let Some((label, (aisle_id, rack_id))) = target else {
        tracing::warn!("Unknown slot {}", slot_id);
        state
            .store
            .notifications_mut()
            .transient(format!("Unknown slot {}", slot_id));
        return;
    };
    apply_rack_edit(&mut state, aisle_id, rack_id, |editor, rack| {
        editor.update_slot(rack, &label, &slot_id, patch)
    });
}

fn apply_rack_edit(
    state: &mut EditorState,
    aisle_id: AisleId,
    rack_id: RackId,
    edit: impl FnOnce(&mut RackEditor, &Rack) -> Option<RackEvent>,
) {
    let layout = state.store.layout();
    let (Some(aisle), Some(rack)) = (layout.aisle(aisle_id), layout.rack(rack_id)) else {
        return;
    };
    let settings = state.settings;
    let rack_editor = state
        .rack_editors
        .entry(rack_id)
        .or_insert_with(|| settings.rack_editor(rack));
    let Some(event) = edit(rack_editor, rack) else {
        return;
    };
    let aisle_editor = state
        .aisle_editors
        .entry(aisle_id)
        .or_insert_with(|| settings.aisle_editor(aisle));
    if let Some(event) = aisle_editor.handle_rack_change(aisle, event) {
        state.store.apply_update(event);
    }
}
