//! Aisle action handlers

use sp_core::Aisle;

use crate::components::{AisleEditor, AisleEvent};
use crate::state::EditorAction;

use super::ActionContext;

/// Handle actions on the selected aisle
pub fn handle_aisle_action(action: EditorAction, ctx: &ActionContext) {
    match action {
        EditorAction::MoveAisle(direction) => {
            with_selected_aisle(ctx, |editor, aisle| editor.move_by(aisle, direction))
        }
        EditorAction::RotateAisle => with_selected_aisle(ctx, |editor, aisle| editor.rotate(aisle)),
        EditorAction::AddRack(rack_type) => {
            with_selected_aisle(ctx, |editor, aisle| editor.add_rack(aisle, rack_type))
        }
        EditorAction::RemoveRack => with_selected_aisle(ctx, |editor, aisle| {
            let event = editor.remove_rack(aisle);
            if event.is_none() {
                tracing::info!("Aisle A{} keeps its last rack", aisle.number);
            }
            event
        }),
        _ => {}
    }
}

/// Run `edit` against the selected aisle's editor and apply the resulting event
pub(super) fn with_selected_aisle(
    ctx: &ActionContext,
    edit: impl FnOnce(&mut AisleEditor, &Aisle) -> Option<AisleEvent>,
) {
    let mut guard = ctx.state.lock();
    let state = &mut *guard;

    let Some(aisle_id) = state.store.selection().aisle() else {
        tracing::warn!("No aisle selected");
        return;
    };
    let Some(aisle) = state.store.layout().aisle(aisle_id) else {
        return;
    };
    let settings = state.settings;
    let editor = state
        .aisle_editors
        .entry(aisle_id)
        .or_insert_with(|| settings.aisle_editor(aisle));
    if !editor.is_selected() {
        editor.set_selected(true);
    }

    if let Some(event) = edit(editor, aisle) {
        state.store.apply_update(event);
    }
}
