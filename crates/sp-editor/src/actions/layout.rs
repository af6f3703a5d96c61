//! Layout-level action handlers

use std::time::Instant;

use glam::Vec3;
use sp_core::{AisleId, RackId};

use crate::state::EditorAction;
use crate::store::SearchOutcome;

use super::ActionContext;
use super::aisle::with_selected_aisle;

/// Handle placement, selection, search and document actions
pub fn handle_layout_action(action: EditorAction, ctx: &ActionContext) {
    match action {
        EditorAction::BeginPlacing => ctx.state.lock().store.begin_placing(),
        EditorAction::CancelPlacing => ctx.state.lock().store.cancel_placing(),
        EditorAction::PlaceAisle(point) => handle_place_aisle(point, ctx),
        EditorAction::SelectAisle(aisle) => handle_select_aisle(aisle, ctx),
        EditorAction::SelectRack { aisle, rack } => handle_select_rack(aisle, rack, ctx),
        EditorAction::DeselectAll => ctx.state.lock().store.deselect_all(),
        EditorAction::RemoveSelected => handle_remove_selected(ctx),
        EditorAction::Search(term) => handle_search(term, ctx),
        EditorAction::Rename(name) => handle_rename(name, ctx),
        EditorAction::NewLayout(name) => handle_new_layout(name, ctx),
        EditorAction::KeyPress(key) => handle_key_press(key, ctx),
        _ => {}
    }
}

fn handle_place_aisle(point: Vec3, ctx: &ActionContext) {
    let mut state = ctx.state.lock();
    match state.store.place_aisle(point) {
        Some(id) => {
            state.store.select_aisle(id);
        }
        None => tracing::warn!("Not in placing mode, ignoring floor point"),
    }
}

fn handle_select_aisle(aisle: AisleId, ctx: &ActionContext) {
    if !ctx.state.lock().store.select_aisle(aisle) {
        tracing::warn!("Cannot select unknown aisle {}", aisle);
    }
}

fn handle_select_rack(aisle: AisleId, rack: RackId, ctx: &ActionContext) {
    if !ctx.state.lock().store.select_rack(aisle, rack) {
        tracing::warn!("Rack {} is not in aisle {}", rack, aisle);
    }
}

fn handle_remove_selected(ctx: &ActionContext) {
    if !ctx.state.lock().store.remove_selected() {
        tracing::debug!("Nothing selected to remove");
    }
}

fn handle_search(term: String, ctx: &ActionContext) {
    let mut state = ctx.state.lock();
    if let SearchOutcome::NotFound = state.store.search(&term) {
        tracing::info!("No product matching '{}'", term.trim());
    }
}

fn handle_rename(name: String, ctx: &ActionContext) {
    let mut state = ctx.state.lock();
    if state.store.rename(&name) {
        tracing::info!("Renamed layout to '{}'", state.store.layout().name);
    }
}

fn handle_new_layout(name: Option<String>, ctx: &ActionContext) {
    let mut state = ctx.state.lock();
    state.store.new_layout(name.as_deref());
    state.reset_editors();
    tracing::info!("Started new layout '{}'", state.store.layout().name);
}

/// Arrow keys move the selected aisle; Escape leaves placement and selection
fn handle_key_press(key: String, ctx: &ActionContext) {
    if key == "Escape" {
        let mut state = ctx.state.lock();
        state.store.cancel_placing();
        state.store.deselect_all();
        return;
    }
    with_selected_aisle(ctx, |editor, aisle| {
        editor.handle_key(aisle, &key, Instant::now())
    });
}
