//! Save/load action handlers
//!
//! The state lock is released around every gateway call. Failures never roll
//! back the tree: a failed save keeps the edits and the pending flag, a
//! failed load leaves the current layout in place.

use std::path::PathBuf;

use sp_core::{Layout, LayoutDocument, OwnerRef};

use crate::persistence::PersistenceError;
use crate::state::EditorAction;

use super::ActionContext;

/// Handle persistence actions
pub fn handle_persistence_action(action: EditorAction, ctx: &ActionContext) {
    match action {
        EditorAction::Save => handle_save(ctx),
        EditorAction::Load(id) => handle_load(id, ctx),
        EditorAction::Delete => handle_delete(ctx),
        EditorAction::List => handle_list(ctx),
        EditorAction::Assign { owner_id } => handle_assign(owner_id, ctx),
        EditorAction::ExportDraft(path) => handle_export_draft(path, ctx),
        EditorAction::ImportDraft(path) => handle_import_draft(path, ctx),
        _ => {}
    }
}

fn report_failure(ctx: &ActionContext, what: &str, error: impl std::fmt::Display) {
    tracing::error!("{} failed: {}", what, error);
    ctx.state
        .lock()
        .store
        .notifications_mut()
        .blocking(format!("{} failed: {}", what, error));
}

fn current_layout_id(ctx: &ActionContext) -> Result<String, PersistenceError> {
    ctx.state
        .lock()
        .store
        .layout()
        .id
        .clone()
        .ok_or(PersistenceError::NoLayoutId)
}

fn handle_save(ctx: &ActionContext) {
    let (document, revision) = {
        let state = ctx.state.lock();
        (state.store.snapshot(), state.store.revision())
    };

    match ctx.persistence.save(&document) {
        Ok(saved) => {
            let mut state = ctx.state.lock();
            state.store.mark_saved(&saved, revision);
            state
                .store
                .notifications_mut()
                .transient(format!("Saved '{}'", saved.name));
        }
        Err(e) => report_failure(ctx, "Save", e),
    }
}

fn handle_load(id: String, ctx: &ActionContext) {
    match ctx.persistence.load(&id) {
        Ok(document) => {
            let mut state = ctx.state.lock();
            state.store.load_layout(Layout::from_document(document));
            state.reset_editors();
        }
        Err(e) => report_failure(ctx, "Load", e),
    }
}

fn handle_delete(ctx: &ActionContext) {
    let result = current_layout_id(ctx).and_then(|id| ctx.persistence.delete(&id));
    match result {
        Ok(()) => {
            let mut state = ctx.state.lock();
            state.store.new_layout(None);
            state.reset_editors();
            state.store.notifications_mut().transient("Layout deleted");
        }
        Err(e) => report_failure(ctx, "Delete", e),
    }
}

fn handle_list(ctx: &ActionContext) {
    match ctx.persistence.list() {
        Ok(layouts) => {
            tracing::info!("Fetched {} layouts", layouts.len());
            ctx.state.lock().layouts = layouts;
        }
        Err(e) => report_failure(ctx, "Listing layouts", e),
    }
}

fn handle_assign(owner_id: String, ctx: &ActionContext) {
    let result =
        current_layout_id(ctx).and_then(|id| ctx.persistence.assign(&id, owner_id.trim()));
    match result {
        Ok(document) => {
            let owner = document.owner.as_ref().map(|owner| owner.id().to_string());
            let mut state = ctx.state.lock();
            state.store.set_owner(owner);
            state
                .store
                .notifications_mut()
                .transient(format!("Assigned to {}", owner_id.trim()));
        }
        Err(e) => report_failure(ctx, "Assign", e),
    }
}

fn handle_export_draft(path: PathBuf, ctx: &ActionContext) {
    let document = ctx.state.lock().store.snapshot();
    match document.save_draft(&path) {
        Ok(()) => tracing::info!("Exported draft to {:?}", path),
        Err(e) => report_failure(ctx, "Export", e),
    }
}

fn handle_import_draft(path: PathBuf, ctx: &ActionContext) {
    match LayoutDocument::load_draft(&path) {
        Ok(document) => {
            tracing::info!(
                "Imported draft '{}' owned by {}",
                document.name,
                document.owner.as_ref().map(OwnerRef::id).unwrap_or("nobody")
            );
            let mut state = ctx.state.lock();
            state.store.import_layout(Layout::from_document(document));
            state.reset_editors();
        }
        Err(e) => report_failure(ctx, "Import", e),
    }
}
