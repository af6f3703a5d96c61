//! End-to-end editing flows driven through the console.
//!
//! Covers:
//! 1. Placing, rotating and restructuring an aisle and its racks
//! 2. Slot edits by display id followed by a product search
//! 3. Save / new / load round trips against the in-memory gateway, including
//!    legacy documents that repeat aisle ids
//! 4. Failed saves and loads leave the tree and the pending flag alone
//! 5. Owner sessions cannot create layouts
//! 6. Offline drafts exported and imported through RON files

use std::sync::Arc;

use glam::Vec3;
use sp_core::{Degree, LayoutDocument, LayoutSummary, RackType, Side};
use sp_editor::console::Step;
use sp_editor::{
    Console, EditorConfig, GatewayError, LayoutGateway, MemoryGateway, Persistence, Role,
    Session, create_shared_state,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// Gateway whose backend is unreachable
struct UnreachableGateway;

impl LayoutGateway for UnreachableGateway {
    fn list(&self) -> Result<Vec<LayoutSummary>, GatewayError> {
        Err(refused())
    }

    fn get(&self, _id: &str) -> Result<LayoutDocument, GatewayError> {
        Err(refused())
    }

    fn create(&self, _document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        Err(refused())
    }

    fn update(&self, _id: &str, _document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        Err(refused())
    }

    fn remove(&self, _id: &str) -> Result<(), GatewayError> {
        Err(refused())
    }

    fn assign(&self, _id: &str, _owner_id: &str) -> Result<LayoutDocument, GatewayError> {
        Err(refused())
    }
}

fn refused() -> GatewayError {
    GatewayError::Transport("connection refused".into())
}

fn console_with(gateway: Arc<dyn LayoutGateway>, session: Session) -> Console {
    let state = create_shared_state(&EditorConfig::default());
    Console::new(state, Persistence::new(gateway, session))
}

fn memory_console() -> (Console, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let console = console_with(gateway.clone(), Session::default());
    (console, gateway)
}

fn run(console: &mut Console, line: &str) -> Vec<String> {
    match console.execute(line) {
        Step::Continue(lines) => lines,
        Step::Quit => panic!("'{}' ended the session", line),
    }
}

fn run_all(console: &mut Console, lines: &[&str]) {
    for line in lines {
        run(console, line);
    }
}

// ── Editing ──────────────────────────────────────────────────────────

#[test]
fn test_place_rotate_and_restructure() {
    let (mut console, _) = memory_console();
    run_all(&mut console, &["place 10 20", "rotate"]);

    {
        let state = console.state().lock();
        let layout = state.store.layout();
        assert_eq!(layout.aisle_count(), 1);
        let aisle = layout.aisle_by_number(0).unwrap();
        assert_eq!(aisle.position, Vec3::new(10.0, 0.0, 20.0));
        assert_eq!(aisle.degree, Degree::QUARTER);
        assert_eq!(aisle.racks.len(), 3);
        assert_eq!(state.store.selection().aisle(), Some(aisle.id));
        assert!(state.store.has_pending_changes());
    }

    run_all(
        &mut console,
        &["rack 1", "shelf left add", "pick-shelf left 5", "slot add"],
    );

    let state = console.state().lock();
    let layout = state.store.layout();
    let aisle = layout.aisle_by_number(0).unwrap();
    let rack = layout.racks_of(aisle.id)[0];
    assert_eq!(rack.side(Side::Left).slots_per_shelf(), vec![3, 3, 3, 3, 4]);
    assert_eq!(rack.side(Side::Right).shelves_count(), 4);
    // Rack edits never move the aisle
    assert_eq!(aisle.degree, Degree::QUARTER);
    assert_eq!(state.store.selection().rack(), Some(rack.id));
}

#[test]
fn test_add_and_remove_racks() {
    let (mut console, _) = memory_console();
    run_all(&mut console, &["place 0 0", "add-rack l-rack"]);

    {
        let state = console.state().lock();
        let layout = state.store.layout();
        let aisle = layout.aisle_by_number(0).unwrap();
        let racks = layout.racks_of(aisle.id);
        assert_eq!(racks.len(), 4);
        assert_eq!(racks[3].rack_type, RackType::LRack);
        assert_eq!(racks[3].position, Vec3::new(9.0, 0.0, 0.0));
    }

    run_all(
        &mut console,
        &["remove-rack", "remove-rack", "remove-rack", "remove-rack", "remove-rack"],
    );
    let state = console.state().lock();
    assert_eq!(state.store.layout().rack_count(), 1);
}

#[test]
fn test_hidden_side_ignores_shelf_edits() {
    let (mut console, _) = memory_console();
    run_all(&mut console, &["place 0 0", "rack 2", "hide left", "shelf left add"]);

    let state = console.state().lock();
    let layout = state.store.layout();
    let aisle = layout.aisle_by_number(0).unwrap();
    let rack = layout.racks_of(aisle.id)[1];
    assert_eq!(rack.rack_type, RackType::RRack);
    assert_eq!(rack.side(Side::Left).shelves_count(), 4);
}

#[test]
fn test_arrow_keys_and_escape() {
    let (mut console, _) = memory_console();
    run_all(&mut console, &["place 10 20", "key ArrowUp"]);
    {
        let state = console.state().lock();
        let aisle = state.store.layout().aisle_by_number(0).unwrap();
        assert_eq!(aisle.position, Vec3::new(10.0, 0.0, 19.5));
    }

    run(&mut console, "key Escape");
    let state = console.state().lock();
    assert!(state.store.selection().is_empty());
}

#[test]
fn test_edit_slot_then_search() {
    let (mut console, _) = memory_console();
    run_all(
        &mut console,
        &["place 0 0", r#"edit A0-R2-R-SH1-S1 name="Zebra Crackers" price=4.2 quantity=7"#],
    );

    let output = run(&mut console, "search zebra");
    assert!(
        output
            .iter()
            .any(|line| line.starts_with("Found 'Zebra Crackers' at A0-R2-R-SH1-S1")),
        "unexpected output: {:?}",
        output
    );

    let state = console.state().lock();
    let hit = state.store.highlight().unwrap();
    assert_eq!(hit.rack_label, "A0-R2");
    assert!(state.store.focus().is_some());
}

#[test]
fn test_unknown_slot_and_missing_product() {
    let (mut console, _) = memory_console();
    run(&mut console, "place 0 0");

    let output = run(&mut console, "edit A7-R1-L-SH1-S1 quantity=3");
    assert_eq!(output, vec!["* Unknown slot A7-R1-L-SH1-S1".to_string()]);

    let output = run(&mut console, "search no-such-product-anywhere");
    assert_eq!(
        output,
        vec!["* Product \"no-such-product-anywhere\" not found".to_string()]
    );
}

// ── Persistence ──────────────────────────────────────────────────────

#[test]
fn test_save_new_and_load() {
    let (mut console, gateway) = memory_console();
    run_all(&mut console, &["place 4 4", "rename Dairy"]);

    let output = run(&mut console, "save");
    assert_eq!(output, vec!["* Saved 'Dairy'".to_string()]);
    assert_eq!(gateway.len(), 1);

    let id = {
        let state = console.state().lock();
        assert!(!state.store.has_pending_changes());
        state.store.layout().id.clone().unwrap()
    };

    // A second save updates in place
    run_all(&mut console, &["place 8 8", "save"]);
    assert_eq!(gateway.len(), 1);

    let listing = run(&mut console, "list");
    assert!(listing.iter().any(|line| line.contains("Dairy") && line.contains(&id)));

    run(&mut console, "new");
    assert!(console.state().lock().store.layout().is_empty());

    run(&mut console, &format!("load {}", id));
    let state = console.state().lock();
    assert_eq!(state.store.layout().name, "Dairy");
    assert_eq!(state.store.layout().aisle_count(), 2);
    assert!(!state.store.has_pending_changes());
    assert_eq!(state.aisle_editors.len(), 2);
    assert_eq!(state.rack_editors.len(), 6);
}

#[test]
fn test_load_with_repeated_aisle_ids() {
    let shelf = r#"{ "left": { "shelves": [{ "slots": [{ "productName": "first" }] }] } }"#;
    let json = format!(
        r#"{{ "name": "Legacy", "aisles": [
            {{ "id": 1, "position": [0, 0, 0], "racks": [{{ "sides": {shelf} }}] }},
            {{ "id": 1, "position": [10, 0, 0], "racks": [{{ "sides": {shelf} }}] }}
        ] }}"#
    );
    let legacy: LayoutDocument = serde_json::from_str(&json).unwrap();

    let (mut console, gateway) = memory_console();
    let stored = gateway.create(&legacy).unwrap();
    run(&mut console, &format!("load {}", stored.id.unwrap()));
    run(&mut console, "edit A2-R1-L-SH1-S1 name=EDITED");

    let state = console.state().lock();
    let layout = state.store.layout();
    let names: Vec<(u32, String)> = layout
        .aisles()
        .map(|aisle| {
            let rack = layout.racks_of(aisle.id)[0];
            let slot = &rack.side(Side::Left).shelves[0].slots[0];
            (aisle.number, slot.product_name.clone())
        })
        .collect();
    assert_eq!(
        names,
        vec![(1, "first".to_string()), (2, "EDITED".to_string())]
    );
}

#[test]
fn test_failed_save_keeps_edits() {
    let mut console = console_with(Arc::new(UnreachableGateway), Session::default());
    run(&mut console, "place 1 1");

    let output = run(&mut console, "save");
    assert_eq!(
        output,
        vec!["! Save failed: Transport error: connection refused".to_string()]
    );

    let state = console.state().lock();
    assert_eq!(state.store.layout().aisle_count(), 1);
    assert!(state.store.layout().id.is_none());
    assert!(state.store.has_pending_changes());
}

#[test]
fn test_failed_load_keeps_tree() {
    let (mut console, _) = memory_console();
    run(&mut console, "place 1 1");

    let output = run(&mut console, "load missing");
    assert_eq!(output, vec!["! Load failed: Layout not found".to_string()]);

    let state = console.state().lock();
    assert_eq!(state.store.layout().aisle_count(), 1);
    assert!(state.store.has_pending_changes());
}

#[test]
fn test_owner_cannot_create() {
    let session = Session {
        user_id: Some("owner-1".into()),
        name: "Olive".into(),
        role: Role::Owner,
        token: None,
    };
    let gateway = Arc::new(MemoryGateway::new());
    let mut console = console_with(gateway.clone(), session);
    run(&mut console, "place 0 0");

    let output = run(&mut console, "save");
    assert_eq!(output.len(), 1);
    assert!(output[0].starts_with("! Save failed: Not allowed"));
    assert!(gateway.is_empty());
    assert!(console.state().lock().store.has_pending_changes());
}

#[test]
fn test_delete_unsaved_layout() {
    let (mut console, _) = memory_console();
    run(&mut console, "place 0 0");
    let output = run(&mut console, "delete");
    assert_eq!(
        output,
        vec!["! Delete failed: Layout has not been saved yet".to_string()]
    );
    assert_eq!(console.state().lock().store.layout().aisle_count(), 1);
}

#[test]
fn test_draft_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.ron");

    let (mut console, _) = memory_console();
    run_all(&mut console, &["place 2 3", "add-rack", "rename Bakery"]);
    run(&mut console, &format!("export {}", path.display()));
    assert!(path.exists());

    run(&mut console, "new");
    run(&mut console, &format!("import {}", path.display()));

    let state = console.state().lock();
    let layout = state.store.layout();
    assert_eq!(layout.name, "Bakery");
    assert_eq!(layout.rack_count(), 4);
    assert!(state.store.has_pending_changes());
}

#[test]
fn test_quit_and_parse_errors() {
    let (mut console, _) = memory_console();
    assert_eq!(console.execute("quit"), Step::Quit);
    assert_eq!(
        console.execute("place ten 3"),
        Step::Continue(vec!["Invalid x: ten".to_string()])
    );
}
