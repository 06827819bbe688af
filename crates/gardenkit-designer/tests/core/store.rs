use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use gardenkit_core::{
    Cell, CellPaint, Coverage, DomainEvent, DomainState, EditorEvent, EventBus, EventFilter, Item,
    ItemPatch, Zone, ZonePatch,
};
use gardenkit_designer::{DomainAction, DomainStore};
use proptest::prelude::*;

fn tomato() -> Item {
    Item::new("Tomato", "plant-tomato", 40.0, 40.0, 20.0, 20.0)
}

#[test]
fn test_duplicate_create_item_is_rejected() {
    let mut store = DomainStore::default();
    let item = tomato();

    let first = store.dispatch(DomainAction::CreateItem(item.clone()));
    assert!(first.recorded);
    let second = store.dispatch(DomainAction::CreateItem(item));
    assert!(!second.changed());
    assert!(!second.recorded);

    assert_eq!(store.state().items.len(), 1);
    assert_eq!(store.history().past().len(), 1);
}

#[test]
fn test_distinct_items_record_two_steps() {
    let mut store = DomainStore::default();
    store.dispatch(DomainAction::CreateItem(tomato()));
    store.dispatch(DomainAction::CreateItem(tomato()));
    assert_eq!(store.state().items.len(), 2);
    assert_eq!(store.history().past().len(), 2);
}

#[test]
fn test_undo_reverts_item_update() {
    let mut store = DomainStore::default();
    let item = tomato();
    let id = item.id;
    store.dispatch(DomainAction::CreateItem(item));
    store.dispatch(DomainAction::UpdateItem(ItemPatch::new(id).position(100.0, 80.0)));
    assert_eq!(store.state().item(id).map(|i| (i.x, i.y)), Some((100.0, 80.0)));

    assert!(store.undo().is_some());
    assert_eq!(store.state().item(id).map(|i| (i.x, i.y)), Some((40.0, 40.0)));
    assert!(store.redo().is_some());
    assert_eq!(store.state().item(id).map(|i| (i.x, i.y)), Some((100.0, 80.0)));
}

#[test]
fn test_unknown_ids_leave_history_alone() {
    let mut store = DomainStore::default();
    let outcome = store.dispatch(DomainAction::UpdateZone(
        ZonePatch::new(uuid::Uuid::new_v4()).display_name("Nowhere"),
    ));
    assert!(!outcome.changed());
    assert!(!store.can_undo());
}

#[test]
fn test_colored_cells_merge_and_remove() {
    let mut store = DomainStore::default();
    let a = Cell::new(1, 1).key();
    let b = Cell::new(2, 1).key();

    let mut first = BTreeMap::new();
    first.insert(a, CellPaint::new("#ff0000"));
    store.dispatch(DomainAction::SetColoredCells(first));

    let mut second = BTreeMap::new();
    second.insert(b, CellPaint::new("#00ff00"));
    second.insert(a, CellPaint::new("#0000ff"));
    store.dispatch(DomainAction::SetColoredCells(second));

    let cells = &store.state().colored_cells;
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[&a].color, "#0000ff");

    store.dispatch(DomainAction::RemoveColoredCells(vec![a]));
    assert_eq!(store.state().colored_cells.len(), 1);
    store.dispatch(DomainAction::ClearColoredCells);
    assert!(store.state().colored_cells.is_empty());
    assert_eq!(store.history().past().len(), 4);
}

#[test]
fn test_map_lock_is_not_undoable() {
    let mut store = DomainStore::default();
    store.dispatch(DomainAction::SetMapLock(true));
    assert!(store.state().map_locked);
    assert!(!store.can_undo());

    let outcome = store.dispatch(DomainAction::SetMapLock(true));
    assert!(!outcome.changed());
}

#[test]
fn test_seed_clears_history() {
    let mut store = DomainStore::default();
    store.dispatch(DomainAction::CreateItem(tomato()));
    let zone = Zone::new("#88cc44", Coverage::rect(0, 0, 3, 3));

    let changes = store.seed(vec![], vec![zone]);
    assert!(changes.items && changes.zones);
    assert!(!store.can_undo());
    assert!(store.state().items.is_empty());
}

#[test]
fn test_dispatch_publishes_changes() {
    let bus = Arc::new(EventBus::new());
    let actions = Arc::new(Mutex::new(Vec::new()));
    let sink = actions.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let EditorEvent::Domain(DomainEvent::Changed { action, .. }) = event {
            sink.lock().unwrap().push(action.clone());
        }
    });

    let mut store = DomainStore::new(DomainState::default()).with_event_bus(bus);
    store.dispatch(DomainAction::CreateZone(Zone::new("#ffffff", Coverage::rect(0, 0, 1, 1))));
    store.dispatch(DomainAction::ClearColoredCells);

    assert_eq!(*actions.lock().unwrap(), vec!["CREATE_ZONE".to_string()]);
}

fn arb_action(ids: Vec<uuid::Uuid>) -> impl Strategy<Value = DomainAction> {
    let pick = prop::sample::select(ids);
    prop_oneof![
        (0.0f64..500.0, 0.0f64..500.0).prop_map(|(x, y)| {
            DomainAction::CreateItem(Item::new("Bush", "plant-bush", x, y, 20.0, 20.0))
        }),
        (pick.clone(), 0.0f64..500.0).prop_map(|(id, x)| {
            DomainAction::UpdateItem(ItemPatch::new(id).position(x, x))
        }),
        pick.prop_map(DomainAction::DeleteItem),
        Just(DomainAction::ToggleMapLock),
        (0i32..10, 0i32..10).prop_map(|(col, row)| {
            let mut cells = BTreeMap::new();
            cells.insert(Cell::new(col, row).key(), CellPaint::new("#336699"));
            DomainAction::SetColoredCells(cells)
        }),
    ]
}

proptest! {
    #[test]
    fn prop_undo_reverts_each_recorded_dispatch(
        actions in prop::collection::vec(arb_action(vec![uuid::Uuid::nil(), uuid::Uuid::max()]), 1..30)
    ) {
        let seed = Item {
            id: uuid::Uuid::nil(),
            ..Item::new("Oak", "tree-oak", 0.0, 0.0, 40.0, 40.0)
        };
        let mut store = DomainStore::default();
        store.seed(vec![seed], vec![]);

        for action in actions {
            let before = store.state().clone();
            let outcome = store.dispatch(action);
            if outcome.recorded {
                let after = store.state().clone();
                prop_assert!(store.undo().is_some());
                prop_assert_eq!(store.state(), &before);
                prop_assert!(store.redo().is_some());
                prop_assert_eq!(store.state(), &after);
            } else if !outcome.changed() {
                prop_assert_eq!(store.state(), &before);
            }
        }
    }
}
