use std::sync::{Arc, Mutex};

use gardenkit_core::{
    Coverage, DomainEvent, DomainState, EditorEvent, EventBus, EventCategory, EventFilter, Item,
    ItemPatch, PersistenceError, Zone, ZonePatch,
};
use gardenkit_designer::persistence::{
    create_item, create_zone, delete_item, delete_zone, load_from_backend, update_item, update_zone,
};
use gardenkit_designer::{DomainStore, Editor, GardenBackend, InMemoryBackend, ITEMS_LAYER, ZONES_LAYER};
use gardenkit_settings::Config;

fn carrot() -> Item {
    Item::new("Carrot", "plant-carrot", 20.0, 20.0, 20.0, 20.0)
}

fn failures(bus: &EventBus) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Domain]), move |event| {
        if let EditorEvent::Domain(DomainEvent::PersistenceFailed { operation, .. }) = event {
            sink.lock().unwrap().push(operation.clone());
        }
    });
    seen
}

#[tokio::test]
async fn test_load_seeds_without_history() {
    let zone = Zone::new("#795548", Coverage::rect(0, 0, 3, 3));
    let backend = InMemoryBackend::with_records(vec![carrot()], vec![zone]);
    let mut store = DomainStore::default();

    let changes = load_from_backend(&mut store, &backend).await.unwrap();
    assert!(changes.items && changes.zones);
    assert_eq!(store.state().items.len(), 1);
    assert_eq!(store.state().zones.len(), 1);
    assert!(!store.can_undo());
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_failed_load_changes_nothing() {
    let backend = InMemoryBackend::with_records(vec![carrot()], vec![]);
    backend.fail_with("offline");
    let mut store = DomainStore::default();

    let result = load_from_backend(&mut store, &backend).await;
    assert!(matches!(result, Err(PersistenceError::Backend { .. })));
    assert_eq!(*store.state(), DomainState::default());
}

#[tokio::test]
async fn test_create_item_persists() {
    let backend = InMemoryBackend::new();
    let mut store = DomainStore::default();
    let item = carrot();

    create_item(&mut store, &backend, item.clone()).await.unwrap();
    assert!(store.state().has_item(item.id));
    assert_eq!(backend.items(), vec![item.clone()]);

    update_item(&mut store, &backend, ItemPatch::new(item.id).position(60.0, 0.0))
        .await
        .unwrap();
    assert_eq!(backend.items()[0].x, 60.0);
    assert_eq!(store.state().items[0].x, 60.0);

    delete_item(&mut store, &backend, item.id).await.unwrap();
    assert!(backend.items().is_empty());
    assert!(store.state().items.is_empty());
    assert_eq!(store.history().past().len(), 3);
}

#[tokio::test]
async fn test_backend_failure_keeps_optimistic_state() {
    let bus = Arc::new(EventBus::new());
    let seen = failures(&bus);
    let backend = InMemoryBackend::new();
    backend.fail_with("503 Service Unavailable");
    let mut store = DomainStore::default().with_event_bus(bus);
    let item = carrot();

    let result = create_item(&mut store, &backend, item.clone()).await;
    assert!(result.is_err());
    assert!(store.state().has_item(item.id));
    assert!(store.can_undo());
    assert!(backend.items().is_empty());
    assert_eq!(*seen.lock().unwrap(), vec!["create_item".to_string()]);
}

#[tokio::test]
async fn test_update_zone_refetches_zones() {
    let beds = Zone::new("#8bc34a", Coverage::rect(0, 0, 4, 2)).with_name("Beds");
    let shed = Zone::new("#607d8b", Coverage::rect(8, 0, 2, 2)).with_name("Shed");
    let backend = InMemoryBackend::with_records(vec![], vec![beds.clone(), shed.clone()]);

    let mut store = DomainStore::default();
    store.seed(vec![], vec![beds.clone()]);

    update_zone(&mut store, &backend, ZonePatch::new(beds.id).display_name("North beds"))
        .await
        .unwrap();

    let zones = &store.state().zones;
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].display_name.as_deref(), Some("North beds"));
    assert_eq!(zones[1].id, shed.id);
    assert_eq!(store.history().past().len(), 2);
}

#[tokio::test]
async fn test_update_zone_failure_skips_refetch() {
    let bus = Arc::new(EventBus::new());
    let seen = failures(&bus);
    let beds = Zone::new("#8bc34a", Coverage::rect(0, 0, 4, 2));
    let backend = InMemoryBackend::new();
    let mut store = DomainStore::default().with_event_bus(bus);
    store.seed(vec![], vec![beds.clone()]);

    let result = update_zone(
        &mut store,
        &backend,
        ZonePatch::new(beds.id).coverage(Coverage::rect(0, 0, 5, 2)),
    )
    .await;
    assert!(matches!(result, Err(PersistenceError::NotFound { kind: "zone", .. })));
    assert_eq!(store.state().zones[0].coverage.len(), 10);
    assert_eq!(*seen.lock().unwrap(), vec!["update_zone".to_string()]);
}

#[tokio::test]
async fn test_zone_create_and_delete() {
    let backend = InMemoryBackend::new();
    let mut store = DomainStore::default();
    let pond = Zone::new("#2196f3", Coverage::rect(3, 3, 2, 2));

    create_zone(&mut store, &backend, pond.clone()).await.unwrap();
    assert_eq!(backend.zones().len(), 1);
    assert!(create_zone(&mut store, &backend, pond.clone()).await.is_err());

    delete_zone(&mut store, &backend, pond.id).await.unwrap();
    assert!(backend.zones().is_empty());
    assert!(!store.state().has_zone(pond.id));
}

#[tokio::test]
async fn test_editor_is_an_action_sink() {
    let mut config = Config::default();
    config.world.cols = 12;
    config.world.rows = 12;
    config.viewport.width = 120.0;
    config.viewport.height = 120.0;
    let mut editor = Editor::new(config).unwrap();
    editor.tick().unwrap();

    let backend = InMemoryBackend::with_records(
        vec![carrot()],
        vec![Zone::new("#cddc39", Coverage::rect(0, 0, 2, 2))],
    );
    load_from_backend(&mut editor, &backend).await.unwrap();

    let dirty: Vec<_> = editor.dirty_layers().collect();
    assert_eq!(dirty, vec![ITEMS_LAYER, ZONES_LAYER]);
    assert_eq!(editor.tick().unwrap(), 1);
}

#[tokio::test]
async fn test_backend_is_usable_as_trait_object() {
    let backend: Arc<dyn GardenBackend> = Arc::new(InMemoryBackend::with_records(vec![carrot()], vec![]));
    let mut store = DomainStore::default();
    load_from_backend(&mut store, backend.as_ref()).await.unwrap();
    assert_eq!(store.state().items.len(), 1);
}
