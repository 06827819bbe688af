//! Persistence contract and optimistic updates.
//!
//! The editor does not own a transport. The surrounding application
//! implements [`GardenBackend`]; the functions in this module apply a
//! mutation locally first, then call the backend. A failed call is logged
//! and reported but the local state is kept; a later full reload is the
//! reconciliation path.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use gardenkit_core::{ChangeSet, Item, ItemPatch, PersistenceError, Zone, ZonePatch};

use crate::reducer::DomainAction;
use crate::store::ActionSink;

/// Remote storage for items and zones.
#[async_trait]
pub trait GardenBackend: Send + Sync {
    /// Fetches every item.
    async fn fetch_items(&self) -> Result<Vec<Item>, PersistenceError>;

    /// Fetches every zone.
    async fn fetch_zones(&self) -> Result<Vec<Zone>, PersistenceError>;

    /// Stores a new item.
    async fn create_item(&self, item: &Item) -> Result<Item, PersistenceError>;

    /// Applies a partial update to an item.
    async fn update_item(&self, patch: &ItemPatch) -> Result<Item, PersistenceError>;

    /// Deletes an item.
    async fn delete_item(&self, id: Uuid) -> Result<(), PersistenceError>;

    /// Stores a new zone.
    async fn create_zone(&self, zone: &Zone) -> Result<Zone, PersistenceError>;

    /// Applies a partial update to a zone.
    async fn update_zone(&self, patch: &ZonePatch) -> Result<Zone, PersistenceError>;

    /// Deletes a zone.
    async fn delete_zone(&self, id: Uuid) -> Result<(), PersistenceError>;
}

/// A backend kept in memory, with failure injection.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    items: RwLock<Vec<Item>>,
    zones: RwLock<Vec<Zone>>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding the given records.
    pub fn with_records(items: Vec<Item>, zones: Vec<Zone>) -> Self {
        Self {
            items: RwLock::new(items),
            zones: RwLock::new(zones),
            ..Self::default()
        }
    }

    /// Makes every following call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }

    /// Stops failing.
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Number of calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copy of the stored items.
    pub fn items(&self) -> Vec<Item> {
        self.items.read().clone()
    }

    /// Copy of the stored zones.
    pub fn zones(&self) -> Vec<Zone> {
        self.zones.read().clone()
    }

    fn enter(&self) -> Result<(), PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().as_ref() {
            Some(reason) => Err(PersistenceError::Backend {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GardenBackend for InMemoryBackend {
    async fn fetch_items(&self) -> Result<Vec<Item>, PersistenceError> {
        self.enter()?;
        Ok(self.items())
    }

    async fn fetch_zones(&self) -> Result<Vec<Zone>, PersistenceError> {
        self.enter()?;
        Ok(self.zones())
    }

    async fn create_item(&self, item: &Item) -> Result<Item, PersistenceError> {
        self.enter()?;
        let mut items = self.items.write();
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(PersistenceError::Conflict {
                kind: "item",
                id: item.id,
            });
        }
        items.push(item.clone());
        Ok(item.clone())
    }

    async fn update_item(&self, patch: &ItemPatch) -> Result<Item, PersistenceError> {
        self.enter()?;
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|item| item.id == patch.id)
            .ok_or(PersistenceError::NotFound {
                kind: "item",
                id: patch.id,
            })?;
        item.apply(patch);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), PersistenceError> {
        self.enter()?;
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(PersistenceError::NotFound { kind: "item", id });
        }
        Ok(())
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, PersistenceError> {
        self.enter()?;
        let mut zones = self.zones.write();
        if zones.iter().any(|existing| existing.id == zone.id) {
            return Err(PersistenceError::Conflict {
                kind: "zone",
                id: zone.id,
            });
        }
        zones.push(zone.clone());
        Ok(zone.clone())
    }

    async fn update_zone(&self, patch: &ZonePatch) -> Result<Zone, PersistenceError> {
        self.enter()?;
        let mut zones = self.zones.write();
        let zone = zones
            .iter_mut()
            .find(|zone| zone.id == patch.id)
            .ok_or(PersistenceError::NotFound {
                kind: "zone",
                id: patch.id,
            })?;
        zone.apply(patch);
        Ok(zone.clone())
    }

    async fn delete_zone(&self, id: Uuid) -> Result<(), PersistenceError> {
        self.enter()?;
        let mut zones = self.zones.write();
        let before = zones.len();
        zones.retain(|zone| zone.id != id);
        if zones.len() == before {
            return Err(PersistenceError::NotFound { kind: "zone", id });
        }
        Ok(())
    }
}

fn settle<T, S: ActionSink + ?Sized>(
    sink: &mut S,
    operation: &str,
    id: Option<Uuid>,
    result: Result<T, PersistenceError>,
) -> Result<T, PersistenceError> {
    if let Err(e) = &result {
        sink.persistence_failed(operation, id, e);
    }
    result
}

/// Seeds the sink with every item and zone from the backend.
///
/// Nothing is applied unless both fetches succeed.
pub async fn load_from_backend<S, B>(sink: &mut S, backend: &B) -> Result<ChangeSet, PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    let fetched: Result<(Vec<Item>, Vec<Zone>), PersistenceError> = async {
        let items = backend.fetch_items().await?;
        let zones = backend.fetch_zones().await?;
        Ok((items, zones))
    }
    .await;
    let (items, zones) = settle(sink, "load", None, fetched)?;
    Ok(sink.seed(items, zones))
}

/// Adds an item locally, then persists it.
pub async fn create_item<S, B>(sink: &mut S, backend: &B, item: Item) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    let id = item.id;
    sink.dispatch(DomainAction::CreateItem(item.clone()));
    let result = backend.create_item(&item).await.map(|_| ());
    settle(sink, "create_item", Some(id), result)
}

/// Updates an item locally, then persists the patch.
pub async fn update_item<S, B>(sink: &mut S, backend: &B, patch: ItemPatch) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    let id = patch.id;
    sink.dispatch(DomainAction::UpdateItem(patch.clone()));
    let result = backend.update_item(&patch).await.map(|_| ());
    settle(sink, "update_item", Some(id), result)
}

/// Deletes an item locally, then on the backend.
pub async fn delete_item<S, B>(sink: &mut S, backend: &B, id: Uuid) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    sink.dispatch(DomainAction::DeleteItem(id));
    let result = backend.delete_item(id).await;
    settle(sink, "delete_item", Some(id), result)
}

/// Adds a zone locally, then persists it.
pub async fn create_zone<S, B>(sink: &mut S, backend: &B, zone: Zone) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    let id = zone.id;
    sink.dispatch(DomainAction::CreateZone(zone.clone()));
    let result = backend.create_zone(&zone).await.map(|_| ());
    settle(sink, "create_zone", Some(id), result)
}

/// Updates a zone locally, persists the patch, then replaces the local zones
/// with the backend's list.
pub async fn update_zone<S, B>(sink: &mut S, backend: &B, patch: ZonePatch) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    let id = patch.id;
    sink.dispatch(DomainAction::UpdateZone(patch.clone()));
    let result: Result<Vec<Zone>, PersistenceError> = async {
        backend.update_zone(&patch).await?;
        backend.fetch_zones().await
    }
    .await;
    let zones = settle(sink, "update_zone", Some(id), result)?;
    sink.dispatch(DomainAction::SetZones(zones));
    Ok(())
}

/// Deletes a zone locally, then on the backend.
pub async fn delete_zone<S, B>(sink: &mut S, backend: &B, id: Uuid) -> Result<(), PersistenceError>
where
    S: ActionSink + ?Sized,
    B: GardenBackend + ?Sized,
{
    sink.dispatch(DomainAction::DeleteZone(id));
    let result = backend.delete_zone(id).await;
    settle(sink, "delete_zone", Some(id), result)
}
