//! Domain history store.
//!
//! The single source of truth for items, zones and painted cells. Every
//! mutation goes through [`DomainStore::dispatch`], which runs the reducer
//! and decides whether the step is worth an undo entry: only allowlisted
//! actions that actually change the state (full structural comparison) are
//! recorded. Dependents learn about changes through the event bus.

use std::sync::Arc;
use uuid::Uuid;

use gardenkit_core::{
    ChangeSet, DomainEvent, DomainState, EditorEvent, EventBus, HistoryMove, Item,
    PersistenceError, Zone,
};

use crate::history::HistoryState;
use crate::reducer::{reduce, DomainAction};

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Action name.
    pub action: &'static str,
    /// Parts of the state that changed.
    pub changes: ChangeSet,
    /// Whether an undo step was recorded.
    pub recorded: bool,
}

impl DispatchOutcome {
    /// True when the present state changed.
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Anything domain actions can be dispatched into.
///
/// Implemented by [`DomainStore`] and by the editor session, which wraps
/// the store and invalidates layers on top.
pub trait ActionSink {
    /// Applies an action.
    fn dispatch(&mut self, action: DomainAction) -> DispatchOutcome;

    /// Replaces items and zones wholesale without recording history.
    fn seed(&mut self, items: Vec<Item>, zones: Vec<Zone>) -> ChangeSet;

    /// Reports a failed backend call. Local state is kept as is.
    fn persistence_failed(&mut self, operation: &str, id: Option<Uuid>, error: &PersistenceError) {
        tracing::error!("{} failed for {:?}: {}", operation, id, error);
    }
}

/// Holds `{past, present, future}` of the domain state.
#[derive(Debug, Default)]
pub struct DomainStore {
    history: HistoryState<DomainState>,
    bus: Option<Arc<EventBus>>,
}

impl DomainStore {
    /// Creates a store at `initial` with unlimited history.
    pub fn new(initial: DomainState) -> Self {
        Self::with_limit(initial, None)
    }

    /// Creates a store keeping at most `limit` undo steps.
    pub fn with_limit(initial: DomainState, limit: Option<usize>) -> Self {
        Self {
            history: HistoryState::with_limit(initial, limit),
            bus: None,
        }
    }

    /// Attaches an event bus for change notifications.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// The present state.
    pub fn state(&self) -> &DomainState {
        self.history.present()
    }

    /// The full history.
    pub fn history(&self) -> &HistoryState<DomainState> {
        &self.history
    }

    /// True when there is something to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True when there is something to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reduces `action` against the present state.
    pub fn dispatch(&mut self, action: DomainAction) -> DispatchOutcome {
        let name = action.name();
        let next = reduce(self.history.present(), &action);

        if next == *self.history.present() {
            tracing::trace!("{} left the state unchanged", name);
            return DispatchOutcome {
                action: name,
                changes: ChangeSet::default(),
                recorded: false,
            };
        }

        let changes = ChangeSet::between(self.history.present(), &next);
        let recorded = action.is_undoable();
        if recorded {
            self.history.record(next);
        } else {
            self.history.replace(next);
        }
        tracing::debug!("{} applied (recorded: {})", name, recorded);

        self.notify(DomainEvent::Changed {
            action: name.to_string(),
            recorded,
            changes,
        });
        DispatchOutcome {
            action: name,
            changes,
            recorded,
        }
    }

    /// Steps back one snapshot. Returns what changed, or `None` when there
    /// was nothing to undo.
    pub fn undo(&mut self) -> Option<ChangeSet> {
        self.step(HistoryMove::Undo)
    }

    /// Steps forward one snapshot. Returns what changed, or `None` when
    /// there was nothing to redo.
    pub fn redo(&mut self) -> Option<ChangeSet> {
        self.step(HistoryMove::Redo)
    }

    /// Replaces items and zones (initial load or full refetch) and forgets
    /// all history.
    pub fn seed(&mut self, items: Vec<Item>, zones: Vec<Zone>) -> ChangeSet {
        let mut next = self.history.present().clone();
        next.items = items;
        next.zones = zones;
        let changes = ChangeSet::between(self.history.present(), &next);

        self.history.replace(next);
        self.history.clear();
        tracing::info!(
            "Loaded {} items and {} zones",
            self.state().items.len(),
            self.state().zones.len()
        );

        if !changes.is_empty() {
            self.notify(DomainEvent::Changed {
                action: "LOAD".to_string(),
                recorded: false,
                changes,
            });
        }
        changes
    }

    /// Logs a failed backend call and publishes it. Nothing is rolled back.
    pub fn report_persistence_failure(
        &self,
        operation: &str,
        id: Option<Uuid>,
        error: &PersistenceError,
    ) {
        tracing::error!("{} failed for {:?}: {}", operation, id, error);
        self.notify(DomainEvent::PersistenceFailed {
            operation: operation.to_string(),
            id,
            reason: error.to_string(),
        });
    }

    fn step(&mut self, direction: HistoryMove) -> Option<ChangeSet> {
        let before = self.history.present().clone();
        let moved = match direction {
            HistoryMove::Undo => self.history.undo(),
            HistoryMove::Redo => self.history.redo(),
        };
        if !moved {
            return None;
        }

        let changes = ChangeSet::between(&before, self.history.present());
        tracing::debug!("{:?} ({} left to undo)", direction, self.history.past().len());
        self.notify(DomainEvent::HistoryMoved { direction, changes });
        Some(changes)
    }

    fn notify(&self, event: DomainEvent) {
        if let Some(bus) = &self.bus {
            bus.notify(EditorEvent::Domain(event));
        }
    }
}

impl ActionSink for DomainStore {
    fn dispatch(&mut self, action: DomainAction) -> DispatchOutcome {
        DomainStore::dispatch(self, action)
    }

    fn seed(&mut self, items: Vec<Item>, zones: Vec<Zone>) -> ChangeSet {
        DomainStore::seed(self, items, zones)
    }

    fn persistence_failed(&mut self, operation: &str, id: Option<Uuid>, error: &PersistenceError) {
        self.report_persistence_failure(operation, id, error);
    }
}
