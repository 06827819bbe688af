//! Snapshot undo/redo history.
//!
//! [`HistoryState`] keeps whole snapshots: `past` (oldest first), the
//! `present` value and `future` (next redo first). Recording a new present
//! always clears `future`, so `past` and `future` never grow from the same
//! step.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Past, present and future snapshots of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState<S> {
    past: Vec<S>,
    present: S,
    future: VecDeque<S>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl<S: Clone> HistoryState<S> {
    /// Starts a history at `present` with unlimited depth.
    pub fn new(present: S) -> Self {
        Self::with_limit(present, None)
    }

    /// Starts a history keeping at most `limit` undo steps.
    pub fn with_limit(present: S, limit: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
            limit: limit.filter(|l| *l > 0),
        }
    }

    /// The current value.
    pub fn present(&self) -> &S {
        &self.present
    }

    /// Undo stack, oldest first.
    pub fn past(&self) -> &[S] {
        &self.past
    }

    /// Redo queue, next redo first.
    pub fn future(&self) -> &VecDeque<S> {
        &self.future
    }

    /// Maximum number of undo steps, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// True when there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// True when there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Makes `next` the present, pushing the old present onto the undo
    /// stack and clearing the redo queue.
    pub fn record(&mut self, next: S) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
        self.future.clear();
    }

    /// Replaces the present without touching either stack.
    pub fn replace(&mut self, next: S) {
        self.present = next;
    }

    /// Steps back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Steps forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Forgets every undo and redo step, keeping the present.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl<S: Clone + Default> Default for HistoryState<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
