//! Tracks the rule currently selected for display and pushes changes to the
//! registered observer.

use crm_core::types::Customer;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::Segment;

/// Reference to a selectable rule: a cataloged segment by id, or a quick
/// segment by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRef {
    Custom(Uuid),
    Quick(String),
}

/// Receives a synchronous push whenever the selection changes.
///
/// `active` is `None` after a clear, including the clear forced by deleting
/// the selected segment; `matched` is empty in that case.
pub trait SelectionObserver: Send + Sync {
    fn selection_changed(&self, active: Option<&Segment>, matched: &[Customer]);
}

/// Holds at most one active rule reference.
pub struct SelectionCoordinator {
    active: Mutex<Option<SegmentRef>>,
    observer: Mutex<Option<Box<dyn SelectionObserver>>>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            observer: Mutex::new(None),
        }
    }

    /// Register the external observer, replacing any previous one.
    pub fn set_observer(&self, observer: Box<dyn SelectionObserver>) {
        *self.observer.lock() = Some(observer);
    }

    /// Replace the active rule and notify with the freshly matched subset.
    pub fn select(&self, rule: SegmentRef, segment: &Segment, matched: &[Customer]) {
        *self.active.lock() = Some(rule);
        debug!(segment = %segment.name, matched = matched.len(), "Segment selected");
        if let Some(observer) = self.observer.lock().as_ref() {
            observer.selection_changed(Some(segment), matched);
        }
    }

    /// Drop the active rule and notify with an empty subset.
    pub fn clear(&self) {
        *self.active.lock() = None;
        debug!("Selection cleared");
        if let Some(observer) = self.observer.lock().as_ref() {
            observer.selection_changed(None, &[]);
        }
    }

    pub fn active(&self) -> Option<SegmentRef> {
        self.active.lock().clone()
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
