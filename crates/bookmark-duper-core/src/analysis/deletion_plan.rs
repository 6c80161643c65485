use crate::progress::ProgressReporter;
use crate::storage::models::{DuplicateGroup, ItemKind, NodeId};
use crate::storage::BookmarkStore;
use ahash::AHashMap;
use std::time::Instant;
use tracing::{debug, error, info};

/// Items marked for removal by the most recent scan, in the order they were
/// marked.
#[derive(Debug, Default, Clone)]
pub struct PendingDeletions {
    order: Vec<NodeId>,
    kinds: AHashMap<NodeId, ItemKind>,
}

impl PendingDeletions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `delete` member of every group; the kept item is never marked.
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        let mut pending = Self::new();
        for group in groups {
            for item in &group.delete {
                pending.mark(item.id.clone(), group.kind);
            }
        }
        pending
    }

    /// Returns false if `id` was already marked.
    pub fn mark(&mut self, id: NodeId, kind: ItemKind) -> bool {
        if self.kinds.contains_key(&id) {
            return false;
        }
        self.kinds.insert(id.clone(), kind);
        self.order.push(id);
        true
    }

    pub fn kind_of(&self, id: &NodeId) -> Option<ItemKind> {
        self.kinds.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, ItemKind)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.kinds.get(id).map(|kind| (id, *kind)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn count_of(&self, kind: ItemKind) -> usize {
        self.kinds.values().filter(|k| **k == kind).count()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.kinds.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStatus {
    /// Nothing was pending.
    Nothing,
    Success,
    PartialFailure,
    TotalFailure,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub deleted: usize,
    pub failed: usize,
}

impl DeletionOutcome {
    pub fn attempted(&self) -> usize {
        self.deleted + self.failed
    }

    pub fn status(&self) -> DeletionStatus {
        match (self.deleted, self.failed) {
            (0, 0) => DeletionStatus::Nothing,
            (_, 0) => DeletionStatus::Success,
            (0, _) => DeletionStatus::TotalFailure,
            _ => DeletionStatus::PartialFailure,
        }
    }
}

/// Remove every pending item, one request at a time. Folders go through
/// subtree removal, bookmarks through single removal. A failed request is
/// logged and counted and the run moves on; nothing is retried.
pub fn execute_deletion_plan<S: BookmarkStore + ?Sized>(
    store: &mut S,
    pending: &PendingDeletions,
    reporter: &dyn ProgressReporter,
) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();
    if pending.is_empty() {
        debug!("Deletion requested with nothing pending");
        return outcome;
    }

    let total = pending.len();
    info!("Deleting {} duplicate(s)...", total);
    reporter.on_delete_start(total);
    let start = Instant::now();

    for (id, kind) in pending.iter() {
        let result = match kind {
            ItemKind::Folder => store.remove_subtree(id),
            ItemKind::Bookmark => store.remove_single(id),
        };

        match result {
            Ok(()) => {
                outcome.deleted += 1;
                debug!("Deleted {} {}", kind, id);
            }
            Err(e) => {
                outcome.failed += 1;
                error!("Failed to delete {} {}: {}", kind, id, e);
            }
        }
        reporter.on_delete_progress(outcome.attempted(), total);
    }

    let duration = start.elapsed();
    reporter.on_delete_complete(outcome.deleted, outcome.failed, duration.as_secs_f64());
    info!(
        "Deletion plan executed: {} succeeded, {} failed",
        outcome.deleted, outcome.failed
    );
    outcome
}
