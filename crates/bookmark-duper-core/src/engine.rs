use crate::analysis::{
    execute_deletion_plan, find_duplicate_groups, DeletionOutcome, PendingDeletions,
};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::flatten_tree;
use crate::storage::models::{DuplicateGroup, ItemKind};
use crate::storage::BookmarkStore;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    PreviewReady,
    Deleting,
}

/// What a scan found, for the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub groups: Vec<DuplicateGroup>,
    pub bookmarks_scanned: usize,
    pub folders_scanned: usize,
    pub duplicate_bookmarks: usize,
    pub duplicate_folders: usize,
    pub scan_duration: Duration,
}

impl ScanReport {
    pub fn total_duplicates(&self) -> usize {
        self.duplicate_bookmarks + self.duplicate_folders
    }

    pub fn groups_of(&self, kind: ItemKind) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(move |g| g.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Terminal for this cycle; the engine stays idle.
    NoDuplicates,
    Duplicates(ScanReport),
}

/// Owns the scan-scoped state: the latest report and the items it marked.
///
/// Idle → scan → PreviewReady (or Idle when nothing is duplicated);
/// PreviewReady → confirm → Deleting → Idle; PreviewReady → cancel → Idle.
pub struct DedupeEngine {
    state: EngineState,
    report: Option<ScanReport>,
    pending: PendingDeletions,
}

impl Default for DedupeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupeEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            report: None,
            pending: PendingDeletions::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn pending(&self) -> &PendingDeletions {
        &self.pending
    }

    pub fn report(&self) -> Option<&ScanReport> {
        self.report.as_ref()
    }

    /// Recompute everything from a fresh snapshot, discarding the previous
    /// scan. A failed tree read leaves the engine idle with nothing pending.
    pub fn scan<S: BookmarkStore + ?Sized>(
        &mut self,
        store: &S,
        reporter: &dyn ProgressReporter,
    ) -> Result<ScanOutcome, Error> {
        self.reset();

        info!("Scanning bookmarks and folders...");
        reporter.on_scan_start();
        let start = Instant::now();

        let tree = store.get_full_tree().map_err(|e| match e {
            Error::Retrieval(_) => e,
            other => Error::Retrieval(other.to_string()),
        })?;
        let flattened = flatten_tree(&tree);
        let groups = find_duplicate_groups(&flattened);
        let scan_duration = start.elapsed();

        reporter.on_scan_complete(
            flattened.total_nodes(),
            groups.len(),
            scan_duration.as_secs_f64(),
        );

        if groups.is_empty() {
            info!("No duplicates found!");
            return Ok(ScanOutcome::NoDuplicates);
        }

        let pending = PendingDeletions::from_groups(&groups);
        let report = ScanReport {
            bookmarks_scanned: flattened.bookmarks.len(),
            folders_scanned: flattened.folders.len(),
            duplicate_bookmarks: pending.count_of(ItemKind::Bookmark),
            duplicate_folders: pending.count_of(ItemKind::Folder),
            groups,
            scan_duration,
        };
        info!(
            "Found {} duplicate bookmark(s) and {} duplicate folder(s)",
            report.duplicate_bookmarks, report.duplicate_folders
        );

        self.pending = pending;
        self.report = Some(report.clone());
        self.state = EngineState::PreviewReady;
        Ok(ScanOutcome::Duplicates(report))
    }

    /// Delete everything the last scan marked. Outside `PreviewReady` there is
    /// nothing pending and this returns an empty outcome without touching the
    /// store. State is reset afterwards whatever the outcome.
    pub fn confirm<S: BookmarkStore + ?Sized>(
        &mut self,
        store: &mut S,
        reporter: &dyn ProgressReporter,
    ) -> DeletionOutcome {
        if self.state != EngineState::PreviewReady {
            debug!("Confirm ignored in state {:?}", self.state);
            return DeletionOutcome::default();
        }

        self.state = EngineState::Deleting;
        let outcome = execute_deletion_plan(store, &self.pending, reporter);
        self.reset();
        outcome
    }

    /// Drop the preview without touching the store.
    pub fn cancel(&mut self) {
        if self.state == EngineState::PreviewReady {
            info!("Deletion cancelled, {} item(s) left in place", self.pending.len());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.report = None;
        self.state = EngineState::Idle;
    }
}
