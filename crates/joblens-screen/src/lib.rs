//! Result windowing and selection state for the browse-jobs screens.
//!
//! The working set and the criteria are the only mutable inputs; everything
//! downstream (ordered results, visible window, selection) is recomputed
//! from scratch on every change, never patched incrementally.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use joblens_core::{top_salary_ids, FilterCriteria, FilterEngine, JobRecord};
use tracing::debug;

pub const CRATE_NAME: &str = "joblens-screen";

/// Default page/batch size shared by both screen variants.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Which reveal controller the screen drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenVariant {
    Desktop,
    Mobile,
}

/// Batch pagination over the ordered results (desktop variant).
///
/// `current_page` is 1-indexed and always clamped to the valid range, even
/// after a criteria change shrinks the result set.
#[derive(Debug, Clone)]
pub struct PageWindow {
    page_size: usize,
    current_page: usize,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.max(1).div_ceil(self.page_size)
    }

    pub fn next_page(&mut self, total: usize) {
        self.current_page = (self.current_page + 1).min(self.total_pages(total));
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn clamp(&mut self, total: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(total));
    }

    pub fn slice<'a>(&self, ordered: &'a [JobRecord]) -> &'a [JobRecord] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= ordered.len() {
            return &[];
        }
        let end = (start + self.page_size).min(ordered.len());
        &ordered[start..end]
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

/// Infinite-scroll style reveal over the ordered results (mobile variant).
///
/// A viewport-intersection signal on a sentinel element requests loads; the
/// in-flight gate makes sure repeated signals start at most one load until
/// the previous append completes.
#[derive(Debug, Clone)]
pub struct IncrementalReveal {
    batch_size: usize,
    cursor: usize,
    displayed_ids: Vec<String>,
    seen: HashSet<String>,
    loading: bool,
}

impl IncrementalReveal {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            cursor: 0,
            displayed_ids: Vec::new(),
            seen: HashSet::new(),
            loading: false,
        }
    }

    /// Drop all progress and reveal the initial batch.
    pub fn reset(&mut self, ordered: &[JobRecord]) {
        self.cursor = 0;
        self.displayed_ids.clear();
        self.seen.clear();
        self.loading = false;
        self.load_more(ordered);
    }

    /// Append up to one batch, skipping ids already displayed. Returns the
    /// number of records actually added; zero once fully revealed.
    pub fn load_more(&mut self, ordered: &[JobRecord]) -> usize {
        let mut added = 0;
        while added < self.batch_size && self.cursor < ordered.len() {
            let record = &ordered[self.cursor];
            self.cursor += 1;
            if self.seen.insert(record.id.clone()) {
                self.displayed_ids.push(record.id.clone());
                added += 1;
            }
        }
        added
    }

    pub fn fully_revealed(&self, ordered: &[JobRecord]) -> bool {
        self.cursor >= ordered.len()
    }

    /// Sentinel became visible; request a load. Returns false while a load
    /// is already in flight or nothing is left to reveal.
    pub fn on_sentinel_visible(&mut self, ordered: &[JobRecord]) -> bool {
        if self.loading || self.fully_revealed(ordered) {
            return false;
        }
        self.loading = true;
        true
    }

    /// Perform the append requested by [`Self::on_sentinel_visible`] and
    /// release the in-flight gate.
    pub fn complete_load(&mut self, ordered: &[JobRecord]) -> usize {
        let added = self.load_more(ordered);
        self.loading = false;
        added
    }

    pub fn displayed_ids(&self) -> &[String] {
        &self.displayed_ids
    }

    /// The displayed prefix of `ordered`, duplicates skipped in the same
    /// pass order as the loads that produced it.
    pub fn displayed<'a>(&self, ordered: &'a [JobRecord]) -> Vec<&'a JobRecord> {
        let mut seen = HashSet::new();
        ordered
            .iter()
            .take(self.cursor)
            .filter(|record| seen.insert(record.id.as_str()))
            .collect()
    }
}

impl Default for IncrementalReveal {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

/// Keeps the detail-paired selection consistent with the visible window.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected_id: Option<String>,
}

impl SelectionController {
    /// Explicit user selection; holds until the next window change drops it.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected_id = Some(id.into());
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Re-derive the selection against the current window: auto-select the
    /// first visible record when the current selection left the window,
    /// clear when the window is empty.
    pub fn sync(&mut self, displayed: &[&JobRecord]) {
        if displayed.is_empty() {
            self.selected_id = None;
            return;
        }
        let still_visible = self
            .selected_id
            .as_deref()
            .map(|id| displayed.iter().any(|record| record.id == id))
            .unwrap_or(false);
        if !still_visible {
            self.selected_id = Some(displayed[0].id.clone());
        }
    }
}

/// Browse-jobs screen state machine shared by the desktop and mobile
/// variants.
///
/// Mutating operations take `now` explicitly so recomputation stays
/// deterministic under test; the date-posted bucket is the only criterion
/// that reads it.
#[derive(Debug)]
pub struct SearchScreen {
    variant: ScreenVariant,
    working_set: Vec<JobRecord>,
    criteria: FilterCriteria,
    ordered: Vec<JobRecord>,
    page: PageWindow,
    reveal: IncrementalReveal,
    selection: SelectionController,
}

impl SearchScreen {
    pub fn new(variant: ScreenVariant) -> Self {
        Self::with_window_size(variant, DEFAULT_WINDOW_SIZE)
    }

    pub fn with_window_size(variant: ScreenVariant, window_size: usize) -> Self {
        Self {
            variant,
            working_set: Vec::new(),
            criteria: FilterCriteria::default(),
            ordered: Vec::new(),
            page: PageWindow::new(window_size),
            reveal: IncrementalReveal::new(window_size),
            selection: SelectionController::default(),
        }
    }

    pub fn variant(&self) -> ScreenVariant {
        self.variant
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn ordered(&self) -> &[JobRecord] {
        &self.ordered
    }

    pub fn working_set(&self) -> &[JobRecord] {
        &self.working_set
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    /// Replace the working set wholesale (fetch/refetch); partial updates
    /// never reach this point.
    pub fn set_working_set(&mut self, jobs: Vec<JobRecord>, now: DateTime<Utc>) {
        self.working_set = jobs;
        self.recompute(now);
    }

    /// Apply one criteria mutation and recompute.
    pub fn edit_criteria(&mut self, now: DateTime<Utc>, edit: impl FnOnce(&mut FilterCriteria)) {
        edit(&mut self.criteria);
        self.recompute(now);
    }

    /// Seed criteria handed over by the navigation layer on mount.
    pub fn seed_criteria(&mut self, initial: FilterCriteria, now: DateTime<Utc>) {
        self.criteria = initial;
        self.recompute(now);
    }

    pub fn reset_criteria(&mut self, now: DateTime<Utc>) {
        self.criteria = FilterCriteria::default();
        self.recompute(now);
    }

    /// Single recomputation path: filter + sort from scratch, then the two
    /// documented side effects (reveal progress reset, selection re-sync).
    fn recompute(&mut self, now: DateTime<Utc>) {
        self.ordered = FilterEngine::apply(&self.working_set, &self.criteria, now);
        self.page.reset();
        self.reveal.reset(&self.ordered);
        self.sync_selection();
        debug!(
            working_set = self.working_set.len(),
            ordered = self.ordered.len(),
            "recomputed ordered results"
        );
    }

    fn sync_selection(&mut self) {
        // Borrow the window from the controller fields directly so the
        // selection field stays free for the mutable sync call.
        let displayed: Vec<&JobRecord> = match self.variant {
            ScreenVariant::Desktop => self.page.slice(&self.ordered).iter().collect(),
            ScreenVariant::Mobile => self.reveal.displayed(&self.ordered),
        };
        self.selection.sync(&displayed);
    }

    /// The visible window: the current page on desktop, the revealed prefix
    /// on mobile.
    pub fn displayed(&self) -> Vec<&JobRecord> {
        match self.variant {
            ScreenVariant::Desktop => self.page.slice(&self.ordered).iter().collect(),
            ScreenVariant::Mobile => self.reveal.displayed(&self.ordered),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.ordered.len())
    }

    pub fn next_page(&mut self) {
        if self.variant == ScreenVariant::Desktop {
            self.page.next_page(self.ordered.len());
            self.sync_selection();
        }
    }

    pub fn prev_page(&mut self) {
        if self.variant == ScreenVariant::Desktop {
            self.page.prev_page();
            self.sync_selection();
        }
    }

    /// Mobile scroll sentinel entered the viewport.
    pub fn sentinel_visible(&mut self) {
        if self.variant != ScreenVariant::Mobile {
            return;
        }
        if self.reveal.on_sentinel_visible(&self.ordered) {
            self.reveal.complete_load(&self.ordered);
            self.sync_selection();
        }
    }

    pub fn has_more(&self) -> bool {
        match self.variant {
            ScreenVariant::Desktop => self.page.current_page() < self.total_pages(),
            ScreenVariant::Mobile => !self.reveal.fully_revealed(&self.ordered),
        }
    }

    /// Explicit user selection for the paired detail view.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selection.select(id);
    }

    /// Ids highlighted as "top salary" in a descending order; display only.
    pub fn top_salary_ids(&self) -> Vec<String> {
        top_salary_ids(&self.ordered, self.criteria.sort)
    }
}
