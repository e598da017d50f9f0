//! Process-wide tunables (spec.md section 6 "Configuration").
//!
//! `PAGE_SIZE` mirrors the teacher's `btree::buffer_pool::PAGE_SIZE` atomic:
//! adjustable only in test builds so a handful of tuples can be made to span
//! several pages without writing megabyte-sized fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_PAGE_SIZE: usize = 4096;
static PAGE_SIZE: AtomicUsize = AtomicUsize::new(DEFAULT_PAGE_SIZE);

pub fn page_size() -> usize {
    PAGE_SIZE.load(Ordering::Relaxed)
}

/// Shrink or grow the page size so a small fixture spans several pages.
/// Intended for tests only; production deployments should leave this at
/// `DEFAULT_PAGE_SIZE` for the lifetime of the process.
pub fn set_page_size_for_test(size: usize) {
    PAGE_SIZE.store(size, Ordering::Relaxed);
}

/// Number of pages the buffer pool caches by default.
pub const DEFAULT_PAGES: usize = 50;

/// Assumed disk cost (arbitrary units) of reading one page sequentially.
/// Fed into `TableStats` as the per-page I/O cost used by the join planner.
pub const IO_COST_PER_PAGE: usize = 1000;

/// Default bucket count for a freshly built histogram. Tests require at
/// least 100.
pub const NUM_HIST_BINS: usize = 100;

/// Fixed width of a padded STRING field's content, in bytes (spec.md
/// section 6).
pub const STRING_LEN: usize = 128;
