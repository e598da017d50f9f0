//! Process-wide singleton wiring catalog + buffer pool (spec.md section 9,
//! "Global catalog" note: acceptable for tests, never observed from within
//! the core's invariants -- `BufferPool`/`HeapFile` never reach for
//! `Database::global()` themselves, only test and demo code does).
//!
//! Grounded in the teacher's `database::Database`
//! (`static DB: OnceCell<Database> = OnceCell::new()`), swapping the
//! teacher's unsafe raw-pointer `utils::Unique` singleton for the safer
//! `OnceCell` pattern `database.rs` itself already uses.

use crate::config::DEFAULT_PAGES;
use crate::storage::catalog::SimpleCatalog;
use crate::txn::buffer_pool::BufferPool;
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub struct Database {
    catalog: Arc<SimpleCatalog>,
    buffer_pool: Arc<BufferPool>,
}

static DB: OnceCell<Database> = OnceCell::new();

impl Database {
    fn new() -> Database {
        let catalog = Arc::new(SimpleCatalog::new());
        let buffer_pool = Arc::new(BufferPool::new(catalog.clone(), DEFAULT_PAGES));
        Database { catalog, buffer_pool }
    }

    pub fn global() -> &'static Database {
        DB.get_or_init(Database::new)
    }

    pub fn catalog(&self) -> &Arc<SimpleCatalog> {
        &self.catalog
    }

    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.buffer_pool
    }
}
