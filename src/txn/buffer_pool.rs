//! The buffer pool: page cache, lock manager front door, and NO STEAL /
//! FORCE eviction policy (spec.md section 4.5).
//!
//! Grounded in the teacher's `btree::page_cache::PageCache` for the overall
//! shape (`ConcurrentHashMap<PageId, Arc<RwLock<Page>>>` buffers, acquiring
//! a lock via `concurrent_status` before `get_or_insert`-ing the page,
//! `flush_all_pages`/`tx_complete` implementing NO STEAL + FORCE) and
//! `concurrent_status::ConcurrentStatus` for per-transaction page tracking
//! (`hold_pages`).

use crate::error::{DbError, DbResult};
use crate::page_id::PageId;
use log::{debug, warn};
use crate::storage::access_method::AccessMethod;
use crate::storage::catalog::Catalog;
use crate::storage::heap_page::HeapPage;
use crate::tuple::Tuple;
use crate::txn::lock::Lock;
use crate::txn::permissions::Permissions;
use crate::txn::transaction_id::TxnId;
use crate::txn::wait_for_graph::WaitForGraph;
use crate::types::ConcurrentMap;
use std::sync::{Arc, Mutex};

pub struct BufferPool {
    catalog: Arc<dyn Catalog>,
    max_pages: usize,
    pages: ConcurrentMap<PageId, Arc<Mutex<HeapPage>>>,
    locks: ConcurrentMap<PageId, Arc<Lock>>,
    graph: Arc<WaitForGraph>,
}

impl BufferPool {
    pub fn new(catalog: Arc<dyn Catalog>, max_pages: usize) -> BufferPool {
        BufferPool {
            catalog,
            max_pages,
            pages: ConcurrentMap::new(),
            locks: ConcurrentMap::new(),
            graph: Arc::new(WaitForGraph::new()),
        }
    }

    fn lock_for(&self, pid: PageId) -> Arc<Lock> {
        if let Some(l) = self.locks.get(&pid) {
            return l;
        }
        let fresh = Arc::new(Lock::new(pid, Arc::clone(&self.graph)));
        self.locks.insert(pid, Arc::clone(&fresh));
        fresh
    }

    /// Acquire `perm` on `pid` for `tid` (blocking, with deadlock
    /// detection), then return the cached page, loading it from the access
    /// method on a cache miss after making room if necessary.
    pub fn get_page(&self, tid: TxnId, pid: PageId, perm: Permissions) -> DbResult<Arc<Mutex<HeapPage>>> {
        let lock = self.lock_for(pid);
        match perm {
            Permissions::ReadOnly => lock.acquire_shared(tid)?,
            Permissions::ReadWrite => lock.acquire_exclusive(tid)?,
        }

        if let Some(p) = self.pages.get(&pid) {
            return Ok(p);
        }

        self.ensure_capacity()?;
        let am = self
            .catalog
            .get_access_method(pid.table_id)
            .ok_or(DbError::NotFound)?;
        debug!("buffer pool miss for {:?}, loading from disk", pid);
        let page = am.read_page(pid.page_no)?;
        let entry = Arc::new(Mutex::new(page));
        self.pages.insert(pid, Arc::clone(&entry));
        Ok(entry)
    }

    /// NO STEAL: evict only clean pages. `CacheFull` if every cached page is
    /// dirty (spec.md section 4.5, section 8 property 7).
    fn ensure_capacity(&self) -> DbResult<()> {
        if self.pages.len() < self.max_pages {
            return Ok(());
        }
        let victim = self
            .pages
            .keys()
            .into_iter()
            .find(|pid| self.pages.get(pid).map_or(false, |p| p.lock().unwrap().dirty_by().is_none()));
        match victim {
            Some(pid) => {
                self.pages.remove(&pid);
                Ok(())
            }
            None => {
                warn!("buffer pool full of dirty pages, cannot evict");
                Err(DbError::CacheFull)
            }
        }
    }

    pub fn insert_tuple(&self, tid: TxnId, table_id: i32, t: Tuple) -> DbResult<()> {
        let am = self.catalog.get_access_method(table_id).ok_or(DbError::NotFound)?;
        am.insert_tuple(self, tid, t)?;
        Ok(())
    }

    pub fn delete_tuple(&self, tid: TxnId, t: &Tuple) -> DbResult<()> {
        let table_id = t
            .record_id()
            .map(|rid| rid.page_id.table_id)
            .ok_or(DbError::NotFound)?;
        let am = self.catalog.get_access_method(table_id).ok_or(DbError::NotFound)?;
        am.delete_tuple(self, tid, t)?;
        Ok(())
    }

    fn flush_page(&self, pid: PageId) -> DbResult<()> {
        if let Some(p) = self.pages.get(&pid) {
            let mut guard = p.lock().unwrap();
            if guard.dirty_by().is_some() {
                let am = self
                    .catalog
                    .get_access_method(pid.table_id)
                    .ok_or(DbError::NotFound)?;
                am.write_page(&guard)?;
                guard.mark_dirty(None);
            }
        }
        Ok(())
    }

    /// FORCE at commit: flush every page `tid` holds exclusively before
    /// releasing its locks. On abort, discard those pages from the cache
    /// instead so the next reader reloads the pre-transaction image from
    /// disk (spec.md section 4.5, section 8 property 6 and 9).
    pub fn transaction_complete(&self, tid: TxnId, commit: bool) -> DbResult<()> {
        debug!("{} completing, commit = {}", tid, commit);
        let held = self.graph.pages_held_by(tid);
        for pid in &held {
            if self.graph.holds_exclusive(*pid, tid) {
                if commit {
                    self.flush_page(*pid)?;
                } else {
                    self.pages.remove(pid);
                }
            }
        }
        for pid in &held {
            self.locks.get(pid).map(|l| l.release(tid));
        }
        self.graph.release_all(tid);
        Ok(())
    }

    pub fn flush_all_pages(&self) -> DbResult<()> {
        for pid in self.pages.keys() {
            self.flush_page(pid)?;
        }
        Ok(())
    }

    pub fn discard_page(&self, pid: PageId) {
        self.pages.remove(&pid);
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, TupleDesc};
    use crate::storage::catalog::SimpleCatalog;
    use crate::storage::heap_file::HeapFile;
    use crate::tuple::Tuple;

    fn setup(max_pages: usize) -> (Arc<SimpleCatalog>, Arc<BufferPool>, i32, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let desc = Arc::new(TupleDesc::simple_int(1, "f"));
        let file = Arc::new(HeapFile::new(dir.path().join("t.dat"), desc).unwrap());
        let table_id = file.table_id();
        let catalog = Arc::new(SimpleCatalog::new());
        catalog.add_table(table_id, file);
        let bp = Arc::new(BufferPool::new(catalog.clone(), max_pages));
        (catalog, bp, table_id, dir)
    }

    #[test]
    fn insert_and_scan_round_trips() {
        let (_catalog, bp, table_id, _dir) = setup(50);
        let tid = TxnId::new();
        let desc = Arc::new(TupleDesc::simple_int(1, "f"));
        for v in 0..10 {
            bp.insert_tuple(tid, table_id, Tuple::new(desc.clone(), vec![Field::Int(v)])).unwrap();
        }
        bp.transaction_complete(tid, true).unwrap();

        let am = bp.catalog().get_heap_file(table_id).unwrap();
        let scan_tid = TxnId::new();
        let mut it = crate::storage::heap_file::HeapFileIterator::new(&am, &bp, scan_tid);
        let values: Vec<i32> = it
            .by_ref()
            .map(|r| match r.unwrap().get_field(0) {
                Field::Int(v) => *v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn abort_discards_dirty_pages() {
        let (_catalog, bp, table_id, _dir) = setup(50);
        let desc = Arc::new(TupleDesc::simple_int(1, "f"));

        let t1 = TxnId::new();
        bp.insert_tuple(t1, table_id, Tuple::new(desc.clone(), vec![Field::Int(1)])).unwrap();
        bp.transaction_complete(t1, true).unwrap();

        let t2 = TxnId::new();
        bp.insert_tuple(t2, table_id, Tuple::new(desc.clone(), vec![Field::Int(2)])).unwrap();
        bp.transaction_complete(t2, false).unwrap();

        let am = bp.catalog().get_heap_file(table_id).unwrap();
        let scan_tid = TxnId::new();
        let it = crate::storage::heap_file::HeapFileIterator::new(&am, &bp, scan_tid);
        let values: Vec<i32> = it
            .map(|r| match r.unwrap().get_field(0) {
                Field::Int(v) => *v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(values, vec![1]);
    }
}
