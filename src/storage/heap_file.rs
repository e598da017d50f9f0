//! Heap-organized access method (spec.md section 4.2). Grounded in the
//! teacher's `table::HeapTable` (`file: Arc<Mutex<File>>`, seek +
//! `read_exact` page I/O, `create_random_heap_table`'s header+row byte
//! layout) and `btree::page_cache::PageCache`'s convention of routing every
//! page fetch through the buffer pool rather than touching disk directly.

use crate::config::page_size;
use crate::error::{DbError, DbResult};
use crate::field::TupleDesc;
use crate::page_id::PageId;
use crate::storage::access_method::AccessMethod;
use crate::storage::heap_page::HeapPage;
use crate::tuple::Tuple;
use crate::txn::buffer_pool::BufferPool;
use crate::txn::permissions::Permissions;
use crate::txn::transaction_id::TxnId;
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::fs::{File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct HeapFile {
    table_id: i32,
    desc: Arc<TupleDesc>,
    path: PathBuf,
    file: Mutex<File>,
}

/// Deterministic hash of the canonicalized absolute path, stable across
/// process runs for the same file (spec.md section 3, section 6 "TableId
/// derivation") -- grounded in the teacher's `BTreeFile::new`
/// (`DefaultHasher` over `file_path`, cast to `i32`).
fn table_id_for_path(path: &Path) -> DbResult<i32> {
    let canonical = path.canonicalize()?;
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok(hasher.finish() as i32)
}

impl HeapFile {
    pub fn new<P: AsRef<Path>>(path: P, desc: Arc<TupleDesc>) -> DbResult<HeapFile> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let table_id = table_id_for_path(&path)?;
        Ok(HeapFile {
            table_id,
            desc,
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccessMethod for HeapFile {
    fn table_id(&self) -> i32 {
        self.table_id
    }

    fn desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    /// `numPages() = ceil(fileLength / PAGE_SIZE)` (spec.md section 4.2).
    fn num_pages(&self) -> usize {
        let len = self.file.lock().unwrap().metadata().map(|m| m.len()).unwrap_or(0);
        let page_size = page_size() as u64;
        ((len + page_size - 1) / page_size) as usize
    }

    fn read_page(&self, page_no: usize) -> DbResult<HeapPage> {
        let page_size = page_size();
        let mut f = self.file.lock().unwrap();
        let len = f.metadata().map(|m| m.len()).unwrap_or(0);
        let num_pages = ((len + page_size as u64 - 1) / page_size as u64) as usize;
        if page_no >= num_pages {
            // A newly extended page: a fresh, empty image (spec.md 4.2).
            return Ok(HeapPage::empty(
                PageId::new(self.table_id, page_no),
                Arc::clone(&self.desc),
                page_size,
            ));
        }
        let mut buf = vec![0u8; page_size];
        f.seek(SeekFrom::Start((page_no * page_size) as u64))?;
        f.read_exact(&mut buf)?;
        Ok(HeapPage::new(
            PageId::new(self.table_id, page_no),
            Arc::clone(&self.desc),
            page_size,
            &buf,
        ))
    }

    fn write_page(&self, page: &HeapPage) -> DbResult<()> {
        let page_size = page_size();
        let mut f = self.file.lock().unwrap();
        let page_no = page.page_id().page_no;
        f.seek(SeekFrom::Start((page_no * page_size) as u64))?;
        f.write_all(&page.get_page_data(page_size))?;
        f.flush()?;
        Ok(())
    }

    /// Scan `pageNo = 0..numPages()-1`, under `ReadWrite`, for the first page
    /// with a free slot; if none has space, allocate a fresh page. Returns
    /// the single page that was dirtied (spec.md section 4.2).
    fn insert_tuple(&self, bp: &BufferPool, tid: TxnId, t: Tuple) -> DbResult<Vec<PageId>> {
        let existing = self.num_pages();
        for page_no in 0..existing {
            let pid = PageId::new(self.table_id, page_no);
            let page = bp.get_page(tid, pid, Permissions::ReadWrite)?;
            let mut guard = page.lock().unwrap();
            if guard.get_num_empty_slots() > 0 {
                guard.insert_tuple(t)?;
                guard.mark_dirty(Some(tid));
                return Ok(vec![pid]);
            }
        }
        // No existing page had room: extend the file with an empty page,
        // then let the buffer pool load it fresh and insert into it.
        debug!("{:?} extending with page {}", self.path, existing);
        let empty = HeapPage::empty(PageId::new(self.table_id, existing), Arc::clone(&self.desc), page_size());
        self.write_page(&empty)?;
        let pid = PageId::new(self.table_id, existing);
        let page = bp.get_page(tid, pid, Permissions::ReadWrite)?;
        let mut guard = page.lock().unwrap();
        guard.insert_tuple(t)?;
        guard.mark_dirty(Some(tid));
        Ok(vec![pid])
    }

    fn delete_tuple(&self, bp: &BufferPool, tid: TxnId, t: &Tuple) -> DbResult<Vec<PageId>> {
        let rid = t.record_id().ok_or(DbError::NotFound)?;
        let page = bp.get_page(tid, rid.page_id, Permissions::ReadWrite)?;
        let mut guard = page.lock().unwrap();
        guard.delete_tuple(t)?;
        guard.mark_dirty(Some(tid));
        Ok(vec![rid.page_id])
    }
}

/// Finite, restartable iterator over every tuple of a `HeapFile`, fetching
/// each page through the buffer pool under the scanning transaction's
/// `ReadOnly` lock (spec.md section 4.2, "iterator").
pub struct HeapFileIterator<'a> {
    bp: &'a BufferPool,
    file: &'a HeapFile,
    tid: TxnId,
    next_page_no: usize,
    buf: Vec<Tuple>,
    idx: usize,
}

impl<'a> HeapFileIterator<'a> {
    pub fn new(file: &'a HeapFile, bp: &'a BufferPool, tid: TxnId) -> HeapFileIterator<'a> {
        HeapFileIterator {
            bp,
            file,
            tid,
            next_page_no: 0,
            buf: Vec::new(),
            idx: 0,
        }
    }

    pub fn rewind(&mut self) {
        self.next_page_no = 0;
        self.buf.clear();
        self.idx = 0;
    }
}

impl<'a> Iterator for HeapFileIterator<'a> {
    type Item = DbResult<Tuple>;

    fn next(&mut self) -> Option<DbResult<Tuple>> {
        loop {
            if self.idx < self.buf.len() {
                let t = self.buf[self.idx].clone();
                self.idx += 1;
                return Some(Ok(t));
            }
            if self.next_page_no >= self.file.num_pages() {
                return None;
            }
            let pid = PageId::new(self.file.table_id(), self.next_page_no);
            self.next_page_no += 1;
            let page = match self.bp.get_page(self.tid, pid, Permissions::ReadOnly) {
                Ok(p) => p,
                Err(e) => return Some(Err(e)),
            };
            self.buf = page.lock().unwrap().iter().collect();
            self.idx = 0;
        }
    }
}
