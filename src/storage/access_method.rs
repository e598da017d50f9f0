//! The access-method contract the buffer pool depends on (spec.md section
//! 6). Kept as a trait -- rather than hardcoding `HeapFile` the way the
//! teacher's `BufferPool`/`PageCache` hardcode `HeapTable`/`BTreeTable` --
//! so the catalog can be injected and tests can substitute a fake (spec.md
//! section 9, "Global catalog" note).

use crate::error::DbResult;
use crate::field::TupleDesc;
use crate::page_id::PageId;
use crate::storage::heap_page::HeapPage;
use crate::tuple::Tuple;
use crate::txn::buffer_pool::BufferPool;
use crate::txn::transaction_id::TxnId;
use std::sync::Arc;

pub trait AccessMethod: Send + Sync {
    fn table_id(&self) -> i32;
    fn desc(&self) -> &Arc<TupleDesc>;
    fn num_pages(&self) -> usize;
    fn read_page(&self, page_no: usize) -> DbResult<HeapPage>;
    fn write_page(&self, page: &HeapPage) -> DbResult<()>;

    /// Insert `t`, routing page fetches through `bp` under `ReadWrite`
    /// (spec.md section 4.2). Returns every page dirtied by the insert.
    fn insert_tuple(&self, bp: &BufferPool, tid: TxnId, t: Tuple) -> DbResult<Vec<PageId>>;

    /// Delete `t` (identified by its `RecordId`), routing the page fetch
    /// through `bp` under `ReadWrite`. Returns the dirtied page.
    fn delete_tuple(&self, bp: &BufferPool, tid: TxnId, t: &Tuple) -> DbResult<Vec<PageId>>;
}
