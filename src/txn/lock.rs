//! Per-page lock handle (spec.md section 4.3). A thin, cheaply cloned
//! handle over the shared `WaitForGraph` -- see that module for why holder
//! bookkeeping and deadlock detection live together under one mutex.
//! Named and shaped after the teacher's `concurrent_status::Lock`
//! (`XLock`/`SLock` variants over a page id).

use crate::error::DbResult;
use crate::page_id::PageId;
use crate::txn::permissions::LockMode;
use crate::txn::transaction_id::TxnId;
use crate::txn::wait_for_graph::WaitForGraph;
use std::sync::Arc;

pub struct Lock {
    page_id: PageId,
    graph: Arc<WaitForGraph>,
}

impl Lock {
    pub fn new(page_id: PageId, graph: Arc<WaitForGraph>) -> Lock {
        Lock { page_id, graph }
    }

    pub fn acquire_shared(&self, tid: TxnId) -> DbResult<()> {
        self.graph.acquire(self.page_id, tid, LockMode::Shared)
    }

    pub fn acquire_exclusive(&self, tid: TxnId) -> DbResult<()> {
        self.graph.acquire(self.page_id, tid, LockMode::Exclusive)
    }

    pub fn release(&self, tid: TxnId) {
        self.graph.release(self.page_id, tid)
    }

    pub fn holds_exclusive(&self, tid: TxnId) -> bool {
        self.graph.holds_exclusive(self.page_id, tid)
    }

    pub fn holds_shared(&self, tid: TxnId) -> bool {
        self.graph.holds_shared(self.page_id, tid)
    }
}
