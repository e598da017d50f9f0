//! Tuple-at-a-time insert operator (spec.md section 4.7). Grounded in the
//! teacher's `operator.rs` style of wrapping a child iterator, but the
//! teacher never implements an actual insert/delete operator -- this is
//! built fresh in that idiom, driving tuples through `BufferPool` rather
//! than reading a page directly.

use crate::error::DbResult;
use crate::tuple::Tuple;
use crate::txn::buffer_pool::BufferPool;
use crate::txn::transaction_id::TxnId;

/// Consumes every tuple of `source`, inserting each into `table_id` under
/// `tid`. Any `TxnAborted`/`NoSpace`/`SchemaMismatch` error from the buffer
/// pool propagates immediately -- partial inserts already applied to other
/// pages are left in place for the caller to abort via
/// `BufferPool::transaction_complete(tid, false)` (spec.md section 4.7,
/// section 8 property 9).
pub struct Insert<'a> {
    bp: &'a BufferPool,
    tid: TxnId,
    table_id: i32,
    source: Box<dyn Iterator<Item = DbResult<Tuple>> + 'a>,
    count: usize,
}

impl<'a> Insert<'a> {
    pub fn new(
        bp: &'a BufferPool,
        tid: TxnId,
        table_id: i32,
        source: Box<dyn Iterator<Item = DbResult<Tuple>> + 'a>,
    ) -> Insert<'a> {
        Insert {
            bp,
            tid,
            table_id,
            source,
            count: 0,
        }
    }

    /// Run to completion, returning the number of tuples inserted.
    pub fn execute(mut self) -> DbResult<usize> {
        for t in &mut self.source {
            let t = t?;
            self.bp.insert_tuple(self.tid, self.table_id, t)?;
            self.count += 1;
        }
        Ok(self.count)
    }
}
