//! Tuple-at-a-time delete operator (spec.md section 4.7). Mirror of
//! `Insert`; see that module's docs.

use crate::error::DbResult;
use crate::tuple::Tuple;
use crate::txn::buffer_pool::BufferPool;
use crate::txn::transaction_id::TxnId;

pub struct Delete<'a> {
    bp: &'a BufferPool,
    tid: TxnId,
    source: Box<dyn Iterator<Item = DbResult<Tuple>> + 'a>,
    count: usize,
}

impl<'a> Delete<'a> {
    pub fn new(bp: &'a BufferPool, tid: TxnId, source: Box<dyn Iterator<Item = DbResult<Tuple>> + 'a>) -> Delete<'a> {
        Delete {
            bp,
            tid,
            source,
            count: 0,
        }
    }

    /// Run to completion, returning the number of tuples deleted.
    pub fn execute(mut self) -> DbResult<usize> {
        for t in &mut self.source {
            let t = t?;
            self.bp.delete_tuple(self.tid, &t)?;
            self.count += 1;
        }
        Ok(self.count)
    }
}
