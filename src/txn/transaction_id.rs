//! `TxnId` -- an opaque, monotonically increasing transaction identifier
//! (spec.md section 3). Grounded in the teacher's `transaction::tx::TransactionID`
//! (`AtomicU32`/`AtomicU64` counter, `fetch_add(1, Relaxed)`).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Eq, PartialEq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct TxnId(u64);

impl TxnId {
    pub fn new() -> TxnId {
        TxnId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TxnId {
    fn default() -> Self {
        TxnId::new()
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tx_{}", self.0)
    }
}

impl fmt::Debug for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}
