//! Slotted page codec (spec.md section 4.1, on-disk layout in section 6).
//!
//! Grounded in the teacher's `page::HeapPage` (header/rows split, the
//! `N = floor(PAGE_SIZE*8 / (tupleWidth*8+1))` slot-count formula lifted
//! nearly verbatim from `page::HeapPage::get_rows_count`), rebuilt to own a
//! decoded `Vec<Option<Tuple>>` instead of the teacher's undifferentiated
//! `Vec<Row>` (which silently dropped empty slots and so could never round
//! -trip byte-for-byte, violating spec.md section 8 property 1).

use crate::error::{DbError, DbResult};
use crate::field::TupleDesc;
use crate::page_id::{PageId, RecordId};
use crate::tuple::Tuple;
use crate::txn::transaction_id::TxnId;
use std::sync::Arc;

#[derive(Clone)]
pub struct HeapPage {
    page_id: PageId,
    desc: Arc<TupleDesc>,
    num_slots: usize,
    header: Vec<u8>,
    slots: Vec<Option<Tuple>>,
    dirty_by: Option<TxnId>,
}

/// `(num_slots, header_bytes)` for a page of `page_size` bytes holding
/// tuples of `tuple_width` bytes (spec.md section 6).
pub fn layout(page_size: usize, tuple_width: usize) -> (usize, usize) {
    let num_slots = (page_size * 8) / (tuple_width * 8 + 1);
    let header_bytes = (num_slots + 7) / 8;
    (num_slots, header_bytes)
}

impl HeapPage {
    /// Decode a page image of exactly `page_size` bytes.
    pub fn new(page_id: PageId, desc: Arc<TupleDesc>, page_size: usize, bytes: &[u8]) -> HeapPage {
        assert_eq!(bytes.len(), page_size, "page image has the wrong size");
        let tuple_width = desc.width();
        let (num_slots, header_bytes) = layout(page_size, tuple_width);

        let header = bytes[0..header_bytes].to_vec();
        let mut slots = Vec::with_capacity(num_slots);
        let mut start = header_bytes;
        for slot_no in 0..num_slots {
            let end = start + tuple_width;
            let occupied = Self::bit_set(&header, slot_no);
            if occupied {
                let mut tuple = Tuple::decode(Arc::clone(&desc), &bytes[start..end]);
                tuple.set_record_id(RecordId::new(page_id, slot_no));
                slots.push(Some(tuple));
            } else {
                slots.push(None);
            }
            start = end;
        }

        HeapPage {
            page_id,
            desc,
            num_slots,
            header,
            slots,
            dirty_by: None,
        }
    }

    /// An empty page image, used both for freshly extended files (spec.md
    /// section 4.2) and as the starting point before the first insert.
    pub fn empty(page_id: PageId, desc: Arc<TupleDesc>, page_size: usize) -> HeapPage {
        let tuple_width = desc.width();
        let (num_slots, header_bytes) = layout(page_size, tuple_width);
        HeapPage {
            page_id,
            desc,
            num_slots,
            header: vec![0u8; header_bytes],
            slots: vec![None; num_slots],
            dirty_by: None,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    fn bit_set(header: &[u8], slot_no: usize) -> bool {
        let byte = header[slot_no / 8];
        (byte & (1 << (slot_no % 8))) != 0
    }

    pub fn is_slot_used(&self, slot_no: usize) -> bool {
        Self::bit_set(&self.header, slot_no)
    }

    pub fn mark_slot(&mut self, slot_no: usize, used: bool) {
        let byte = &mut self.header[slot_no / 8];
        if used {
            *byte |= 1 << (slot_no % 8);
        } else {
            *byte &= !(1 << (slot_no % 8));
        }
    }

    pub fn get_num_empty_slots(&self) -> usize {
        (0..self.num_slots)
            .filter(|&i| !self.is_slot_used(i))
            .count()
    }

    /// Find the lowest-numbered free slot, write `tuple`'s fields into it,
    /// set its record id, and mark the slot occupied.
    pub fn insert_tuple(&mut self, mut tuple: Tuple) -> DbResult<()> {
        if !tuple.matches_schema(&self.desc) {
            return Err(DbError::SchemaMismatch);
        }
        let slot_no = (0..self.num_slots)
            .find(|&i| !self.is_slot_used(i))
            .ok_or(DbError::NoSpace)?;
        tuple.set_record_id(RecordId::new(self.page_id, slot_no));
        self.slots[slot_no] = Some(tuple);
        self.mark_slot(slot_no, true);
        Ok(())
    }

    pub fn delete_tuple(&mut self, tuple: &Tuple) -> DbResult<()> {
        let rid = tuple.record_id().ok_or(DbError::NotFound)?;
        if rid.page_id != self.page_id || !self.is_slot_used(rid.slot_no) {
            return Err(DbError::NotFound);
        }
        self.slots[rid.slot_no] = None;
        self.mark_slot(rid.slot_no, false);
        Ok(())
    }

    /// Occupied tuples in ascending slot order. Finite and restartable: a
    /// fresh call always starts from slot 0.
    pub fn iter(&self) -> impl Iterator<Item = Tuple> + '_ {
        self.slots.iter().filter_map(|s| s.clone())
    }

    pub fn dirty_by(&self) -> Option<TxnId> {
        self.dirty_by
    }

    pub fn mark_dirty(&mut self, tid: Option<TxnId>) {
        self.dirty_by = tid;
    }

    /// Produce an exact `page_size`-byte image: header, then slots
    /// (occupied slots' field bytes, empty slots zeroed), then zero padding
    /// up to `page_size`. `decode(encode(p), page_size) == p` (spec.md
    /// section 8 property 1).
    pub fn get_page_data(&self, page_size: usize) -> Vec<u8> {
        let tuple_width = self.desc.width();
        let mut buf = Vec::with_capacity(page_size);
        buf.extend_from_slice(&self.header);
        for slot in &self.slots {
            match slot {
                Some(t) => buf.extend_from_slice(&t.encode()),
                None => buf.extend(std::iter::repeat(0u8).take(tuple_width)),
            }
        }
        buf.resize(page_size, 0);
        buf
    }
}
