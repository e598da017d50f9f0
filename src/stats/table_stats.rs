//! Per-table statistics feeding the join planner (spec.md section 4.9).
//! Grounded in the teacher's `table::HeapTable` for the page/tuple scan it
//! is built from; `TableStats` itself has no corpus analogue (see
//! DESIGN.md) and follows the standard "build one histogram per column by
//! scanning the table twice" algorithm.

use crate::config::{IO_COST_PER_PAGE, NUM_HIST_BINS};
use crate::error::DbResult;
use crate::field::FieldType;
use crate::histogram::int_histogram::IntHistogram;
use crate::histogram::string_histogram::StringHistogram;
use crate::predicate::Op;
use crate::storage::access_method::AccessMethod;
use crate::storage::heap_file::{HeapFile, HeapFileIterator};
use crate::txn::buffer_pool::BufferPool;
use crate::txn::transaction_id::TxnId;
use std::collections::HashMap;

enum ColumnHistogram {
    Int(IntHistogram),
    Str(StringHistogram),
}

pub struct TableStats {
    num_tuples: i64,
    num_pages: usize,
    io_cost_per_page: usize,
    histograms: Vec<ColumnHistogram>,
}

impl TableStats {
    /// Scan `file` twice: once to find each column's min/max (to size the
    /// histograms), once to populate them.
    pub fn compute(file: &HeapFile, bp: &BufferPool, tid: TxnId) -> DbResult<TableStats> {
        let desc = file.desc();
        let n = desc.num_fields();

        let mut mins = vec![i32::MAX; n];
        let mut maxs = vec![i32::MIN; n];
        let mut num_tuples = 0i64;

        {
            let it = HeapFileIterator::new(file, bp, tid);
            for t in it {
                let t = t?;
                num_tuples += 1;
                for i in 0..n {
                    if let crate::field::Field::Int(v) = t.get_field(i) {
                        mins[i] = mins[i].min(*v);
                        maxs[i] = maxs[i].max(*v);
                    }
                }
            }
        }

        let mut histograms = Vec::with_capacity(n);
        for i in 0..n {
            match desc.field_type(i) {
                FieldType::Int => {
                    let (lo, hi) = if mins[i] > maxs[i] { (0, 0) } else { (mins[i], maxs[i]) };
                    histograms.push(ColumnHistogram::Int(IntHistogram::new(NUM_HIST_BINS, lo, hi)));
                }
                FieldType::String => histograms.push(ColumnHistogram::Str(StringHistogram::new(NUM_HIST_BINS))),
            }
        }

        let it = HeapFileIterator::new(file, bp, tid);
        for t in it {
            let t = t?;
            for i in 0..n {
                match (&mut histograms[i], t.get_field(i)) {
                    (ColumnHistogram::Int(h), crate::field::Field::Int(v)) => h.add_value(*v),
                    (ColumnHistogram::Str(h), crate::field::Field::String(s)) => h.add_value(s),
                    _ => unreachable!("tuple field type disagrees with table schema"),
                }
            }
        }

        Ok(TableStats {
            num_tuples,
            num_pages: file.num_pages(),
            io_cost_per_page: IO_COST_PER_PAGE,
            histograms,
        })
    }

    pub fn num_tuples(&self) -> i64 {
        self.num_tuples
    }

    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Sequential-scan I/O cost: one page read per page, at
    /// `io_cost_per_page` each (spec.md section 4.9).
    pub fn estimate_scan_cost(&self) -> f64 {
        (self.num_pages * self.io_cost_per_page) as f64
    }

    pub fn estimate_table_cardinality(&self, selectivity: f64) -> usize {
        ((self.num_tuples as f64) * selectivity).round().max(0.0) as usize
    }

    pub fn estimate_selectivity_int(&self, field: usize, op: Op, v: i32) -> f64 {
        match &self.histograms[field] {
            ColumnHistogram::Int(h) => h.estimate_selectivity(op, v),
            ColumnHistogram::Str(_) => panic!("field {} is a string column", field),
        }
    }

    pub fn estimate_selectivity_string(&self, field: usize, op: Op, v: &str) -> f64 {
        match &self.histograms[field] {
            ColumnHistogram::Str(h) => h.estimate_selectivity(op, v),
            ColumnHistogram::Int(_) => panic!("field {} is an int column", field),
        }
    }
}

pub type StatsMap = HashMap<i32, TableStats>;
