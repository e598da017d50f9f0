//! End-to-end scenarios (spec.md section 8, S1-S6).

use heapdb::config::set_page_size_for_test;
use heapdb::error::DbError;
use heapdb::field::{Field, TupleDesc};
use heapdb::predicate::Op;
use heapdb::storage::access_method::AccessMethod;
use heapdb::storage::catalog::SimpleCatalog;
use heapdb::storage::heap_file::{HeapFile, HeapFileIterator};
use heapdb::tuple::Tuple;
use heapdb::txn::buffer_pool::BufferPool;
use heapdb::txn::transaction_id::TxnId;
use std::sync::Arc;

fn one_int_table(page_size: usize, max_pages: usize) -> (Arc<SimpleCatalog>, Arc<BufferPool>, i32, tempfile::TempDir) {
    set_page_size_for_test(page_size);
    let dir = tempfile::tempdir().unwrap();
    let desc = Arc::new(TupleDesc::simple_int(1, "v"));
    let file = Arc::new(HeapFile::new(dir.path().join("t.dat"), desc).unwrap());
    let table_id = file.table_id();
    let catalog = Arc::new(SimpleCatalog::new());
    catalog.add_table(table_id, file);
    let bp = Arc::new(BufferPool::new(catalog.clone(), max_pages));
    (catalog, bp, table_id, dir)
}

fn scan_values(bp: &BufferPool, table_id: i32) -> Vec<i32> {
    let file = bp.catalog().get_heap_file(table_id).unwrap();
    let tid = TxnId::new();
    let it = HeapFileIterator::new(&file, bp, tid);
    it.map(|r| match r.unwrap().get_field(0) {
        Field::Int(v) => *v,
        _ => unreachable!(),
    })
    .collect()
}

#[test]
fn s1_scan_yields_the_inserted_multiset() {
    // Tuple width 4 bytes; page_size=20 gives floor(20*8/(4*8+1)) = 4
    // tuples/page under the bitmap-header layout, so 8 tuples span exactly
    // 2 pages, matching a 2-page buffer pool.
    let (_catalog, bp, table_id, _dir) = one_int_table(20, 2);
    let desc = Arc::new(TupleDesc::simple_int(1, "v"));
    let tid = TxnId::new();
    for v in [3, 1, 4, 1, 5, 9, 2, 6] {
        bp.insert_tuple(tid, table_id, Tuple::new(desc.clone(), vec![Field::Int(v)])).unwrap();
    }
    bp.transaction_complete(tid, true).unwrap();

    let mut values = scan_values(&bp, table_id);
    values.sort();
    let mut expected = vec![3, 1, 4, 1, 5, 9, 2, 6];
    expected.sort();
    assert_eq!(values, expected);
}

#[test]
fn s2_insert_then_delete_below_threshold() {
    let (_catalog, bp, table_id, _dir) = one_int_table(4096, 10);
    let desc = Arc::new(TupleDesc::simple_int(1, "v"));

    let t1 = TxnId::new();
    for v in [10, 20, 30] {
        bp.insert_tuple(t1, table_id, Tuple::new(desc.clone(), vec![Field::Int(v)])).unwrap();
    }
    bp.transaction_complete(t1, true).unwrap();

    let t2 = TxnId::new();
    let to_delete: Vec<Tuple> = {
        let file = bp.catalog().get_heap_file(table_id).unwrap();
        HeapFileIterator::new(&file, &bp, t2)
            .map(Result::unwrap)
            .filter(|t| matches!(t.get_field(0), Field::Int(v) if *v < 25))
            .collect()
    };
    let mut deleted = 0;
    for t in &to_delete {
        bp.delete_tuple(t2, t).unwrap();
        deleted += 1;
    }
    bp.transaction_complete(t2, true).unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(scan_values(&bp, table_id), vec![30]);
}

#[test]
fn s3_grouped_average() {
    use heapdb::operator::aggregate::{AggOp, IntegerAggregator};

    let mut avg = IntegerAggregator::new(AggOp::Avg);
    let rows = [(1, 10), (1, 20), (2, 5)];
    for (a, b) in rows {
        avg.merge(Some(Field::Int(a)), b);
    }
    let mut results = avg.results();
    results.sort_by_key(|(k, _)| match k {
        Some(Field::Int(v)) => *v,
        _ => unreachable!(),
    });
    assert_eq!(
        results,
        vec![(Some(Field::Int(1)), 15), (Some(Field::Int(2)), 5)]
    );
}

#[test]
fn s4_histogram_selectivity() {
    use heapdb::histogram::int_histogram::IntHistogram;

    let mut h = IntHistogram::new(10, 1, 100);
    for v in 1..=100 {
        h.add_value(v);
    }
    let eq = h.estimate_selectivity(Op::Equals, 42);
    assert!((eq - 0.01).abs() < 0.001, "eq = {}", eq);

    let lt = h.estimate_selectivity(Op::LessThan, 42);
    assert!((lt - 0.41).abs() < 0.02, "lt = {}", lt);

    let gt = h.estimate_selectivity(Op::GreaterThan, 100);
    assert_eq!(gt, 0.0);
}

#[test]
fn s5_deadlock_aborts_exactly_one_side() {
    use heapdb::page_id::PageId;
    use heapdb::txn::permissions::Permissions;

    let (_catalog, bp, table_id, _dir) = one_int_table(4096, 10);
    let p1 = PageId::new(table_id, 0);
    let p2 = PageId::new(table_id, 1);
    // materialize both pages so get_page hits the cache, not a blocking disk read
    let _ = bp.get_page(TxnId::new(), p1, Permissions::ReadOnly).unwrap();
    let _ = bp.get_page(TxnId::new(), p2, Permissions::ReadOnly).unwrap();

    let t1 = TxnId::new();
    let t2 = TxnId::new();
    bp.get_page(t1, p1, Permissions::ReadWrite).unwrap();
    bp.get_page(t2, p2, Permissions::ReadWrite).unwrap();

    let bp_clone = Arc::clone(&bp);
    let handle = std::thread::spawn(move || bp_clone.get_page(t1, p2, Permissions::ReadWrite));
    std::thread::sleep(std::time::Duration::from_millis(50));

    let second = bp.get_page(t2, p1, Permissions::ReadWrite);
    let first = handle.join().unwrap();

    let aborted = [&first, &second].iter().filter(|r| matches!(r, Err(DbError::TxnAborted))).count();
    let succeeded = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(aborted, 1, "exactly one side should be the deadlock victim");
    assert_eq!(succeeded, 1);

    let (winner, loser) = if first.is_ok() { (t1, t2) } else { (t2, t1) };
    bp.transaction_complete(winner, true).unwrap();
    bp.transaction_complete(loser, false).unwrap();
}

#[test]
fn s6_no_steal_keeps_dirty_pages_off_disk_until_commit() {
    use heapdb::page_id::PageId;
    use heapdb::txn::permissions::Permissions;

    // A 1-page buffer pool: once T1 dirties P1, no other page can be
    // cached until T1 commits or aborts.
    let (_catalog, bp, table_id, _dir) = one_int_table(4096, 1);
    let desc = Arc::new(TupleDesc::simple_int(1, "v"));
    let t1 = TxnId::new();
    bp.insert_tuple(t1, table_id, Tuple::new(desc.clone(), vec![Field::Int(7)])).unwrap();

    // A concurrent reader wants a different page; P1 is the only cached
    // page and it is dirty, so there is no room.
    let t2 = TxnId::new();
    let p2 = PageId::new(table_id, 1);
    let result = bp.get_page(t2, p2, Permissions::ReadOnly);
    assert!(matches!(result, Err(DbError::CacheFull)));
    bp.transaction_complete(t2, false).unwrap();

    bp.transaction_complete(t1, true).unwrap();

    // After commit, the page is flushed and the pool has room again.
    let t3 = TxnId::new();
    assert!(bp.get_page(t3, p2, Permissions::ReadOnly).is_ok());
    assert_eq!(scan_values(&bp, table_id), vec![7]);
}
