//! Grouped and ungrouped aggregation (spec.md section 4.6). No teacher or
//! example file implements a query aggregator (see DESIGN.md); built fresh,
//! following the `HashMap<group key, running state>` shape the teacher uses
//! elsewhere (e.g. `concurrent_status::ConcurrentStatus::hold_pages`) for
//! per-key accumulation.

use crate::field::Field;
use std::collections::HashMap;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AggOp {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl fmt::Display for AggOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AggOp::Min => "min",
            AggOp::Max => "max",
            AggOp::Sum => "sum",
            AggOp::Avg => "avg",
            AggOp::Count => "count",
        };
        write!(f, "{}", s)
    }
}

/// Group key: `None` for an ungrouped aggregate, `Some(field)` otherwise.
type GroupKey = Option<Field>;

#[derive(Clone, Copy)]
struct IntAcc {
    min: i32,
    max: i32,
    sum: i64,
    count: i64,
}

impl IntAcc {
    fn new() -> IntAcc {
        IntAcc {
            min: i32::MAX,
            max: i32::MIN,
            sum: 0,
            count: 0,
        }
    }

    fn merge(&mut self, v: i32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.sum += v as i64;
        self.count += 1;
    }

    fn result(&self, op: AggOp) -> i64 {
        match op {
            AggOp::Min => self.min as i64,
            AggOp::Max => self.max as i64,
            AggOp::Sum => self.sum,
            AggOp::Avg => {
                if self.count == 0 {
                    0
                } else {
                    self.sum / self.count
                }
            }
            AggOp::Count => self.count,
        }
    }
}

/// Aggregates an INT field, optionally grouped by another field's value
/// (spec.md section 4.6: MIN, MAX, SUM, AVG, COUNT).
pub struct IntegerAggregator {
    op: AggOp,
    groups: HashMap<GroupKey, IntAcc>,
}

impl IntegerAggregator {
    pub fn new(op: AggOp) -> IntegerAggregator {
        IntegerAggregator {
            op,
            groups: HashMap::new(),
        }
    }

    pub fn merge(&mut self, group: GroupKey, value: i32) {
        self.groups.entry(group).or_insert_with(IntAcc::new).merge(value);
    }

    /// `(group key, aggregate result)` pairs. Unordered -- callers that need
    /// a deterministic order should sort the result themselves.
    pub fn results(&self) -> Vec<(GroupKey, i64)> {
        self.groups.iter().map(|(k, acc)| (k.clone(), acc.result(self.op))).collect()
    }
}

/// Aggregates a STRING field. Only `COUNT` is meaningful over strings
/// (spec.md section 4.6); any other `AggOp` is rejected at construction.
pub struct StringAggregator {
    groups: HashMap<GroupKey, i64>,
}

impl StringAggregator {
    pub fn new(op: AggOp) -> StringAggregator {
        assert_eq!(op, AggOp::Count, "string fields support only COUNT");
        StringAggregator {
            groups: HashMap::new(),
        }
    }

    pub fn merge(&mut self, group: GroupKey, _value: &str) {
        *self.groups.entry(group).or_insert(0) += 1;
    }

    pub fn results(&self) -> Vec<(GroupKey, i64)> {
        self.groups.iter().map(|(k, &c)| (k.clone(), c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungrouped_sum_and_avg() {
        let mut sum = IntegerAggregator::new(AggOp::Sum);
        let mut avg = IntegerAggregator::new(AggOp::Avg);
        for v in [1, 2, 3, 4] {
            sum.merge(None, v);
            avg.merge(None, v);
        }
        assert_eq!(sum.results(), vec![(None, 10)]);
        assert_eq!(avg.results(), vec![(None, 2)]);
    }

    #[test]
    fn grouped_min_max_count() {
        let mut min = IntegerAggregator::new(AggOp::Min);
        let mut max = IntegerAggregator::new(AggOp::Max);
        let mut count = IntegerAggregator::new(AggOp::Count);
        let data = [("a", 5), ("a", 1), ("b", 9), ("b", 2)];
        for (g, v) in data {
            let key = Some(Field::String(g.to_string()));
            min.merge(key.clone(), v);
            max.merge(key.clone(), v);
            count.merge(key, v);
        }
        let mut min_results = min.results();
        min_results.sort_by_key(|(k, _)| format!("{:?}", k));
        assert_eq!(
            min_results,
            vec![
                (Some(Field::String("a".into())), 1),
                (Some(Field::String("b".into())), 2),
            ]
        );
        let mut count_results = count.results();
        count_results.sort_by_key(|(k, _)| format!("{:?}", k));
        assert_eq!(
            count_results,
            vec![
                (Some(Field::String("a".into())), 2),
                (Some(Field::String("b".into())), 2),
            ]
        );
        let _ = max;
    }

    #[test]
    #[should_panic(expected = "string fields support only COUNT")]
    fn string_aggregator_rejects_non_count() {
        StringAggregator::new(AggOp::Sum);
    }
}
