//! Equi-width integer histogram for selectivity estimation (spec.md section
//! 4.9). Bucket counts are kept in a `Fenwick` tree so that a `BETWEEN`-style
//! query spanning many buckets sums them in `O(log n)` instead of a linear
//! scan. Like `Fenwick` itself, this has no grounding in the corpus -- see
//! DESIGN.md -- and follows the standard equi-width/interpolated-selectivity
//! algorithm used by textbook query optimizers.

use crate::histogram::fenwick::Fenwick;
use crate::predicate::Op;

pub struct IntHistogram {
    min: i32,
    max: i32,
    num_buckets: usize,
    bucket_width: f64,
    buckets: Fenwick,
    ntuples: i64,
}

impl IntHistogram {
    pub fn new(buckets: usize, min: i32, max: i32) -> IntHistogram {
        assert!(max >= min, "histogram range must be non-empty");
        let span = (max as i64 - min as i64 + 1) as usize;
        let num_buckets = buckets.min(span).max(1);
        let bucket_width = span as f64 / num_buckets as f64;
        IntHistogram {
            min,
            max,
            num_buckets,
            bucket_width,
            buckets: Fenwick::new(num_buckets),
            ntuples: 0,
        }
    }

    fn bucket_index(&self, v: i32) -> usize {
        let v = v.clamp(self.min, self.max) as i64;
        let idx = ((v - self.min as i64) as f64 / self.bucket_width) as usize;
        idx.min(self.num_buckets - 1)
    }

    fn bucket_right_edge(&self, idx: usize) -> f64 {
        self.min as f64 + (idx as f64 + 1.0) * self.bucket_width
    }

    pub fn add_value(&mut self, v: i32) {
        let idx = self.bucket_index(v);
        self.buckets.add(idx, 1);
        self.ntuples += 1;
    }

    fn selectivity_equals(&self, v: i32) -> f64 {
        if self.ntuples == 0 || v < self.min || v > self.max {
            return 0.0;
        }
        let idx = self.bucket_index(v);
        let count = self.buckets.range_sum(idx, idx) as f64;
        let width = self.bucket_width.max(1.0);
        (count / width) / self.ntuples as f64
    }

    fn selectivity_greater_than(&self, v: i32) -> f64 {
        if self.ntuples == 0 {
            return 0.0;
        }
        if v < self.min {
            return 1.0;
        }
        if v >= self.max {
            return 0.0;
        }
        let idx = self.bucket_index(v);
        let width = self.bucket_width.max(1.0);
        let b_count = self.buckets.range_sum(idx, idx) as f64;
        let right_edge = self.bucket_right_edge(idx);
        let b_part = ((right_edge - v as f64) / width).max(0.0);
        let beyond = if idx + 1 < self.num_buckets {
            self.buckets.range_sum(idx + 1, self.num_buckets - 1) as f64
        } else {
            0.0
        };
        ((b_count * b_part) + beyond) / self.ntuples as f64
    }

    /// Estimated fraction of tuples satisfying `field <op> v` (spec.md
    /// section 4.9). Always in `[0.0, 1.0]`.
    pub fn estimate_selectivity(&self, op: Op, v: i32) -> f64 {
        let raw = match op {
            Op::Equals => self.selectivity_equals(v),
            Op::NotEquals => 1.0 - self.selectivity_equals(v),
            Op::GreaterThan => self.selectivity_greater_than(v),
            Op::GreaterThanOrEq => self.selectivity_greater_than(v.saturating_sub(1)),
            Op::LessThan => 1.0 - self.selectivity_greater_than(v.saturating_sub(1)),
            Op::LessThanOrEq => 1.0 - self.selectivity_greater_than(v),
        };
        raw.clamp(0.0, 1.0)
    }

    pub fn ntuples(&self) -> i64 {
        self.ntuples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_added_value_lands_in_some_bucket() {
        let mut h = IntHistogram::new(10, 0, 99);
        for v in 0..100 {
            h.add_value(v);
        }
        assert_eq!(h.ntuples(), 100);
        assert_eq!(h.buckets.total(), 100);
    }

    #[test]
    fn equals_selectivity_matches_uniform_distribution() {
        let mut h = IntHistogram::new(10, 0, 99);
        for v in 0..100 {
            h.add_value(v);
        }
        let sel = h.estimate_selectivity(Op::Equals, 42);
        assert!((sel - 0.01).abs() < 1e-6);
    }

    #[test]
    fn greater_than_selectivity_is_monotonically_decreasing() {
        let mut h = IntHistogram::new(10, 0, 99);
        for v in 0..100 {
            h.add_value(v);
        }
        let mut prev = 1.1;
        for v in (-10..110).step_by(7) {
            let sel = h.estimate_selectivity(Op::GreaterThan, v);
            assert!(sel <= prev + 1e-9);
            prev = sel;
        }
    }

    #[test]
    fn equals_and_not_equals_are_complementary() {
        let mut h = IntHistogram::new(5, 0, 19);
        for v in 0..20 {
            h.add_value(v);
        }
        for v in 0..20 {
            let eq = h.estimate_selectivity(Op::Equals, v);
            let ne = h.estimate_selectivity(Op::NotEquals, v);
            assert!((eq + ne - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn out_of_range_equals_is_zero() {
        let mut h = IntHistogram::new(10, 0, 9);
        h.add_value(5);
        assert_eq!(h.estimate_selectivity(Op::Equals, 1000), 0.0);
        assert_eq!(h.estimate_selectivity(Op::GreaterThan, -1000), 1.0);
        assert_eq!(h.estimate_selectivity(Op::GreaterThan, 1000), 0.0);
    }
}
