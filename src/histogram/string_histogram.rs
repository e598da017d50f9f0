//! String histogram, delegating entirely to `IntHistogram` over a
//! monotonic string-to-integer mapping (spec.md section 4.9 / section 9
//! Open Question on string ordering -- resolved in SPEC_FULL.md by reusing
//! `Field::string_to_int_key`, which already exists for `Field`'s own
//! `PartialOrd`).

use crate::field::Field;
use crate::histogram::int_histogram::IntHistogram;
use crate::predicate::Op;

pub struct StringHistogram {
    inner: IntHistogram,
}

impl StringHistogram {
    pub fn new(buckets: usize) -> StringHistogram {
        StringHistogram {
            inner: IntHistogram::new(buckets, i32::MIN, i32::MAX),
        }
    }

    pub fn add_value(&mut self, s: &str) {
        self.inner.add_value(Field::string_to_int_key(s));
    }

    pub fn estimate_selectivity(&self, op: Op, s: &str) -> f64 {
        self.inner.estimate_selectivity(op, Field::string_to_int_key(s))
    }

    pub fn ntuples(&self) -> i64 {
        self.inner.ntuples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order_is_preserved_by_the_key_mapping() {
        let mut h = StringHistogram::new(10);
        for s in ["apple", "banana", "cherry", "date", "fig"] {
            h.add_value(s);
        }
        let sel_low = h.estimate_selectivity(Op::LessThan, "cherry");
        let sel_high = h.estimate_selectivity(Op::GreaterThan, "cherry");
        assert!(sel_low > 0.0);
        assert!(sel_high > 0.0);
        assert!((h.estimate_selectivity(Op::Equals, "cherry")
            + sel_low
            + sel_high
            - 1.0)
            .abs()
            < 0.2);
    }
}
