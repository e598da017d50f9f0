//! The six comparators spec.md section 4.8 requires `IntHistogram` to
//! estimate selectivity for. Grounded in the teacher's `storage::tuple::Op`
//! (`Equals`, `GreaterThan`, `GreaterThanOrEq`, `LessThan`, `LessThanOrEq`,
//! `NotEquals`) -- `Like` is dropped, since it has no place in the spec's
//! comparator set and no SQL layer to drive it.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Op {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Op::Equals => "=",
            Op::NotEquals => "<>",
            Op::GreaterThan => ">",
            Op::GreaterThanOrEq => ">=",
            Op::LessThan => "<",
            Op::LessThanOrEq => "<=",
        };
        write!(f, "{}", s)
    }
}

impl Op {
    pub fn apply<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Op::Equals => lhs == rhs,
            Op::NotEquals => lhs != rhs,
            Op::GreaterThan => lhs > rhs,
            Op::GreaterThanOrEq => lhs >= rhs,
            Op::LessThan => lhs < rhs,
            Op::LessThanOrEq => lhs <= rhs,
        }
    }
}
