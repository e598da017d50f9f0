//! Binary indexed tree supporting O(log n) point updates and prefix sums
//! (spec.md section 4.9). Not present anywhere in the corpus -- no teacher
//! or example file implements a Fenwick tree -- so this is written from the
//! textbook algorithm rather than adapted from an existing file; see
//! DESIGN.md.

pub struct Fenwick {
    tree: Vec<i64>,
}

impl Fenwick {
    pub fn new(len: usize) -> Fenwick {
        Fenwick { tree: vec![0; len + 1] }
    }

    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    /// Add `delta` at 0-based index `i`.
    pub fn add(&mut self, i: usize, delta: i64) {
        let mut idx = i + 1;
        while idx < self.tree.len() {
            self.tree[idx] += delta;
            idx += idx & idx.wrapping_neg();
        }
    }

    /// Sum of indices `[0, i]` inclusive, 0-based.
    pub fn prefix_sum(&self, i: usize) -> i64 {
        if self.tree.len() <= 1 {
            return 0;
        }
        let mut idx = (i + 1).min(self.tree.len() - 1);
        let mut sum = 0;
        while idx > 0 {
            sum += self.tree[idx];
            idx &= idx - 1;
        }
        sum
    }

    /// Sum over `[lo, hi]` inclusive, 0-based.
    pub fn range_sum(&self, lo: usize, hi: usize) -> i64 {
        if hi < lo {
            return 0;
        }
        let upper = self.prefix_sum(hi);
        let lower = if lo == 0 { 0 } else { self.prefix_sum(lo - 1) };
        upper - lower
    }

    pub fn total(&self) -> i64 {
        if self.len() == 0 {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn matches_naive_prefix_sums_under_random_updates() {
        let n = 200;
        let mut naive = vec![0i64; n];
        let mut fw = Fenwick::new(n);
        let mut rng = rand::thread_rng();

        for _ in 0..10_000 {
            let i = rng.gen_range(0, n);
            let delta = rng.gen_range(-5, 6);
            naive[i] += delta;
            fw.add(i, delta);

            let lo = rng.gen_range(0, n);
            let hi = rng.gen_range(lo, n);
            let expected: i64 = naive[lo..=hi].iter().sum();
            assert_eq!(fw.range_sum(lo, hi), expected);
        }
    }
}
