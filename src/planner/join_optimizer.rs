//! Join order selection via dynamic programming over subsets (spec.md
//! section 4.9). No teacher or example file implements a join planner (see
//! DESIGN.md); this follows the standard Selinger-style "build every plan
//! for each subset from the best plans for its size-1-smaller subsets"
//! algorithm, subsets represented as bitmasks over the table list.

use crate::stats::table_stats::TableStats;
use std::collections::HashMap;

/// One candidate two-way join in a plan being assembled.
#[derive(Clone, Debug)]
pub struct JoinNode {
    pub left_table: i32,
    pub right_table: i32,
}

/// `cost = cost1 + card1 * cost2 + card1 * card2` (spec.md section 4.9):
/// the outer side is scanned once, the inner side once per outer tuple, and
/// the join itself touches every pair of matching tuples.
fn estimate_join_cost(cost1: f64, card1: usize, cost2: f64, card2: usize) -> f64 {
    cost1 + (card1 as f64) * cost2 + (card1 as f64) * (card2 as f64)
}

/// Cardinality heuristic: an equality join is assumed to produce
/// `max(card1, card2)` tuples (each row of the larger side finds, on
/// average, at most one match); any other join predicate is assumed to
/// produce `card1 * card2 / 2` (spec.md section 4.9).
fn estimate_join_cardinality(card1: usize, card2: usize, is_equality: bool) -> usize {
    if is_equality {
        card1.max(card2).max(1)
    } else {
        ((card1 * card2) / 2).max(1)
    }
}

#[derive(Clone)]
struct PlanCost {
    order: Vec<i32>,
    cost: f64,
    cardinality: usize,
}

/// Orders `tables` (each paired with its scan cost and cardinality) to
/// minimize estimated total join cost, via DP over subsets: `best[S]` is
/// derived from `best[S - {t}]` joined with `t`, for every `t` in `S`
/// (spec.md section 4.9).
///
/// `equality_join` reports whether the join condition between any two
/// tables is an equality predicate, driving the cardinality heuristic
/// above.
pub fn order_joins(
    tables: &[(i32, f64, usize)],
    equality_join: impl Fn(i32, i32) -> bool,
) -> Vec<i32> {
    let n = tables.len();
    if n <= 1 {
        return tables.iter().map(|&(id, _, _)| id).collect();
    }

    let mut best: HashMap<u32, PlanCost> = HashMap::new();
    for &(id, cost, card) in tables {
        let idx = tables.iter().position(|&(t, _, _)| t == id).unwrap();
        best.insert(
            1 << idx,
            PlanCost {
                order: vec![id],
                cost,
                cardinality: card,
            },
        );
    }

    for size in 2..=n {
        for subset in subsets_of_size(n, size) {
            let mut chosen: Option<PlanCost> = None;
            for bit in 0..n {
                if subset & (1 << bit) == 0 {
                    continue;
                }
                let without = subset & !(1 << bit);
                if without == 0 {
                    continue;
                }
                let prev = match best.get(&without) {
                    Some(p) => p,
                    None => continue,
                };
                let (table_id, scan_cost, card) = tables[bit];
                let is_eq = prev.order.iter().any(|&t| equality_join(t, table_id));
                let total_cost = estimate_join_cost(prev.cost, prev.cardinality, scan_cost, card);
                let total_card = estimate_join_cardinality(prev.cardinality, card, is_eq);
                if chosen.as_ref().map_or(true, |c| total_cost < c.cost) {
                    let mut order = prev.order.clone();
                    order.push(table_id);
                    chosen = Some(PlanCost {
                        order,
                        cost: total_cost,
                        cardinality: total_card,
                    });
                }
            }
            if let Some(plan) = chosen {
                best.insert(subset, plan);
            }
        }
    }

    let full = (1u32 << n) - 1;
    best.get(&full)
        .map(|p| p.order.clone())
        .unwrap_or_else(|| tables.iter().map(|&(id, _, _)| id).collect())
}

fn subsets_of_size(n: usize, size: usize) -> Vec<u32> {
    (0u32..(1 << n))
        .filter(|s| s.count_ones() as usize == size)
        .collect()
}

/// Convenience: derive `(table_id, scanCost, cardinality)` triples directly
/// from a batch of `TableStats`, applying `selectivity` uniformly (callers
/// with per-table selectivities should build the triples themselves).
pub fn scan_costs(stats: &[(i32, &TableStats)], selectivity: f64) -> Vec<(i32, f64, usize)> {
    stats
        .iter()
        .map(|(id, s)| (*id, s.estimate_scan_cost(), s.estimate_table_cardinality(selectivity)))
        .collect()
}
