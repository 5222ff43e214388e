//! Pruning the candidate universe with clique constraints.

use crate::config::ExtendConfig;
use crate::constraint::{Constraint, ConstraintSet, FilterOrder};
use crate::universe::PermutationUniverse;
use serde::Serialize;
use tracing::debug;

/// Result of applying one constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The constraint has a member at or above the universe width and was left
    /// to full verification.
    Skipped,
    /// The constraint was applied.
    Applied {
        /// Candidates removed by this pass.
        removed: usize,
    },
}

/// Removes every candidate that colors all of `constraint`'s members with its
/// forbidden color.
pub fn filter(universe: &mut PermutationUniverse, constraint: &Constraint) -> FilterOutcome {
    if !constraint.is_filterable(universe.width()) {
        return FilterOutcome::Skipped;
    }
    let removed = universe.remove_where(|v| constraint.completes_clique(u64::from(v)));
    FilterOutcome::Applied { removed }
}

/// Summary of a full filtering run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterReport {
    /// Universe size before filtering.
    pub initial: usize,
    /// Universe size after filtering.
    pub surviving: usize,
    /// Constraints applied to the universe.
    pub applied: usize,
    /// Constraints deferred to full verification.
    pub skipped: usize,
    /// Regroup passes performed.
    pub regroups: usize,
}

impl FilterReport {
    /// Candidates removed in total.
    pub fn removed(&self) -> usize {
        self.initial - self.surviving
    }

    /// Share of the universe removed, in percent.
    pub fn pruned_percent(&self) -> f64 {
        if self.initial == 0 {
            return 0.0;
        }
        100.0 * self.removed() as f64 / self.initial as f64
    }
}

/// Applies a [`ConstraintSet`] to a universe in batches, regrouping after each.
#[derive(Clone, Copy, Debug)]
pub struct PermutationFilter {
    batches: usize,
    order: FilterOrder,
}

impl PermutationFilter {
    /// Creates a filter that splits the work into `batches` passes.
    pub fn new(batches: usize, order: FilterOrder) -> Self {
        Self {
            batches: batches.max(1),
            order,
        }
    }

    /// Creates a filter from the batch count and ordering in `config`.
    pub fn from_config(config: &ExtendConfig) -> Self {
        Self::new(config.filter_batches, config.filter_order)
    }

    /// Applies every filterable constraint of `constraints` to `universe`.
    pub fn run(
        &self,
        universe: &mut PermutationUniverse,
        constraints: &ConstraintSet,
    ) -> FilterReport {
        let mut report = FilterReport {
            initial: universe.len(),
            ..FilterReport::default()
        };

        let ordered = constraints.ordered_for_filtering(self.order);
        report.skipped = constraints.len() - ordered.len();
        let batch_len = ordered.len().div_ceil(self.batches).max(1);

        for (batch, chunk) in ordered.chunks(batch_len).enumerate() {
            for constraint in chunk {
                match filter(universe, constraint) {
                    FilterOutcome::Applied { .. } => report.applied += 1,
                    FilterOutcome::Skipped => report.skipped += 1,
                }
            }
            universe.regroup();
            report.regroups += 1;
            debug!(batch, remaining = universe.len(), "filter batch done");
            if universe.is_empty() {
                break;
            }
        }

        report.surviving = universe.len();
        report
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::Clique;
    use crate::graph::Color;

    #[test]
    fn filter_removes_exactly_matching_pairs() {
        for color in [Color::Red, Color::Blue] {
            let mut u = PermutationUniverse::new(5).unwrap();
            let c = Constraint::new((1 << 1) | (1 << 3), color);
            let outcome = filter(&mut u, &c);

            let want = color.bit();
            let expected: Vec<u32> = (0..32u32)
                .filter(|v| !(u64::from(v >> 1) & 1 == want && u64::from(v >> 3) & 1 == want))
                .collect();
            assert_eq!(outcome, FilterOutcome::Applied { removed: 8 });
            assert_eq!(u.iter().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn filter_is_idempotent() {
        let mut u = PermutationUniverse::new(6).unwrap();
        let c = Constraint::new(0b10_0101, Color::Blue);
        assert_eq!(filter(&mut u, &c), FilterOutcome::Applied { removed: 8 });
        assert_eq!(filter(&mut u, &c), FilterOutcome::Applied { removed: 0 });
        assert_eq!(u.len(), 56);
    }

    #[test]
    fn filter_skips_constraints_beyond_width() {
        let mut u = PermutationUniverse::new(4).unwrap();
        let c = Constraint::new((1 << 2) | (1 << 4), Color::Red);
        assert_eq!(filter(&mut u, &c), FilterOutcome::Skipped);
        assert_eq!(u.len(), 16);
    }

    #[test]
    fn batching_and_order_do_not_change_survivors() {
        let cliques = vec![
            Clique::new(vec![0, 1, 2], Color::Red),
            Clique::new(vec![1, 2, 5], Color::Blue),
            Clique::new(vec![3, 4, 6], Color::Red),
            Clique::new(vec![0, 6, 7], Color::Blue),
            Clique::new(vec![2, 5, 9], Color::Red),
        ];
        let set = ConstraintSet::from_cliques(&cliques, 8);

        let mut reference: Option<Vec<u32>> = None;
        for batches in [1, 2, 3, 10] {
            for order in [FilterOrder::AsFound, FilterOrder::LeastOverlapFirst] {
                let mut u = PermutationUniverse::new(8).unwrap();
                let report = PermutationFilter::new(batches, order).run(&mut u, &set);
                assert_eq!(report.applied, 4);
                assert_eq!(report.skipped, 1);
                assert_eq!(report.initial, 256);
                assert_eq!(report.surviving, u.len());

                let survivors: Vec<u32> = u.iter().collect();
                assert!(survivors
                    .iter()
                    .all(|&v| set.filterable().all(|c| !c.completes_clique(u64::from(v)))));
                match &reference {
                    None => reference = Some(survivors),
                    Some(r) => assert_eq!(r, &survivors),
                }
            }
        }
    }

    #[test]
    fn report_percentages() {
        let report = FilterReport {
            initial: 200,
            surviving: 50,
            ..FilterReport::default()
        };
        assert_eq!(report.removed(), 150);
        assert!((report.pruned_percent() - 75.0).abs() < 1e-9);
        assert_eq!(FilterReport::default().pruned_percent(), 0.0);
    }

    #[test]
    fn empty_constraint_set_leaves_universe_intact() {
        let mut u = PermutationUniverse::new(3).unwrap();
        let report = PermutationFilter::new(4, FilterOrder::AsFound).run(&mut u, &ConstraintSet::default());
        assert_eq!(report.surviving, 8);
        assert_eq!(report.applied, 0);
        assert_eq!(report.regroups, 0);
    }
}
