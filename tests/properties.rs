use proptest::prelude::*;
use ramsey_extend::combination::{binomial, Combinations};
use ramsey_extend::config::ExtendConfig;
use ramsey_extend::constraint::{Constraint, FilterOrder};
use ramsey_extend::filter::{filter, FilterOutcome};
use ramsey_extend::graph::{Color, ColorMatrix};
use ramsey_extend::search::{run_extension_search, SearchOutcome};
use ramsey_extend::universe::PermutationUniverse;
use ramsey_extend::validate::{brute_force_extension, closes_clique};
use std::collections::BTreeSet;

fn color_strategy() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::Red), Just(Color::Blue)]
}

/// Random coloring of `K_n` for `n` in `range`.
fn matrix_strategy(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = ColorMatrix> {
    range.prop_flat_map(|n| {
        proptest::collection::vec(any::<bool>(), n * (n - 1) / 2).prop_map(move |edges| {
            let mut m = ColorMatrix::new(n).unwrap();
            let mut e = edges.into_iter();
            for i in 0..n {
                for j in (i + 1)..n {
                    let color = if e.next().unwrap_or(false) { Color::Blue } else { Color::Red };
                    m.set_color(i, j, color);
                }
            }
            m
        })
    })
}

proptest! {
    #[test]
    fn combinations_count_matches_binomial(n in 0usize..16, k in 0usize..18) {
        let all: Vec<Vec<usize>> = Combinations::new(n, k).collect();
        prop_assert_eq!(all.len() as u64, binomial(n, k));
        let distinct: BTreeSet<&Vec<usize>> = all.iter().collect();
        prop_assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn filter_removes_exactly_the_completing_rows(
        width in 2u32..10,
        raw_mask in 1u64..1024,
        color in color_strategy(),
    ) {
        let mask = raw_mask & ((1u64 << width) - 1);
        prop_assume!(mask != 0);
        let constraint = Constraint::new(mask, color);

        let mut universe = PermutationUniverse::new(width).unwrap();
        let outcome = filter(&mut universe, &constraint);

        let want = color.bit();
        let expected: Vec<u32> = (0..1u32 << width)
            .filter(|&v| {
                let v = u64::from(v);
                (0..64).any(|i| mask >> i & 1 == 1 && (v >> i) & 1 != want)
            })
            .collect();
        let removed = (1usize << width) - expected.len();
        prop_assert_eq!(outcome, FilterOutcome::Applied { removed });
        prop_assert_eq!(universe.iter().collect::<Vec<_>>(), expected);

        prop_assert_eq!(filter(&mut universe, &constraint), FilterOutcome::Applied { removed: 0 });
    }

    #[test]
    fn regroup_never_changes_membership(
        width in 1u32..12,
        drops in proptest::collection::vec(any::<u32>(), 0..6),
    ) {
        let mut universe = PermutationUniverse::new(width).unwrap();
        for d in drops {
            let d = d & ((1u32 << width) - 1);
            universe.remove_where(|v| v % (d + 2) == 1);
            let before: Vec<u32> = universe.iter().collect();
            universe.regroup();
            prop_assert_eq!(universe.iter().collect::<Vec<_>>(), before);
            prop_assert_eq!(universe.slots(), universe.len());
        }
    }

    #[test]
    fn engine_agrees_with_brute_force(
        base in matrix_strategy(3..=7),
        k in 3usize..=4,
        width in 0u32..=8,
        batches in 1usize..=4,
        least_overlap in any::<bool>(),
    ) {
        let config = ExtendConfig {
            clique_size: k,
            filter_width: width,
            filter_batches: batches,
            filter_order: if least_overlap { FilterOrder::LeastOverlapFirst } else { FilterOrder::AsFound },
            ..ExtendConfig::default()
        };
        let report = run_extension_search(&base, &config).unwrap();
        let expected = brute_force_extension(&base, k).unwrap();

        match (&report.outcome, expected) {
            (SearchOutcome::Found(ext), Some(row)) => {
                prop_assert_eq!(ext.row, row);
                prop_assert!(!closes_clique(&base, ext.row, k));
                for i in 0..base.order() {
                    prop_assert_eq!(ext.matrix.color(base.order(), i), ext.matrix.color(i, base.order()));
                }
            }
            (SearchOutcome::Exhausted, None) => {}
            (outcome, expected) => {
                prop_assert!(false, "engine said {:?}, brute force said {:?}", outcome, expected);
            }
        }
    }
}
