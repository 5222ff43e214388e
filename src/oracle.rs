//! Exact clique detection in one color class (currently \(N \le 64\)).
//!
//! Branch and bound over row bitsets. A greedy coloring of the candidate set
//! gives the usual Tomita-style upper bound: a vertex colored `c` can extend
//! the current clique by at most `c` vertices.

use crate::graph::{bit, low_bits, MAX_ORDER};

// ============================================================================
// CliqueOracle
// ============================================================================

/// Exact oracle for clique existence queries on bitset adjacency.
///
/// `adj[v]` is the neighbor set of `v` and must not contain `v` itself.
/// The oracle keeps its scratch stack between queries.
#[derive(Clone, Debug, Default)]
pub struct CliqueOracle {
    stack: Vec<usize>,
}

impl CliqueOracle {
    /// Creates a new oracle.
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(MAX_ORDER),
        }
    }

    /// Returns `true` iff the graph contains a clique of size `k`.
    #[inline]
    pub fn has_clique_of_size(&mut self, adj: &[u64], k: usize) -> bool {
        self.has_clique_within(adj, k, low_bits(adj.len()))
    }

    /// Returns `true` iff the vertices in `candidates` contain a clique of size `k`.
    pub fn has_clique_within(&mut self, adj: &[u64], k: usize, candidates: u64) -> bool {
        if k == 0 {
            return true;
        }
        self.stack.clear();
        self.search(adj, k, 0, candidates & low_bits(adj.len()))
    }

    /// Writes one clique of size `k` to `out` if it exists.
    pub fn find_clique_of_size(&mut self, adj: &[u64], k: usize, out: &mut Vec<usize>) -> bool {
        self.find_clique_within(adj, k, low_bits(adj.len()), out)
    }

    /// Writes one clique of size `k` inside `candidates` to `out` if it exists.
    ///
    /// Members are written in discovery order.
    pub fn find_clique_within(
        &mut self,
        adj: &[u64],
        k: usize,
        candidates: u64,
        out: &mut Vec<usize>,
    ) -> bool {
        out.clear();
        if k == 0 {
            return true;
        }
        self.stack.clear();
        if self.search(adj, k, 0, candidates & low_bits(adj.len())) {
            out.extend_from_slice(&self.stack);
            true
        } else {
            false
        }
    }

    /// Returns the clique number ω(G).
    pub fn clique_number(&mut self, adj: &[u64]) -> usize {
        self.stack.clear();
        self.max_clique_size(adj, 0, low_bits(adj.len()))
    }

    /// On success the clique is left on the stack.
    fn search(&mut self, adj: &[u64], k: usize, size: usize, mut candidates: u64) -> bool {
        if size >= k {
            return true;
        }
        if size + (candidates.count_ones() as usize) < k {
            return false;
        }

        let mut order = [0usize; MAX_ORDER];
        let mut colors = [0u8; MAX_ORDER];
        let len = color_sort(adj, candidates, &mut order, &mut colors);

        for idx in (0..len).rev() {
            if size + (colors[idx] as usize) < k {
                return false;
            }
            let v = order[idx];
            self.stack.push(v);
            if self.search(adj, k, size + 1, candidates & adj[v]) {
                return true;
            }
            self.stack.pop();
            candidates &= !bit(v);
        }
        false
    }

    fn max_clique_size(&mut self, adj: &[u64], size: usize, mut candidates: u64) -> usize {
        if candidates == 0 {
            return size;
        }

        let mut order = [0usize; MAX_ORDER];
        let mut colors = [0u8; MAX_ORDER];
        let len = color_sort(adj, candidates, &mut order, &mut colors);

        let mut best = size;
        for idx in (0..len).rev() {
            if size + (colors[idx] as usize) <= best {
                break;
            }
            let v = order[idx];
            self.stack.push(v);
            best = best.max(self.max_clique_size(adj, size + 1, candidates & adj[v]));
            self.stack.pop();
            candidates &= !bit(v);
        }
        best
    }
}

// ============================================================================
// Greedy coloring bound
// ============================================================================

/// Greedily colors `candidates` into independent classes.
///
/// Vertices are written to `order` by increasing color; returns how many.
#[inline]
fn color_sort(
    adj: &[u64],
    mut candidates: u64,
    order: &mut [usize; MAX_ORDER],
    colors: &mut [u8; MAX_ORDER],
) -> usize {
    let mut len = 0usize;
    let mut color: u8 = 0;

    while candidates != 0 {
        color += 1;
        let mut available = candidates;
        while available != 0 {
            let v = available.trailing_zeros() as usize;
            order[len] = v;
            colors[len] = color;
            len += 1;
            candidates &= !bit(v);
            available &= !bit(v) & !adj[v];
        }
    }
    len
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn random_graph(rng: &mut XorShiftRng, n: usize, p: f64) -> Vec<u64> {
        let mut adj = vec![0u64; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(p) {
                    adj[i] |= bit(j);
                    adj[j] |= bit(i);
                }
            }
        }
        adj
    }

    fn is_clique(adj: &[u64], subset: u64) -> bool {
        let mut t = subset;
        while t != 0 {
            let v = t.trailing_zeros() as usize;
            t &= t - 1;
            if adj[v] & subset != subset & !bit(v) {
                return false;
            }
        }
        true
    }

    fn brute_omega(adj: &[u64]) -> usize {
        (0..1u64 << adj.len())
            .filter(|&s| is_clique(adj, s))
            .map(|s| s.count_ones() as usize)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn oracle_matches_bruteforce_small_graphs() {
        let mut rng = XorShiftRng::seed_from_u64(0xDEAD_BEEF);
        let mut oracle = CliqueOracle::new();
        let mut witness = Vec::new();

        for case in 0..40 {
            let n = rng.random_range(1..=13);
            let adj = random_graph(&mut rng, n, 0.55);
            let omega = brute_omega(&adj);
            assert_eq!(oracle.clique_number(&adj), omega, "case {case}");

            for k in 0..=n + 1 {
                let got = oracle.find_clique_of_size(&adj, k, &mut witness);
                assert_eq!(got, omega >= k, "case {case} k={k} omega={omega}");
                assert_eq!(oracle.has_clique_of_size(&adj, k), got);
                if got {
                    assert_eq!(witness.len(), k);
                    let mask = witness.iter().fold(0u64, |m, &v| m | bit(v));
                    assert!(is_clique(&adj, mask));
                }
            }
        }
    }

    #[test]
    fn restricted_search_respects_candidates() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut oracle = CliqueOracle::new();
        let mut witness = Vec::new();

        for _ in 0..30 {
            let adj = random_graph(&mut rng, 10, 0.6);
            let candidates: u64 = rng.random_range(0..1 << 10);
            let restricted: Vec<u64> = (0..10)
                .map(|v| if candidates & bit(v) != 0 { adj[v] & candidates } else { 0 })
                .collect();
            let omega = (0..1u64 << 10)
                .filter(|&s| s & !candidates == 0 && is_clique(&restricted, s))
                .map(|s| s.count_ones() as usize)
                .max()
                .unwrap_or(0);

            for k in 1..=6 {
                let got = oracle.find_clique_within(&adj, k, candidates, &mut witness);
                assert_eq!(got, omega >= k);
                assert!(witness.iter().all(|&v| candidates & bit(v) != 0));
            }
        }
    }

    #[test]
    fn size_bounds_prune_without_false_negatives() {
        let mut oracle = CliqueOracle::new();
        // Two disjoint triangles: three candidates can still hold a triangle,
        // two cannot, and the coloring bound stops at three.
        let adj: Vec<u64> = vec![0b000_110, 0b000_101, 0b000_011, 0b110_000, 0b101_000, 0b011_000];
        assert!(oracle.has_clique_within(&adj, 3, 0b000_111));
        assert!(!oracle.has_clique_within(&adj, 3, 0b000_011));
        assert!(!oracle.has_clique_within(&adj, 3, 0b011_011));
        assert!(!oracle.has_clique_of_size(&adj, 4));
        assert_eq!(oracle.clique_number(&adj), 3);
    }

    #[test]
    fn complete_and_empty_graphs() {
        let mut oracle = CliqueOracle::new();
        let complete: Vec<u64> = (0..8).map(|v| low_bits(8) & !bit(v)).collect();
        assert_eq!(oracle.clique_number(&complete), 8);
        assert!(oracle.has_clique_of_size(&complete, 8));
        assert!(!oracle.has_clique_of_size(&complete, 9));

        let empty = vec![0u64; 8];
        assert_eq!(oracle.clique_number(&empty), 1);
        assert!(!oracle.has_clique_of_size(&empty, 2));
        assert_eq!(oracle.clique_number(&[]), 0);
    }
}
