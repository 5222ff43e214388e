//! Lexicographic enumeration of `k`-subsets of `0..n` in constant extra space.
//!
//! A combination is stored as `k` strictly increasing indices followed by a
//! sentinel equal to `n`. Advancing moves the right-most index that still has
//! room before its successor, then packs every index to its right directly
//! behind it.

/// Advances `state` (length `k + 1`, last slot holding `n`) to the next
/// combination in lexicographic order.
///
/// Returns `false` and leaves `state` untouched once the last combination
/// `{n-k, ..., n-1}` has been reached.
#[inline]
pub fn next_combination(state: &mut [usize]) -> bool {
    debug_assert!(!state.is_empty(), "state must hold at least the sentinel");
    let k = state.len() - 1;

    for i in (0..k).rev() {
        if state[i] + 1 < state[i + 1] {
            state[i] += 1;
            for j in (i + 1)..k {
                state[j] = state[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Builds the first combination `{0, ..., k-1}` followed by the sentinel `n`.
///
/// Returns `None` if `k > n` (there are no `k`-subsets).
pub fn first_combination(n: usize, k: usize) -> Option<Vec<usize>> {
    if k > n {
        return None;
    }
    let mut state: Vec<usize> = (0..k).collect();
    state.push(n);
    Some(state)
}

/// Returns \(\binom{n}{k}\), saturating at `u64::MAX`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

/// Iterator over all `k`-subsets of `0..n` in lexicographic order.
///
/// Each item is a fresh `Vec`; hot paths should drive [`next_combination`]
/// directly on a reused buffer instead.
#[derive(Clone, Debug)]
pub struct Combinations {
    state: Option<Vec<usize>>,
    started: bool,
}

impl Combinations {
    /// Enumerates the `k`-subsets of `0..n`.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            state: first_combination(n, k),
            started: false,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.state.as_mut()?;
        if self.started {
            if !next_combination(state) {
                self.state = None;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(state[..state.len() - 1].to_vec())
    }
}

impl std::iter::FusedIterator for Combinations {}

// ============================================================================
// Tests
// ============================================================================
