//! Independent checks of colorings and extensions.
//!
//! These use the exact clique oracle rather than the constraint machinery, so
//! they can vouch for search results.

use crate::clique::Clique;
use crate::graph::{low_bits, parse_color_matrix, Color, ColorMatrix, MatrixError};
use crate::oracle::CliqueOracle;
use rayon::prelude::*;
use thiserror::Error;

/// Largest base order [`brute_force_extension`] accepts.
pub const MAX_BRUTE_FORCE_ORDER: usize = 24;

/// Validation failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The coloring contains a forbidden clique.
    #[error("found a {color} clique of size {} at {members:?}", .members.len())]
    MonochromaticClique {
        /// Color of the clique.
        color: Color,
        /// Vertices of the clique.
        members: Vec<usize>,
    },
    /// Brute force was asked for too many rows.
    #[error("order {order} is too large for brute force (at most {max})")]
    TooLarge {
        /// Base order.
        order: usize,
        /// Supported maximum.
        max: usize,
    },
    /// A bundled matrix failed to parse.
    #[error("{name}: {source}")]
    Matrix {
        /// Bundled file name.
        name: &'static str,
        /// Parse error.
        #[source]
        source: MatrixError,
    },
}

// ============================================================================
// Colorings
// ============================================================================

/// Finds one monochromatic clique of size `k`, searching red then blue.
///
/// Start vertices are searched in parallel; the lowest one with a clique wins.
/// Returns `None` for `k < 2`.
pub fn find_monochromatic_clique(matrix: &ColorMatrix, k: usize) -> Option<Clique> {
    if k < 2 {
        return None;
    }
    let n = matrix.order();
    [Color::Red, Color::Blue].into_iter().find_map(|color| {
        let adj = matrix.adjacency(color);
        (0..n).into_par_iter().find_map_first(|v| {
            let mut oracle = CliqueOracle::new();
            let mut rest = Vec::with_capacity(k);
            let later = adj[v] & !low_bits(v + 1);
            oracle
                .find_clique_within(&adj, k - 1, later, &mut rest)
                .then(|| {
                    rest.push(v);
                    rest.sort_unstable();
                    Clique::new(rest, color)
                })
        })
    })
}

/// Checks that `matrix` has no monochromatic clique of size `k`.
///
/// # Errors
/// Returns the first clique found.
pub fn validate_coloring(matrix: &ColorMatrix, k: usize) -> Result<(), ValidationError> {
    match find_monochromatic_clique(matrix, k) {
        Some(clique) => Err(ValidationError::MonochromaticClique {
            color: clique.color(),
            members: clique.members().to_vec(),
        }),
        None => Ok(()),
    }
}

// ============================================================================
// Extensions
// ============================================================================

/// Returns `true` iff attaching a vertex with edge colors `row` to `base`
/// closes a monochromatic clique of size `k` through the new vertex.
pub fn closes_clique(base: &ColorMatrix, row: u64, k: usize) -> bool {
    ClassAdjacency::of(base).closes_clique(&mut CliqueOracle::new(), row, k)
}

/// Red and blue neighbor sets of a base graph.
struct ClassAdjacency {
    red: Vec<u64>,
    blue: Vec<u64>,
    mask: u64,
}

impl ClassAdjacency {
    fn of(base: &ColorMatrix) -> Self {
        Self {
            red: base.adjacency(Color::Red),
            blue: base.adjacency(Color::Blue),
            mask: low_bits(base.order()),
        }
    }

    /// The new vertex closes a clique iff its same-color neighbors hold a
    /// `(k-1)`-clique of that color.
    fn closes_clique(&self, oracle: &mut CliqueOracle, row: u64, k: usize) -> bool {
        if k < 2 {
            return k == 1;
        }
        oracle.has_clique_within(&self.red, k - 1, !row & self.mask)
            || oracle.has_clique_within(&self.blue, k - 1, row & self.mask)
    }
}

/// Smallest row whose vertex can join `base` without closing a
/// monochromatic `k`-clique, found by testing all `2^N` rows.
///
/// # Errors
/// Returns [`ValidationError::TooLarge`] above [`MAX_BRUTE_FORCE_ORDER`].
pub fn brute_force_extension(base: &ColorMatrix, k: usize) -> Result<Option<u64>, ValidationError> {
    let order = base.order();
    if order > MAX_BRUTE_FORCE_ORDER {
        return Err(ValidationError::TooLarge {
            order,
            max: MAX_BRUTE_FORCE_ORDER,
        });
    }
    let classes = ClassAdjacency::of(base);

    let found = (0..1u32 << order)
        .into_par_iter()
        .map_init(CliqueOracle::new, |oracle, row| {
            let row = u64::from(row);
            (row, classes.closes_clique(oracle, row, k))
        })
        .find_first(|&(_, closes)| !closes)
        .map(|(row, _)| row);
    Ok(found)
}

// ============================================================================
// Bundled colorings
// ============================================================================

const BUNDLED: [(&str, &str, usize); 4] = [
    ("pentagon_k3.txt", include_str!("../graphs/pentagon_k3.txt"), 3),
    ("paley13_k4.txt", include_str!("../graphs/paley13_k4.txt"), 4),
    ("paley16_k4.txt", include_str!("../graphs/paley16_k4.txt"), 4),
    ("paley17_k4.txt", include_str!("../graphs/paley17_k4.txt"), 4),
];

/// Validates the bundled colorings:
/// - the pentagon has no monochromatic triangle (`R(3,3) > 5`);
/// - Paley(13), Paley(17) minus a vertex and Paley(17) have no
///   monochromatic `K4` (`R(4,4) > 17`).
///
/// # Errors
/// Returns the first failure.
pub fn validate_bundled_colorings() -> Result<(), ValidationError> {
    for (name, text, k) in BUNDLED {
        let matrix =
            parse_color_matrix(text, None).map_err(|source| ValidationError::Matrix { name, source })?;
        validate_coloring(&matrix, k)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
