//! # Ramsey Extension Search
//!
//! Exhaustive search for a one-vertex extension of a two-colored complete
//! graph that avoids monochromatic \(K\)-cliques.
//!
//! Given a red/blue coloring of \(K_N\) with no monochromatic \(K_K\), the
//! engine looks for a color assignment of the \(N\) edges from a new vertex
//! that keeps the \((N+1)\)-vertex coloring free of monochromatic \(K_K\), or
//! proves none exists.
//!
//! This crate provides:
//! - A compact row-bitset color matrix with parsing and dumping.
//! - A lexicographic enumeration of monochromatic \((K-1)\)-cliques, each turned
//!   into a `(mask, color)` constraint on the new vertex's row.
//! - An index-linked **candidate universe** of low-order rows that is pruned by
//!   the constraints, compacted in batches, then frozen.
//! - A deterministic driver that enumerates the remaining high-order bits and
//!   reports the numerically smallest valid row.
//! - An exact clique oracle and a parallel brute-force reference for checking
//!   results.
//!
//! ## Quick Start
//!
//! ```
//! use ramsey_extend::prelude::*;
//!
//! // A blue path 0-1-2-3 with red chords: the pentagon minus one vertex.
//! let base = parse_color_matrix("0100\n1010\n0101\n0010\n", None).unwrap();
//! let config = ExtendConfig {
//!     clique_size: 3,
//!     ..ExtendConfig::default()
//! };
//!
//! let report = run_extension_search(&base, &config).unwrap();
//! let ext = report.outcome.extension().expect("the pentagon closes the path");
//! assert_eq!(ext.row, 0b1001);
//! assert!(validate_coloring(&ext.matrix, 3).is_ok());
//! ```
//!
//! ## Proving Exhaustion
//!
//! ```
//! use ramsey_extend::prelude::*;
//!
//! // R(3,3) = 6: the pentagon cannot grow.
//! let base = parse_color_matrix("01001\n10100\n01010\n00101\n10010\n", None).unwrap();
//! let config = ExtendConfig {
//!     clique_size: 3,
//!     ..ExtendConfig::default()
//! };
//!
//! let report = run_extension_search(&base, &config).unwrap();
//! assert_eq!(report.outcome, SearchOutcome::Exhausted);
//! assert_eq!(brute_force_extension(&base, 3).unwrap(), None);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Color matrix, parsing and dumping.
//! - [`combination`]: Lexicographic \(k\)-combinations.
//! - [`clique`]: Monochromatic clique enumeration.
//! - [`constraint`]: Per-clique constraints on the new row.
//! - [`universe`]: Index-linked candidate universe with in-place regrouping.
//! - [`filter`]: Batched constraint filtering of the universe.
//! - [`search`]: The extension search driver.
//! - [`config`]: Runtime search parameters.
//! - [`oracle`]: Exact clique oracle with greedy-coloring bounds.
//! - [`validate`]: Independent verification and brute force.
//!
//! ## Performance Notes
//!
//! - Rows are `u64` bitsets, limiting base graphs to 63 vertices.
//! - The universe holds `2^B` candidates as three `u32` arrays; `B = 24`
//!   costs about 200 MB before filtering.
//! - Constraints touching a vertex at or above `B` are only checked during
//!   enumeration, so a larger `B` moves work out of the hot loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)]

pub mod clique;
pub mod combination;
pub mod config;
pub mod constraint;
pub mod filter;
pub mod graph;
pub mod oracle;
pub mod search;
pub mod universe;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::clique::{find_monochromatic_cliques, Clique, MonochromaticCliques};
    pub use crate::config::{ConfigError, ExtendConfig};
    pub use crate::constraint::{Constraint, ConstraintSet, FilterOrder};
    pub use crate::filter::{filter, FilterReport, PermutationFilter};
    pub use crate::graph::{parse_color_matrix, Color, ColorMatrix, MatrixError};
    pub use crate::oracle::CliqueOracle;
    pub use crate::search::{
        run_extension_search, Extension, SearchError, SearchOutcome, SearchReport, SearchStats,
    };
    pub use crate::universe::{FrozenUniverse, PermutationUniverse};
    pub use crate::validate::{brute_force_extension, validate_coloring, ValidationError};
}
