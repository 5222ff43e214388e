//! Two-colored complete graphs stored as row bitsets (currently \(N \le 64\)).
//!
//! Bit `j` of `rows[i]` is the color of edge `(i, j)`: `0` is red, `1` is blue.
//! The diagonal carries no meaning and is preserved exactly as read so that a
//! load/dump cycle reproduces the input grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Largest order representable with `u64` row bitsets.
pub const MAX_ORDER: usize = 64;

#[inline(always)]
pub(crate) const fn bit(v: usize) -> u64 {
    1u64 << v
}

/// Returns a mask with the lowest `n` bits set.
#[inline(always)]
pub const fn low_bits(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

// ============================================================================
// Color
// ============================================================================

/// One of the two edge colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Stored as `0`.
    Red,
    /// Stored as `1`.
    Blue,
}

impl Color {
    /// Interprets the lowest bit of `b`.
    #[inline(always)]
    pub const fn from_bit(b: u64) -> Self {
        if b & 1 == 0 {
            Color::Red
        } else {
            Color::Blue
        }
    }

    /// Returns `0` for red and `1` for blue.
    #[inline(always)]
    pub const fn bit(self) -> u64 {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

// ============================================================================
// ColorMatrix
// ============================================================================

/// A symmetric two-coloring of the edges of the complete graph \(K_N\).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorMatrix {
    order: usize,
    rows: Vec<u64>,
}

impl ColorMatrix {
    /// Creates an all-red coloring of order `order`.
    ///
    /// # Errors
    /// Returns [`MatrixError::TooManyVertices`] if `order > 64`.
    pub fn new(order: usize) -> Result<Self, MatrixError> {
        if order > MAX_ORDER {
            return Err(MatrixError::TooManyVertices { n: order });
        }
        Ok(Self {
            order,
            rows: vec![0u64; order],
        })
    }

    /// Builds a matrix from row bitsets, one per vertex.
    ///
    /// Bits at or above `rows.len()` are discarded.
    ///
    /// # Errors
    /// Returns an error if there are more than 64 rows or the off-diagonal
    /// entries are not symmetric.
    pub fn from_rows(mut rows: Vec<u64>) -> Result<Self, MatrixError> {
        let order = rows.len();
        if order > MAX_ORDER {
            return Err(MatrixError::TooManyVertices { n: order });
        }
        let mask = low_bits(order);
        for row in &mut rows {
            *row &= mask;
        }
        check_symmetric(&rows)?;
        Ok(Self { order, rows })
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Row bitsets.
    #[inline(always)]
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Row bitset of vertex `v`.
    #[inline(always)]
    pub fn row(&self, v: usize) -> u64 {
        debug_assert!(v < self.order);
        self.rows[v]
    }

    /// Color of the edge `(u, v)`.
    #[inline(always)]
    pub fn color(&self, u: usize, v: usize) -> Color {
        debug_assert!(u < self.order && v < self.order);
        Color::from_bit(self.rows[u] >> v)
    }

    /// Colors the edge `(u, v)` in both directions.
    #[inline]
    pub fn set_color(&mut self, u: usize, v: usize, color: Color) {
        debug_assert!(u < self.order && v < self.order);
        match color {
            Color::Red => {
                self.rows[u] &= !bit(v);
                self.rows[v] &= !bit(u);
            }
            Color::Blue => {
                self.rows[u] |= bit(v);
                self.rows[v] |= bit(u);
            }
        }
    }

    /// Neighbor bitsets of the spanning subgraph formed by the edges of `color`.
    ///
    /// Self-loops are never included.
    pub fn adjacency(&self, color: Color) -> Vec<u64> {
        let mask = low_bits(self.order);
        self.rows
            .iter()
            .enumerate()
            .map(|(v, &row)| {
                let row = match color {
                    Color::Red => !row,
                    Color::Blue => row,
                };
                row & mask & !bit(v)
            })
            .collect()
    }

    /// Returns a copy grown by one vertex.
    ///
    /// The current matrix is embedded at `(0, 0)`; every edge to the new vertex
    /// starts out red.
    ///
    /// # Errors
    /// Returns [`MatrixError::TooManyVertices`] if the grown order would exceed 64.
    pub fn expand(&self) -> Result<Self, MatrixError> {
        let mut grown = Self::new(self.order + 1)?;
        grown.rows[..self.order].copy_from_slice(&self.rows);
        Ok(grown)
    }

    /// Overwrites every edge incident to `v` from a bitset.
    ///
    /// Bit `i` of `row` becomes the color of edge `(v, i)` for `i != v`; the
    /// mirrored column is updated as well so the matrix stays symmetric.
    pub fn set_vertex_row(&mut self, v: usize, row: u64) {
        debug_assert!(v < self.order);
        for i in 0..self.order {
            if i != v {
                self.set_color(v, i, Color::from_bit(row >> i));
            }
        }
    }

    /// Writes the matrix as `N` lines of `N` `0/1` characters.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for &row in &self.rows {
            for j in 0..self.order {
                let c = (row >> j) & 1;
                write!(w, "{c}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Saves the matrix to a file in the format written by [`Self::write_to`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(filename)?);
        self.write_to(&mut w)?;
        w.flush()
    }

    /// Loads a matrix from a file.
    ///
    /// See [`parse_color_matrix`] for the accepted format.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the matrix is malformed.
    pub fn load_from_file(
        filename: impl AsRef<Path>,
        expected_order: Option<usize>,
    ) -> Result<Self, MatrixError> {
        let text =
            std::fs::read_to_string(filename).map_err(|e| MatrixError::Io(e.to_string()))?;
        parse_color_matrix(&text, expected_order)
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &row in &self.rows {
            for j in 0..self.order {
                write!(f, "{}", (row >> j) & 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Errors encountered while loading or validating a color matrix.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No `0`/`1` characters were found.
    #[error("color matrix is empty")]
    Empty,
    /// The number of `0`/`1` characters does not match the expected order.
    #[error("invalid matrix size: expected {expected} cells, found {got}")]
    CharCount {
        /// `order * order`.
        expected: usize,
        /// Cells actually read.
        got: usize,
    },
    /// The order could not be inferred because the cell count is not a square.
    #[error("invalid matrix size: {got} cells is not a perfect square")]
    NotSquareCount {
        /// Cells actually read.
        got: usize,
    },
    /// More vertices than fit in a `u64` row bitset.
    #[error("matrix has {n} vertices; this implementation supports n <= 64")]
    TooManyVertices {
        /// Requested order.
        n: usize,
    },
    /// `A[i][j] != A[j][i]`.
    #[error("matrix is not symmetric at ({i},{j})")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },
    /// I/O error (file not found, etc.).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Parses a color matrix from text.
///
/// Rules:
/// - Only `0` and `1` count; every other character is skipped.
/// - Cells are read row-major.
/// - With `expected_order = Some(n)` exactly `n * n` cells must be present,
///   otherwise the order is the square root of the cell count.
/// - Off-diagonal entries must be symmetric.
///
/// # Errors
/// Returns an error on a wrong cell count, more than 64 vertices, or asymmetry.
pub fn parse_color_matrix(
    text: &str,
    expected_order: Option<usize>,
) -> Result<ColorMatrix, MatrixError> {
    let cells: Vec<u8> = text
        .bytes()
        .filter(|b| matches!(b, b'0' | b'1'))
        .collect();

    let order = match expected_order {
        Some(n) => {
            if n > MAX_ORDER {
                return Err(MatrixError::TooManyVertices { n });
            }
            if cells.len() != n * n {
                return Err(MatrixError::CharCount {
                    expected: n * n,
                    got: cells.len(),
                });
            }
            n
        }
        None => {
            if cells.is_empty() {
                return Err(MatrixError::Empty);
            }
            let n = exact_sqrt(cells.len()).ok_or(MatrixError::NotSquareCount {
                got: cells.len(),
            })?;
            if n > MAX_ORDER {
                return Err(MatrixError::TooManyVertices { n });
            }
            n
        }
    };

    let rows = cells
        .chunks(order.max(1))
        .take(order)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'1')
                .fold(0u64, |acc, (j, _)| acc | bit(j))
        })
        .collect();

    ColorMatrix::from_rows(rows)
}

fn exact_sqrt(len: usize) -> Option<usize> {
    let mut n = (len as f64).sqrt() as usize;
    while n * n > len {
        n -= 1;
    }
    while (n + 1) * (n + 1) <= len {
        n += 1;
    }
    (n * n == len).then_some(n)
}

fn check_symmetric(rows: &[u64]) -> Result<(), MatrixError> {
    let n = rows.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if ((rows[i] >> j) & 1) != ((rows[j] >> i) & 1) {
                return Err(MatrixError::NotSymmetric { i, j });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
