//! Search configuration.

use crate::constraint::FilterOrder;
use crate::graph::MAX_ORDER;
use crate::universe::MAX_FILTER_WIDTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating an [`ExtendConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `clique_size` below 3.
    #[error("clique size {k} is too small (must be at least 3)")]
    CliqueSizeTooSmall {
        /// Requested clique size.
        k: usize,
    },
    /// `filter_width` above [`MAX_FILTER_WIDTH`].
    #[error("filter width {width} exceeds the supported maximum of {max}")]
    FilterWidthTooLarge {
        /// Requested width.
        width: u32,
        /// Supported maximum.
        max: u32,
    },
    /// `filter_batches == 0`.
    #[error("filter batch count must be at least 1")]
    ZeroBatches,
    /// The extended graph would not fit in a `u64` row.
    #[error("base order {order} is too large to extend (at most {max})")]
    OrderTooLarge {
        /// Base order.
        order: usize,
        /// Largest base order that can be extended.
        max: usize,
    },
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// The config file is not valid JSON for this struct.
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Search configuration parameters.
///
/// Missing fields in a JSON config file fall back to [`Default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendConfig {
    /// Clique size `K` to avoid.
    pub clique_size: usize,
    /// Number of low-order row bits pre-filtered through the universe.
    pub filter_width: u32,
    /// Number of filter batches; the universe is regrouped after each.
    pub filter_batches: usize,
    /// Order in which constraints are applied to the universe.
    pub filter_order: FilterOrder,
    /// Stop after this many outer (high-bit) steps.
    pub max_outer_steps: Option<u64>,
    /// Log every candidate row at TRACE level.
    pub show_candidates: bool,
    /// Track the deepest constraint index reached by a failing candidate.
    pub track_deepest: bool,
    /// Base order to enforce when loading the matrix.
    pub expected_order: Option<usize>,
}

impl Default for ExtendConfig {
    fn default() -> Self {
        Self {
            clique_size: 5,
            filter_width: 24,
            filter_batches: 8,
            filter_order: FilterOrder::AsFound,
            max_outer_steps: None,
            show_candidates: false,
            track_deepest: false,
            expected_order: None,
        }
    }
}

impl ExtendConfig {
    /// Checks the parameters against a base graph of order `order`.
    ///
    /// # Errors
    /// Returns the first violated bound.
    pub fn validate(&self, order: usize) -> Result<(), ConfigError> {
        if self.clique_size < 3 {
            return Err(ConfigError::CliqueSizeTooSmall {
                k: self.clique_size,
            });
        }
        if self.filter_width > MAX_FILTER_WIDTH {
            return Err(ConfigError::FilterWidthTooLarge {
                width: self.filter_width,
                max: MAX_FILTER_WIDTH,
            });
        }
        if self.filter_batches == 0 {
            return Err(ConfigError::ZeroBatches);
        }
        if order >= MAX_ORDER {
            return Err(ConfigError::OrderTooLarge {
                order,
                max: MAX_ORDER - 1,
            });
        }
        Ok(())
    }

    /// Filter width actually used for a base graph of order `order`.
    #[inline]
    pub fn effective_width(&self, order: usize) -> u32 {
        self.filter_width.min(order as u32)
    }

    /// Parses a config from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed input.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads a JSON config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_for_typical_orders() {
        let cfg = ExtendConfig::default();
        for order in [0, 4, 42, 63] {
            assert!(cfg.validate(order).is_ok(), "order {order}");
        }
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = ExtendConfig {
            clique_size: 2,
            ..ExtendConfig::default()
        };
        assert_eq!(cfg.validate(10), Err(ConfigError::CliqueSizeTooSmall { k: 2 }));

        let cfg = ExtendConfig {
            filter_width: 40,
            ..ExtendConfig::default()
        };
        assert!(matches!(cfg.validate(10), Err(ConfigError::FilterWidthTooLarge { .. })));

        let cfg = ExtendConfig {
            filter_batches: 0,
            ..ExtendConfig::default()
        };
        assert_eq!(cfg.validate(10), Err(ConfigError::ZeroBatches));

        assert_eq!(
            ExtendConfig::default().validate(64),
            Err(ConfigError::OrderTooLarge { order: 64, max: 63 })
        );
    }

    #[test]
    fn effective_width_is_capped_by_order() {
        let cfg = ExtendConfig::default();
        assert_eq!(cfg.effective_width(42), 24);
        assert_eq!(cfg.effective_width(10), 10);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = ExtendConfig::from_json_str(
            r#"{ "clique_size": 4, "filter_order": "least_overlap_first", "max_outer_steps": 100 }"#,
        )
        .unwrap();
        assert_eq!(cfg.clique_size, 4);
        assert_eq!(cfg.filter_order, FilterOrder::LeastOverlapFirst);
        assert_eq!(cfg.max_outer_steps, Some(100));
        assert_eq!(cfg.filter_width, ExtendConfig::default().filter_width);
    }

    #[test]
    fn json_roundtrip() {
        let cfg = ExtendConfig {
            track_deepest: true,
            expected_order: Some(42),
            ..ExtendConfig::default()
        };
        let text = serde_json::to_string(&cfg).unwrap();
        assert_eq!(ExtendConfig::from_json_str(&text).unwrap(), cfg);
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(
            ExtendConfig::from_json_str("{ clique_size: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
