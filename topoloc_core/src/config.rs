// topoloc_core/src/config.rs

//! Static map configuration: node count, boost scale and the ordered feature
//! classes with their occurrence-node rows.
//!
//! The defaults describe the 18-node CIC reference map. A TOML file may
//! override any part of it; missing fields keep their default values.

use crate::error::ConfigError;
use crate::types::NodeId;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Node count of the CIC reference map.
pub const CIC_NODE_COUNT: usize = 18;
/// Relative weight given to an occurrence node before normalization.
pub const DEFAULT_BOOST_SCALE: f64 = 5.0;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # MapConfig
/// Everything the sensor model needs to build its likelihood tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct MapConfig {
    /// Number of topological nodes, N. Nodes are numbered 1..=N.
    #[serde(default = "default_node_count")]
    pub node_count: usize,

    /// Weight given to occurrence nodes relative to the other nodes (which weigh 1).
    #[serde(default = "default_boost_scale")]
    pub boost_scale: f64,

    /// Feature classes, in the order their blocks appear in the encoded reading.
    #[serde(default = "cic_feature_classes")]
    pub feature_classes: Vec<FeatureClassConfig>,
}

/// One observation category and the nodes where each non-empty outcome occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureClassConfig {
    pub name: String,
    /// Number of mutually exclusive outcomes (0..cardinality).
    pub cardinality: usize,
    /// `occurrence_rows[r - 1]` lists the nodes (1-indexed) that favour outcome `r`.
    /// Outcome 0 is always the uniform "nothing distinguishing observed" row.
    #[serde(default)]
    pub occurrence_rows: Vec<Vec<u32>>,
}

impl FeatureClassConfig {
    pub fn new(name: &str, cardinality: usize, occurrence_rows: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.to_string(),
            cardinality,
            occurrence_rows,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            boost_scale: default_boost_scale(),
            feature_classes: cic_feature_classes(),
        }
    }
}

fn default_node_count() -> usize {
    CIC_NODE_COUNT
}

fn default_boost_scale() -> f64 {
    DEFAULT_BOOST_SCALE
}

/// The hallway, inner-corner and outer-corner classes of the CIC map.
fn cic_feature_classes() -> Vec<FeatureClassConfig> {
    vec![
        // 0: no parallel lines, 1: parallel lines found
        FeatureClassConfig::new("hallway", 2, vec![vec![2, 4, 6, 8, 9, 10, 11, 13, 15, 17]]),
        // 0: none, 1: single corner, 2: more than one corner
        FeatureClassConfig::new(
            "inner_corner",
            3,
            vec![vec![1, 7, 12, 18], vec![1, 7, 12, 18]],
        ),
        FeatureClassConfig::new(
            "outer_corner",
            3,
            vec![vec![1, 3, 5, 7, 12, 14, 16, 18], vec![3, 5, 14, 16]],
        ),
    ]
}

// =========================================================================
// == Loading & Validation ==
// =========================================================================

impl MapConfig {
    /// Loads a TOML file layered over the reference defaults and validates it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        tracing::info!("Loading map configuration from: {:?}", path);
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path)))
    }

    /// Parses TOML text layered over the reference defaults and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(source)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: MapConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The cardinality of every feature class, in class order.
    pub fn features_order(&self) -> Vec<usize> {
        self.feature_classes.iter().map(|c| c.cardinality).collect()
    }

    /// Checks every precondition the likelihood tables rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_count == 0 {
            return Err(ConfigError::InvalidNodeCount);
        }
        if !self.boost_scale.is_finite() || self.boost_scale <= 0.0 {
            return Err(ConfigError::InvalidBoostScale(self.boost_scale));
        }
        if self.feature_classes.is_empty() {
            return Err(ConfigError::NoFeatureClasses);
        }

        for (pos, class) in self.feature_classes.iter().enumerate() {
            if self.feature_classes[..pos].iter().any(|c| c.name == class.name) {
                return Err(ConfigError::DuplicateClassName(class.name.clone()));
            }
            if class.cardinality == 0 {
                return Err(ConfigError::InvalidCardinality {
                    class: class.name.clone(),
                });
            }
            if class.occurrence_rows.len() != class.cardinality - 1 {
                return Err(ConfigError::RowCountMismatch {
                    class: class.name.clone(),
                    cardinality: class.cardinality,
                    rows: class.occurrence_rows.len(),
                });
            }
            for (i, row) in class.occurrence_rows.iter().enumerate() {
                // Row 0 is the implicit uniform row, so occurrence rows start at 1.
                let row_idx = i + 1;
                if row.is_empty() {
                    return Err(ConfigError::EmptyOccurrenceRow {
                        class: class.name.clone(),
                        row: row_idx,
                    });
                }
                if let Some(&node) = row
                    .iter()
                    .find(|&&n| !NodeId(n).is_valid(self.node_count))
                {
                    return Err(ConfigError::NodeOutOfRange {
                        location: row_location(&class.name, row_idx),
                        node,
                        node_count: self.node_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Human-readable position of an occurrence row, used in error messages.
pub(crate) fn row_location(class: &str, row: usize) -> String {
    format!("feature class '{}' row {}", class, row)
}
