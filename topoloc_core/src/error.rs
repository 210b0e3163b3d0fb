// topoloc_core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures of a single observation or belief assignment.
///
/// Whenever one of these is returned, the filter's belief is left at its last
/// valid value. The caller decides whether to retry, skip or surface it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocalizationError {
    /// A vector or reading does not have the dimension the model expects.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    Shape {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A reading value lies outside `0..cardinality` for its feature class.
    #[error("reading value {value} for feature class '{class}' is outside 0..{cardinality}")]
    Range {
        class: String,
        value: i32,
        cardinality: usize,
    },

    /// A belief entry is negative, NaN or infinite.
    #[error("belief entry {index} has invalid probability {value}")]
    InvalidProbability { index: usize, value: f64 },

    /// Normalization was attempted on a vector with no usable probability mass.
    #[error("cannot normalize belief with total mass {sum}")]
    DegenerateBelief { sum: f64 },
}

/// Malformed static configuration. These indicate a broken deployment and are
/// meant to stop the host process at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map must contain at least one node")]
    InvalidNodeCount,

    #[error("boost scale must be a positive finite number, got {0}")]
    InvalidBoostScale(f64),

    #[error("at least one feature class must be configured")]
    NoFeatureClasses,

    #[error("feature class '{class}' must have a cardinality of at least 1")]
    InvalidCardinality { class: String },

    #[error("feature class '{class}' has cardinality {cardinality} but {rows} occurrence rows (expected {})", .cardinality.saturating_sub(1))]
    RowCountMismatch {
        class: String,
        cardinality: usize,
        rows: usize,
    },

    #[error("feature class '{class}' row {row} lists no occurrence nodes")]
    EmptyOccurrenceRow { class: String, row: usize },

    #[error("feature class '{0}' is configured more than once")]
    DuplicateClassName(String),

    /// `location` names where the node was listed, e.g. "feature class 'hallway' row 1".
    #[error("{location} references node {node}, outside 1..={node_count}")]
    NodeOutOfRange {
        location: String,
        node: u32,
        node_count: usize,
    },

    #[error("map configuration file not found at {0:?}")]
    MissingFile(PathBuf),

    #[error("failed to load map configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
