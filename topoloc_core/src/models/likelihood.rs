// topoloc_core/src/models/likelihood.rs

//! The naive-Bayes sensor model: one likelihood table per feature class,
//! stacked into a single combined table.

use crate::config::{row_location, MapConfig};
use crate::error::ConfigError;
use crate::types::{LikelihoodTable, NodeId};
use crate::utils::distribution::{normalize, uniform_distribution};
use nalgebra::DVector;

/// A configured observation category, with the table rows it contributes.
#[derive(Debug, Clone)]
pub struct FeatureClass {
    pub name: String,
    pub cardinality: usize,
    /// Row index of this class's first outcome in the combined table.
    pub offset: usize,
    /// The `(cardinality, N)` table for this class alone.
    pub table: LikelihoodTable,
}

/// Builds the probability that a feature is observed at each of `node_count`
/// nodes, given the nodes where it actually occurs.
///
/// Every node starts with weight 1, each occurrence node gets `boost_scale`,
/// and the weights are normalized. Node ids must lie in `1..=node_count`.
pub fn build_feature_occurrence_pdf(
    node_count: usize,
    occurrence_nodes: &[NodeId],
    boost_scale: f64,
) -> Result<DVector<f64>, ConfigError> {
    if node_count == 0 {
        return Err(ConfigError::InvalidNodeCount);
    }
    if !boost_scale.is_finite() || boost_scale <= 0.0 {
        return Err(ConfigError::InvalidBoostScale(boost_scale));
    }

    if let Some(node) = occurrence_nodes.iter().find(|n| !n.is_valid(node_count)) {
        return Err(ConfigError::NodeOutOfRange {
            location: "occurrence list".to_string(),
            node: node.0,
            node_count,
        });
    }

    let mut weights = DVector::from_element(node_count, 1.0);
    for node in occurrence_nodes {
        weights[node.index()] = boost_scale;
    }
    // Weights are all >= min(1, boost) > 0, so the sum cannot be degenerate.
    normalize(&weights).map_err(|_| ConfigError::InvalidBoostScale(boost_scale))
}

/// Builds the `(cardinality, node_count)` table for one feature class.
///
/// Row 0 is uniform; row `r` is the occurrence pdf of `row_specs[r - 1]`.
pub fn build_class_table(
    name: &str,
    node_count: usize,
    cardinality: usize,
    row_specs: &[Vec<NodeId>],
    boost_scale: f64,
) -> Result<LikelihoodTable, ConfigError> {
    if cardinality == 0 {
        return Err(ConfigError::InvalidCardinality {
            class: name.to_string(),
        });
    }
    if row_specs.len() != cardinality - 1 {
        return Err(ConfigError::RowCountMismatch {
            class: name.to_string(),
            cardinality,
            rows: row_specs.len(),
        });
    }
    if node_count == 0 {
        return Err(ConfigError::InvalidNodeCount);
    }

    let mut table = LikelihoodTable::zeros(cardinality, node_count);
    table.set_row(0, &uniform_distribution(node_count).transpose());
    for (i, nodes) in row_specs.iter().enumerate() {
        let pdf = build_feature_occurrence_pdf(node_count, nodes, boost_scale).map_err(
            |err| match err {
                ConfigError::NodeOutOfRange {
                    node, node_count, ..
                } => ConfigError::NodeOutOfRange {
                    location: row_location(name, i + 1),
                    node,
                    node_count,
                },
                other => other,
            },
        )?;
        table.set_row(i + 1, &pdf.transpose());
    }
    Ok(table)
}

/// Static per-node likelihoods for every feature class.
///
/// Built once at startup and immutable afterward, so it can be shared across
/// threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct SensorLikelihoodModel {
    node_count: usize,
    classes: Vec<FeatureClass>,
    features_order: Vec<usize>,
    /// All class tables stacked vertically, in class order.
    combined: LikelihoodTable,
}

impl SensorLikelihoodModel {
    /// Builds every class table described by `config` and stacks them.
    ///
    /// A malformed configuration is a deployment bug; the returned error is
    /// meant to abort startup.
    pub fn new(config: &MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let node_count = config.node_count;

        let mut classes = Vec::with_capacity(config.feature_classes.len());
        let mut offset = 0;
        for class in &config.feature_classes {
            let rows: Vec<Vec<NodeId>> = class
                .occurrence_rows
                .iter()
                .map(|row| row.iter().copied().map(NodeId).collect())
                .collect();
            let table = build_class_table(
                &class.name,
                node_count,
                class.cardinality,
                &rows,
                config.boost_scale,
            )?;
            classes.push(FeatureClass {
                name: class.name.clone(),
                cardinality: class.cardinality,
                offset,
                table,
            });
            offset += class.cardinality;
        }

        // Stack the class tables.
        let mut combined = LikelihoodTable::zeros(offset, node_count);
        for class in &classes {
            combined
                .rows_mut(class.offset, class.cardinality)
                .copy_from(&class.table);
        }

        let features_order = classes.iter().map(|c| c.cardinality).collect::<Vec<_>>();
        tracing::info!(
            "Sensor likelihood model built: {} nodes, features order {:?}",
            node_count,
            features_order
        );

        Ok(Self {
            node_count,
            classes,
            features_order,
            combined,
        })
    }

    /// The stacked `(Σ cardinality, N)` likelihood table.
    pub fn combined_table(&self) -> &LikelihoodTable {
        &self.combined
    }

    /// Cardinality of every feature class, in encoding order.
    pub fn features_order(&self) -> &[usize] {
        &self.features_order
    }

    pub fn classes(&self) -> &[FeatureClass] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&FeatureClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Total number of rows in the combined table (and entries in an encoded reading).
    pub fn encoded_len(&self) -> usize {
        self.combined.nrows()
    }

    /// Every node of the map, in belief order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count).map(NodeId::from_index)
    }

    /// Likelihood of an encoded observation at every node: `zᵀ · table`.
    pub fn likelihood(&self, z: &DVector<f64>) -> DVector<f64> {
        self.combined.tr_mul(z)
    }
}
