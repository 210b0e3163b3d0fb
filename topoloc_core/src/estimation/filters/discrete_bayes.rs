// topoloc_core/src/estimation/filters/discrete_bayes.rs

use std::sync::Arc;

use crate::error::LocalizationError;
use crate::estimation::Localizer;
use crate::messages::{EncodedReading, ModuleInput, Reading};
use crate::models::likelihood::SensorLikelihoodModel;
use crate::types::{Belief, NodeId};
use crate::utils::distribution::{normalize, uniform_distribution};
use nalgebra::DVector;

/// Whether the filter has absorbed any evidence since construction or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Initialized,
    Updated,
}

/// A discrete Bayes filter over the nodes of a topological map.
///
/// There is no motion model: the belief only changes when an observation is
/// fused, a belief is assigned, or the filter is reset.
#[derive(Debug, Clone)]
pub struct BeliefFilter {
    /// The current belief, one entry per node. Always sums to one.
    belief: Belief,
    /// Immutable sensor model, shared with any other filter built from it.
    model: Arc<SensorLikelihoodModel>,
    state: FilterState,
    update_count: u64,
}

impl BeliefFilter {
    /// Creates a filter with a uniform belief over every node of `model`.
    pub fn new(model: Arc<SensorLikelihoodModel>) -> Self {
        Self {
            belief: uniform_distribution(model.node_count()),
            model,
            state: FilterState::Initialized,
            update_count: 0,
        }
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    pub fn model(&self) -> &SensorLikelihoodModel {
        &self.model
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Number of observations fused since construction or the last reset.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Replaces the belief wholesale.
    ///
    /// The vector must have one entry per node (`Shape`), every entry must be
    /// finite and non-negative (`InvalidProbability`), and it must carry some
    /// mass (`DegenerateBelief`). It is stored normalized. On error the
    /// current belief is untouched.
    pub fn set_belief(&mut self, new_belief: Belief) -> Result<(), LocalizationError> {
        let expected = self.model.node_count();
        if new_belief.len() != expected {
            return Err(LocalizationError::Shape {
                context: "belief assignment",
                expected,
                actual: new_belief.len(),
            });
        }
        if let Some((index, &value)) = new_belief
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(LocalizationError::InvalidProbability { index, value });
        }
        self.belief = normalize(&new_belief)?;
        Ok(())
    }

    /// Returns to the uniform belief and the initialized state.
    pub fn reset(&mut self) {
        self.belief = uniform_distribution(self.model.node_count());
        self.state = FilterState::Initialized;
        self.update_count = 0;
    }

    /// The node with the highest probability, and that probability.
    /// Ties resolve to the lowest node id.
    pub fn most_likely_node(&self) -> (NodeId, f64) {
        let (idx, p) = self.belief.argmax();
        (NodeId::from_index(idx), p)
    }

    /// Converts a reading into the stacked one-hot z-vector.
    ///
    /// Each `reading[i]` must satisfy `0 <= reading[i] < features_order[i]`.
    pub fn encode_reading(&self, reading: &Reading) -> Result<EncodedReading, LocalizationError> {
        let classes = self.model.classes();
        if reading.len() != classes.len() {
            return Err(LocalizationError::Shape {
                context: "sensor reading",
                expected: classes.len(),
                actual: reading.len(),
            });
        }

        let mut z = DVector::<f64>::zeros(self.model.encoded_len());
        for (class, &value) in classes.iter().zip(reading.values()) {
            let outcome = usize::try_from(value)
                .ok()
                .filter(|&v| v < class.cardinality)
                .ok_or_else(|| LocalizationError::Range {
                    class: class.name.clone(),
                    value,
                    cardinality: class.cardinality,
                })?;
            z[class.offset + outcome] = 1.0;
        }
        Ok(EncodedReading(z))
    }

    /// Like [`encode_reading`](Self::encode_reading), but substitutes the
    /// "no information" encoding for an invalid reading.
    pub fn encode_reading_or_fallback(&self, reading: &Reading) -> EncodedReading {
        self.encode_reading(reading).unwrap_or_else(|err| {
            tracing::warn!("Invalid reading {:?}: {}. Using empty reading.", reading.values(), err);
            EncodedReading::no_information(self.model.features_order())
        })
    }

    /// Fuses one observation into the belief.
    ///
    /// On any error the belief is left at its previous value.
    pub fn update_belief(&mut self, reading: &Reading) -> Result<(), LocalizationError> {
        let z = self.encode_reading(reading).map_err(|err| {
            tracing::warn!("Rejected reading {:?}: {}", reading.values(), err);
            err
        })?;
        self.fuse(&z)?;

        self.state = FilterState::Updated;
        self.update_count += 1;
        let (node, p) = self.most_likely_node();
        tracing::debug!(
            "Belief update #{}: most likely {} (p = {:.4})",
            self.update_count,
            node,
            p
        );
        Ok(())
    }

    // --- Private Helper Methods ---

    /// posterior = (zᵀ · table) ∘ belief, normalized.
    fn fuse(&mut self, z: &EncodedReading) -> Result<(), LocalizationError> {
        let rows = self.model.encoded_len();
        if z.len() != rows {
            return Err(LocalizationError::Shape {
                context: "encoded reading",
                expected: rows,
                actual: z.len(),
            });
        }

        let likelihood = self.model.likelihood(z.as_vector());
        let unnormalized = likelihood.component_mul(&self.belief);
        let posterior = normalize(&unnormalized).map_err(|err| {
            tracing::warn!("Discarding degenerate posterior: {}", err);
            err
        })?;

        self.belief = posterior;
        Ok(())
    }
}

// --- The Public Trait Implementation ---
impl Localizer for BeliefFilter {
    fn process(&mut self, input: &ModuleInput) -> Result<(), LocalizationError> {
        match input {
            ModuleInput::Observation { message } => self.update_belief(&message.reading),
            ModuleInput::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    fn belief(&self) -> &Belief {
        &self.belief
    }
}
